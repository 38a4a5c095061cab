use skyjo_server::config::Config;
use skyjo_server::room::manager::SessionRegistry;
use skyjo_server::{router, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = Config::from_env()?;
    let state = AppState::new(SessionRegistry::new(config.session));
    let app = router(state);

    tracing::info!(addr = %config.addr, rule = ?config.session.rule, "listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
