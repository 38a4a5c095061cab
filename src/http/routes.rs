//! HTTP routes: liveness, health and the websocket entry points.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::room::manager::SessionRegistry;
use crate::ws::connection;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(sessions: SessionRegistry) -> Self {
        Self { sessions: Arc::new(sessions) }
    }
}

pub async fn index() -> &'static str {
    "Skyjo Server is Running"
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/ws", get(connection::ws_default))
        .route("/ws/:session_id", get(connection::ws_session))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::game::SessionOptions;

    fn app() -> Router {
        router(AppState::new(SessionRegistry::new(SessionOptions::default())))
    }

    async fn get_text(uri: &str) -> (StatusCode, String) {
        let res = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_reports_running() {
        assert_eq!(get_text("/").await, (StatusCode::OK, "Skyjo Server is Running".to_string()));
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        assert_eq!(get_text("/healthz").await, (StatusCode::OK, "ok".to_string()));
    }

    #[tokio::test]
    async fn ws_route_needs_upgrade() {
        let (status, _) = get_text("/ws").await;
        assert!(status.is_client_error());
    }
}
