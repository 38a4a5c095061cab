//! End-to-end play over real websocket connections.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use skyjo_server::game::SessionOptions;
use skyjo_server::room::manager::SessionRegistry;
use skyjo_server::{router, AppState};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(SessionRegistry::new(SessionOptions::default())));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn open(addr: SocketAddr, path: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}{path}")).await.unwrap();
    ws
}

async fn send(ws: &mut Client, event: &str, data: Value) {
    let frame = json!({ "event": event, "data": data }).to_string();
    ws.send(Message::Text(frame)).await.unwrap();
}

/// Next JSON event, whatever it is.
async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Skip ahead to the next event named `name`.
async fn recv_named(ws: &mut Client, name: &str) -> Value {
    loop {
        let ev = recv(ws).await;
        if ev["event"] == name {
            return ev["data"].clone();
        }
    }
}

async fn recv_state_where(ws: &mut Client, pred: impl Fn(&Value) -> bool) -> Value {
    loop {
        let state = recv_named(ws, "game_state").await;
        if pred(&state) {
            return state;
        }
    }
}

#[tokio::test]
async fn two_players_start_and_take_turns() {
    let addr = serve().await;
    let mut a = open(addr, "/ws").await;
    let mut b = open(addr, "/ws").await;

    let initial = recv_named(&mut a, "game_state").await;
    assert_eq!(initial["started"], false);

    send(&mut a, "join_game", json!({ "username": "A" })).await;
    recv_state_where(&mut b, |s| s["players"].as_array().map(Vec::len) == Some(1)).await;
    send(&mut b, "join_game", json!({ "username": "B" })).await;
    recv_state_where(&mut a, |s| s["players"].as_array().map(Vec::len) == Some(2)).await;

    send(&mut a, "ready", json!({ "username": "A" })).await;
    recv_state_where(&mut b, |s| s["players"][0]["ready"] == true).await;
    send(&mut b, "ready", json!({ "username": "B" })).await;

    let state = recv_state_where(&mut a, |s| s["started"] == true).await;
    recv_state_where(&mut b, |s| s["started"] == true).await;
    assert_eq!(state["turn"], 0);
    assert_eq!(state["current_player"], "A");
    assert_eq!(state["deck_count"], 125);
    assert_eq!(state["discard_pile"].as_array().unwrap().len(), 1);
    assert_eq!(state["player_hands"]["A"].as_array().unwrap().len(), 12);
    assert_eq!(state["player_hands"]["B"].as_array().unwrap().len(), 12);
    assert!(state["player_hands"]["A"].as_array().unwrap().iter().all(Value::is_null));
    assert!(state.get("deck").is_none());

    // out of turn: only B hears about it
    send(&mut b, "action", json!({ "type": "draw_from_deck", "player": "B" })).await;
    let err = recv_named(&mut b, "error").await;
    assert_eq!(err["message"], "it is not B's turn");

    send(&mut a, "action", json!({ "type": "draw_from_deck", "player": "A" })).await;
    let drawn = recv(&mut a).await;
    assert_eq!(drawn["event"], "card_drawn");
    assert_eq!(drawn["data"]["player"], "A");
    assert!(drawn["data"]["card"].is_i64());

    let after = recv_named(&mut b, "game_state").await;
    assert_eq!(after["current_player"], "B");
    assert_eq!(after["deck_count"], 124);
    assert_eq!(after["held"], json!({ "A": true, "B": false }));
}

#[tokio::test]
async fn malformed_frames_get_private_errors() {
    let addr = serve().await;
    let mut a = open(addr, "/ws/side-table").await;
    recv_named(&mut a, "game_state").await;

    a.send(Message::Text("{\"event\":\"join_game\"}".into())).await.unwrap();
    let err = recv_named(&mut a, "error").await;
    assert!(err["message"].as_str().unwrap().starts_with("malformed event"));

    send(&mut a, "ready", json!({ "username": "nobody" })).await;
    let err = recv_named(&mut a, "error").await;
    assert_eq!(err["message"], "this connection does not play as 'nobody'");
}

#[tokio::test]
async fn disconnect_frees_the_name() {
    let addr = serve().await;
    let mut a = open(addr, "/ws").await;
    let mut b = open(addr, "/ws").await;

    send(&mut a, "join_game", json!({ "username": "A" })).await;
    recv_state_where(&mut b, |s| s["players"].as_array().map(Vec::len) == Some(1)).await;

    a.close(None).await.unwrap();
    recv_state_where(&mut b, |s| s["players"].as_array().map(Vec::len) == Some(0)).await;

    send(&mut b, "join_game", json!({ "username": "A" })).await;
    let state = recv_state_where(&mut b, |s| s["players"].as_array().map(Vec::len) == Some(1)).await;
    assert_eq!(state["players"][0]["name"], "A");
}
