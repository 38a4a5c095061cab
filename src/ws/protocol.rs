//! Wire events. Every frame is JSON text shaped `{"event": name, "data": payload}`.

use serde::{Deserialize, Serialize};

use crate::game::{Card, Event, GameError, RawAction, Snapshot};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinGame { username: String },
    Ready { username: String },
    Action(RawAction),
    RevealCard { username: String, card_index: usize },
    Ping,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    GameState(Snapshot),
    CardDrawn { card: Option<Card>, player: String },
    RoundEnd(Snapshot),
    Error { message: String },
    Pong,
}

impl From<Event> for ServerEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::GameState(snapshot) => ServerEvent::GameState(snapshot),
            Event::CardDrawn { card, player } => ServerEvent::CardDrawn { card, player },
            Event::RoundEnd(snapshot) => ServerEvent::RoundEnd(snapshot),
        }
    }
}

impl From<&GameError> for ServerEvent {
    fn from(err: &GameError) -> Self {
        ServerEvent::Error { message: err.to_string() }
    }
}

pub fn decode(text: &str) -> Result<ClientEvent, GameError> {
    serde_json::from_str(text).map_err(|err| GameError::MalformedEvent(err.to_string()))
}
