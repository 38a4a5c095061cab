//! Authoritative game server for a Skyjo-style card game.
//!
//! Clients talk over a websocket; every event is applied to a single
//! [`game::Session`] as one serialized transaction and the resulting state is
//! broadcast to everyone watching that session.

pub mod config;
pub mod game;
pub mod http;
pub mod room;
pub mod telemetry;
pub mod util;
pub mod ws;

pub use http::routes::{router, AppState};
