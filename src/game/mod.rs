//! Game rules and the authoritative session state.

pub mod action;
pub mod card;
pub mod deck;
pub mod error;
pub mod hand;
pub mod players;
pub mod session;
pub mod turn;

pub use action::{Action, DrawSource, RawAction, TurnRule};
pub use card::Card;
pub use error::GameError;
pub use session::{Audience, Event, Outbound, Session, SessionOptions, Snapshot, SnapshotPolicy};
