//! Rejections a single transaction can produce.
//!
//! None of these are fatal: every variant leaves the session unchanged and is
//! reported privately to the client that caused it.

use super::card::Card;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the name '{0}' is already taken")]
    DuplicateName(String),
    #[error("this connection already joined as '{0}'")]
    AlreadyJoined(String),
    #[error("this connection does not play as '{0}'")]
    NotYourSeat(String),
    #[error("the session is full ({0} players)")]
    SessionFull(usize),
    #[error("no player named '{0}'")]
    UnknownPlayer(String),
    #[error("it is not {0}'s turn")]
    NotYourTurn(String),
    #[error("no round is in progress")]
    GameNotActive,
    #[error("unknown action type '{0}'")]
    UnknownAction(String),
    #[error("{0} has no dealt hand")]
    NoHand(String),
    #[error("card index {0} is out of range")]
    InvalidCardIndex(usize),
    #[error("card value {0} is outside -2..=12")]
    InvalidCard(i64),
    #[error("{0} is not holding a drawn card")]
    NothingHeld(String),
    #[error("{0} already holds a drawn card")]
    AlreadyHolding(String),
    #[error("held card is {held}, not {claimed}")]
    CardMismatch { held: Card, claimed: Card },
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}
