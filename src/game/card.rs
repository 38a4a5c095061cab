//! Card values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// A card face value in `-2..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i8")]
pub struct Card(pub(crate) i8);

impl Card {
    pub const MIN: i8 = -2;
    pub const MAX: i8 = 12;

    /// `(value, copies)` for the base 150-card deck.
    pub const CANONICAL_COUNTS: [(i8, usize); 15] = [
        (-2, 5),
        (-1, 10),
        (0, 15),
        (1, 10),
        (2, 10),
        (3, 10),
        (4, 10),
        (5, 10),
        (6, 10),
        (7, 10),
        (8, 10),
        (9, 10),
        (10, 10),
        (11, 10),
        (12, 10),
    ];

    pub fn new(value: i64) -> Result<Self, GameError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as i8))
        } else {
            Err(GameError::InvalidCard(value))
        }
    }

    pub fn value(self) -> i8 {
        self.0
    }
}

impl TryFrom<i64> for Card {
    type Error = GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Card::new(value)
    }
}

impl From<Card> for i8 {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
