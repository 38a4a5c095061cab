//! Whose turn it is.

use super::error::GameError;
use super::players::PlayerRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnController {
    index: usize,
}

impl TurnController {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn current<'a>(&self, players: &'a PlayerRegistry) -> Option<&'a str> {
        players.at(self.index).map(|p| p.name.as_str())
    }

    /// Fails with `NotYourTurn` unless `name` holds the turn.
    pub fn check(&self, players: &PlayerRegistry, name: &str) -> Result<(), GameError> {
        match self.current(players) {
            Some(current) if current == name => Ok(()),
            _ => Err(GameError::NotYourTurn(name.to_string())),
        }
    }

    pub fn advance(&mut self, player_count: usize) {
        if player_count == 0 {
            self.index = 0;
        } else {
            self.index = (self.index + 1) % player_count;
        }
    }

    /// Keep the turn on the same player after the seat at `removed` is gone.
    ///
    /// `remaining` is the player count after removal. If the active player left,
    /// whoever now sits at that index plays next.
    pub fn seat_removed(&mut self, removed: usize, remaining: usize) {
        if remaining == 0 {
            self.index = 0;
            return;
        }
        if removed < self.index {
            self.index -= 1;
        }
        if self.index >= remaining {
            self.index = 0;
        }
    }
}
