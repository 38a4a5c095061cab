//! The draw pile.

use rand::seq::SliceRandom;
use rand::Rng;

use super::card::Card;

#[derive(Debug, Clone, Default)]
pub struct Deck {
    // top of the deck is the end of the vec
    cards: Vec<Card>,
}

impl Deck {
    /// Build the canonical 150-card deck and shuffle it with the thread rng.
    pub fn build() -> Self {
        Self::build_with(&mut rand::thread_rng())
    }

    pub fn build_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(150);
        for (value, copies) in Card::CANONICAL_COUNTS {
            for _ in 0..copies {
                cards.push(Card(value));
            }
        }
        cards.shuffle(rng);
        Self { cards }
    }

    /// Remove the top card. `None` once the deck is exhausted; no reshuffle.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Take `n` cards off the top at once, or none if fewer remain.
    pub fn deal(&mut self, n: usize) -> Option<Vec<Card>> {
        let at = self.cards.len().checked_sub(n)?;
        Some(self.cards.split_off(at))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
