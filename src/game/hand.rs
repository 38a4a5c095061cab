//! A dealt hand and its reveal bitmap.

use super::card::Card;
use super::error::GameError;

pub const HAND_SIZE: usize = 12;

/// Twelve concealed cards with index-aligned reveal flags.
///
/// A revealed flag never goes back to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
    revealed: [bool; HAND_SIZE],
}

impl Hand {
    pub fn new(cards: [Card; HAND_SIZE]) -> Self {
        Self { cards, revealed: [false; HAND_SIZE] }
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    pub fn revealed(&self) -> &[bool; HAND_SIZE] {
        &self.revealed
    }

    pub fn reveal(&mut self, index: usize) -> Result<(), GameError> {
        let flag = self
            .revealed
            .get_mut(index)
            .ok_or(GameError::InvalidCardIndex(index))?;
        *flag = true;
        Ok(())
    }

    /// Put `card` at `index` face up and hand back the card it displaced.
    pub fn replace(&mut self, index: usize, card: Card) -> Result<Card, GameError> {
        if index >= HAND_SIZE {
            return Err(GameError::InvalidCardIndex(index));
        }
        let old = std::mem::replace(&mut self.cards[index], card);
        self.revealed[index] = true;
        Ok(old)
    }

    pub fn fully_revealed(&self) -> bool {
        self.revealed.iter().all(|r| *r)
    }

    /// Sum of every card, hidden or not.
    pub fn total(&self) -> i64 {
        self.cards.iter().map(|c| c.value() as i64).sum()
    }

    /// Cards with unrevealed positions masked out.
    pub fn visible(&self) -> Vec<Option<Card>> {
        self.cards
            .iter()
            .zip(self.revealed.iter())
            .map(|(card, shown)| shown.then_some(*card))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_of(values: [i8; HAND_SIZE]) -> Hand {
        Hand::new(values.map(Card))
    }

    #[test]
    fn replace_returns_old_and_reveals() {
        let mut hand = hand_of([1; HAND_SIZE]);
        let old = hand.replace(4, Card(-2)).unwrap();
        assert_eq!(old, Card(1));
        assert_eq!(hand.cards()[4], Card(-2));
        assert!(hand.revealed()[4]);
        assert_eq!(hand.revealed().iter().filter(|r| **r).count(), 1);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut hand = hand_of([0; HAND_SIZE]);
        assert_eq!(hand.reveal(12), Err(GameError::InvalidCardIndex(12)));
        assert_eq!(hand.replace(99, Card(3)), Err(GameError::InvalidCardIndex(99)));
        assert_eq!(hand, hand_of([0; HAND_SIZE]));
    }

    #[test]
    fn fully_revealed_after_every_flag() {
        let mut hand = hand_of([5; HAND_SIZE]);
        for i in 0..HAND_SIZE - 1 {
            hand.reveal(i).unwrap();
        }
        assert!(!hand.fully_revealed());
        hand.reveal(HAND_SIZE - 1).unwrap();
        assert!(hand.fully_revealed());
        // revealing twice is harmless
        hand.reveal(0).unwrap();
        assert!(hand.fully_revealed());
    }

    #[test]
    fn total_counts_hidden_cards() {
        let hand = hand_of([-2, -1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 12]);
        assert_eq!(hand.total(), 45);
    }

    #[test]
    fn visible_masks_hidden_positions() {
        let mut hand = hand_of([9; HAND_SIZE]);
        hand.reveal(2).unwrap();
        let visible = hand.visible();
        assert_eq!(visible[2], Some(Card(9)));
        assert_eq!(visible.iter().filter(|c| c.is_none()).count(), 11);
    }
}
