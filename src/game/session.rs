//! The session aggregate: one table's players, cards and turn.
//!
//! Every public operation is one transaction. It either fails with a
//! [`GameError`] and leaves the session untouched, or mutates it and returns
//! the events the transport must deliver, in order.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::info;

use super::action::{process, Action, TurnRule};
use super::card::Card;
use super::deck::Deck;
use super::error::GameError;
use super::hand::{Hand, HAND_SIZE};
use super::players::{Player, PlayerRegistry};
use super::turn::TurnController;

pub const MAX_PLAYERS: usize = 8;

/// What a `game_state` snapshot shows beyond the public table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotPolicy {
    pub expose_deck: bool,
    pub expose_hidden: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub rule: TurnRule,
    pub policy: SnapshotPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub turn: usize,
    pub current_player: Option<String>,
    pub deck_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck: Option<Vec<Card>>,
    pub discard_pile: Vec<Card>,
    pub started: bool,
    pub player_hands: BTreeMap<String, Vec<Option<Card>>>,
    pub revealed_cards: BTreeMap<String, Vec<bool>>,
    pub held: BTreeMap<String, bool>,
    pub round_ended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    GameState(Snapshot),
    CardDrawn { card: Option<Card>, player: String },
    RoundEnd(Snapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    Caller,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: Audience,
    pub event: Event,
}

impl Outbound {
    pub fn everyone(event: Event) -> Self {
        Self { to: Audience::Everyone, event }
    }

    pub fn caller(event: Event) -> Self {
        Self { to: Audience::Caller, event }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(super) players: PlayerRegistry,
    pub(super) turn: TurnController,
    pub(super) deck: Deck,
    pub(super) discard: Vec<Card>,
    pub(super) hands: HashMap<String, Hand>,
    // a drawn card waiting to be placed or discarded
    pub(super) held: HashMap<String, Card>,
    pub(super) started: bool,
    pub(super) round_ended: bool,
    pub(super) rule: TurnRule,
    policy: SnapshotPolicy,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self { rule: options.rule, policy: options.policy, ..Self::default() }
    }

    pub fn join(&mut self, name: &str) -> Result<Vec<Outbound>, GameError> {
        if self.players.contains(name) {
            return Err(GameError::DuplicateName(name.to_string()));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::SessionFull(MAX_PLAYERS));
        }
        self.players.join(name)?;
        info!(player = %name, count = self.players.len(), "player joined");
        Ok(vec![Outbound::everyone(Event::GameState(self.snapshot()))])
    }

    /// Mark `name` ready, then deal a round if everyone seated is ready and
    /// no round is running.
    pub fn set_ready(&mut self, name: &str) -> Result<Vec<Outbound>, GameError> {
        self.players.set_ready(name)?;
        let mut out = vec![Outbound::everyone(Event::GameState(self.snapshot()))];
        if !self.round_in_progress() && self.players.can_start() {
            self.start_round();
            out.push(Outbound::everyone(Event::GameState(self.snapshot())));
        }
        Ok(out)
    }

    /// Remove `name` with their hand. A running round carries on.
    pub fn leave(&mut self, name: &str) -> Result<Vec<Outbound>, GameError> {
        let seat = self
            .players
            .leave(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?;
        self.turn.seat_removed(seat, self.players.len());
        self.hands.remove(name);
        self.held.remove(name);
        info!(player = %name, count = self.players.len(), "player left");

        let mut out = vec![Outbound::everyone(Event::GameState(self.snapshot()))];
        out.extend(self.check_round_end());
        Ok(out)
    }

    /// Build and shuffle a fresh deck, deal every seated player, and turn
    /// over the opening discard. One atomic step.
    pub fn start_round(&mut self) {
        self.deck = Deck::build();
        self.discard.clear();
        self.hands.clear();
        self.held.clear();
        // MAX_PLAYERS keeps every hand plus the opening discard within one deck
        debug_assert!(self.players.len() * HAND_SIZE < self.deck.len());
        for name in self.players.names() {
            let Some(cards) = self.deck.deal(HAND_SIZE) else { break };
            if let Ok(cards) = <[Card; HAND_SIZE]>::try_from(cards) {
                self.hands.insert(name, Hand::new(cards));
            }
        }
        if let Some(card) = self.deck.draw() {
            self.discard.push(card);
        }
        self.started = true;
        self.round_ended = false;
        self.turn.reset();
        info!(players = self.players.len(), deck = self.deck.len(), "round started");
    }

    pub fn apply_action(&mut self, action: Action) -> Result<Vec<Outbound>, GameError> {
        process(self, action)
    }

    /// Turn one of `name`'s cards face up. Not bound to the turn order.
    pub fn reveal(&mut self, name: &str, index: usize) -> Result<Vec<Outbound>, GameError> {
        if !self.players.contains(name) {
            return Err(GameError::UnknownPlayer(name.to_string()));
        }
        let hand = self
            .hands
            .get_mut(name)
            .ok_or_else(|| GameError::NoHand(name.to_string()))?;
        hand.reveal(index)?;

        let mut out = vec![Outbound::everyone(Event::GameState(self.snapshot()))];
        out.extend(self.check_round_end());
        Ok(out)
    }

    /// Ends the round, scores it and yields the `round_end` event once every
    /// dealt hand is fully revealed. Fires at most once per round.
    pub fn check_round_end(&mut self) -> Option<Outbound> {
        if !self.round_in_progress() || self.hands.is_empty() {
            return None;
        }
        if !self.hands.values().all(Hand::fully_revealed) {
            return None;
        }
        self.round_ended = true;
        self.calculate_scores();
        info!(scores = ?self.scores(), "round ended");
        Some(Outbound::everyone(Event::RoundEnd(self.full_snapshot())))
    }

    /// Add each dealt hand's total to its owner's running score.
    pub fn calculate_scores(&mut self) {
        for (name, hand) in &self.hands {
            if let Some(player) = self.players.get_mut(name) {
                player.score += hand.total();
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.build_snapshot(self.policy)
    }

    /// Snapshot with every hand and the deck order shown.
    pub fn full_snapshot(&self) -> Snapshot {
        self.build_snapshot(SnapshotPolicy { expose_deck: true, expose_hidden: true })
    }

    fn build_snapshot(&self, policy: SnapshotPolicy) -> Snapshot {
        let mut player_hands = BTreeMap::new();
        let mut revealed_cards = BTreeMap::new();
        for (name, hand) in &self.hands {
            let cards = if policy.expose_hidden {
                hand.cards().iter().copied().map(Some).collect()
            } else {
                hand.visible()
            };
            player_hands.insert(name.clone(), cards);
            revealed_cards.insert(name.clone(), hand.revealed().to_vec());
        }
        let held = self
            .players
            .iter()
            .map(|p| (p.name.clone(), self.held.contains_key(&p.name)))
            .collect();

        Snapshot {
            players: self.players.iter().cloned().collect(),
            turn: self.turn.index(),
            current_player: self.current_player().map(str::to_string),
            deck_count: self.deck.len(),
            deck: policy.expose_deck.then(|| self.deck.cards().to_vec()),
            discard_pile: self.discard.clone(),
            started: self.started,
            player_hands,
            revealed_cards,
            held,
            round_ended: self.round_ended,
        }
    }

    pub(super) fn round_in_progress(&self) -> bool {
        self.started && !self.round_ended
    }

    pub fn current_player(&self) -> Option<&str> {
        if self.started {
            self.turn.current(&self.players)
        } else {
            None
        }
    }

    pub fn turn_index(&self) -> usize {
        self.turn.index()
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn hand(&self, name: &str) -> Option<&Hand> {
        self.hands.get(name)
    }

    pub fn held(&self, name: &str) -> Option<Card> {
        self.held.get(name).copied()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn round_ended(&self) -> bool {
        self.round_ended
    }

    pub fn scores(&self) -> Vec<(String, i64)> {
        self.players.iter().map(|p| (p.name.clone(), p.score)).collect()
    }
}
