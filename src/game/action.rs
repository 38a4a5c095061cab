//! Player actions and the state machine that applies them.

use serde::Deserialize;
use tracing::debug;

use super::card::Card;
use super::error::GameError;
use super::hand::HAND_SIZE;
use super::session::{Event, Outbound, Session};

/// How many accepted actions make up a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnRule {
    /// Every accepted action passes the turn.
    #[default]
    SingleAction,
    /// A draw keeps the turn; placing or discarding the drawn card passes it.
    DrawThenPlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    Deck,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Draw { player: String, from: DrawSource },
    ReplaceCard { player: String, card_index: usize, card: Option<Card> },
    DiscardHeld { player: String },
}

impl Action {
    pub fn player(&self) -> &str {
        match self {
            Action::Draw { player, .. }
            | Action::ReplaceCard { player, .. }
            | Action::DiscardHeld { player } => player,
        }
    }
}

/// The `action` payload as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub player: String,
    #[serde(default)]
    pub card_index: Option<usize>,
    #[serde(default)]
    pub card: Option<i64>,
}

impl TryFrom<RawAction> for Action {
    type Error = GameError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let RawAction { kind, player, card_index, card } = raw;
        match kind.as_str() {
            "draw_from_deck" => Ok(Action::Draw { player, from: DrawSource::Deck }),
            "draw_from_discard" => Ok(Action::Draw { player, from: DrawSource::Discard }),
            "replace_card" => {
                let card_index = card_index.ok_or_else(|| {
                    GameError::MalformedEvent("replace_card requires card_index".into())
                })?;
                let card = card.map(Card::new).transpose()?;
                Ok(Action::ReplaceCard { player, card_index, card })
            }
            "discard_held" => Ok(Action::DiscardHeld { player }),
            _ => Err(GameError::UnknownAction(kind)),
        }
    }
}

/// Validate and apply one action. Nothing is mutated unless the whole action
/// is accepted.
pub(super) fn process(session: &mut Session, action: Action) -> Result<Vec<Outbound>, GameError> {
    if !session.round_in_progress() {
        return Err(GameError::GameNotActive);
    }
    session.turn.check(&session.players, action.player())?;

    let mut out = Vec::new();
    let passes_turn = match action {
        Action::Draw { player, from } => {
            if session.held.contains_key(&player) {
                return Err(GameError::AlreadyHolding(player));
            }
            let card = match from {
                DrawSource::Deck => session.deck.draw(),
                DrawSource::Discard => session.discard.pop(),
            };
            debug!(%player, ?from, ?card, "draw");
            if let Some(card) = card {
                session.held.insert(player.clone(), card);
            }
            let passes = card.is_none() || session.rule == TurnRule::SingleAction;
            out.push(Outbound::caller(Event::CardDrawn { card, player }));
            passes
        }
        Action::ReplaceCard { player, card_index, card } => {
            if card_index >= HAND_SIZE {
                return Err(GameError::InvalidCardIndex(card_index));
            }
            if !session.hands.contains_key(&player) {
                return Err(GameError::NoHand(player));
            }
            let held = *session
                .held
                .get(&player)
                .ok_or_else(|| GameError::NothingHeld(player.clone()))?;
            if let Some(claimed) = card {
                if claimed != held {
                    return Err(GameError::CardMismatch { held, claimed });
                }
            }
            let hand = session
                .hands
                .get_mut(&player)
                .ok_or_else(|| GameError::NoHand(player.clone()))?;
            let old = hand.replace(card_index, held)?;
            session.held.remove(&player);
            session.discard.push(old);
            debug!(%player, card_index, new = %held, %old, "replace card");
            true
        }
        Action::DiscardHeld { player } => {
            let held = session
                .held
                .remove(&player)
                .ok_or_else(|| GameError::NothingHeld(player.clone()))?;
            session.discard.push(held);
            debug!(%player, card = %held, "discard held card");
            true
        }
    };

    if passes_turn {
        session.turn.advance(session.players.len());
    }
    out.push(Outbound::everyone(Event::GameState(session.snapshot())));
    out.extend(session.check_round_end());
    Ok(out)
}
