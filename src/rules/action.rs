//! Executable rule steps.
//!
//! A [`GameAction`] is one thing a player can be told to do. Phases hold
//! lists of them and hand each to the mediator together with the acting
//! player's id.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::mediator::Mediator;
use crate::cards::{CardId, PlacementHook};
use crate::core::{PlayerId, Result};
use crate::zones::ZoneType;

/// What an action produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Nothing (the action had no effect or nothing to act on).
    #[default]
    None,
    Card(CardId),
    Cards(Vec<CardId>),
    Value(i64),
}

impl ActionOutcome {
    /// The single card produced, if any.
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            ActionOutcome::Card(card) => Some(*card),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, ActionOutcome::None)
    }
}

/// One executable rule step.
pub trait GameAction: Debug {
    /// Name recorded in the action history.
    fn name(&self) -> &str;

    /// Perform the action for `actor`.
    ///
    /// `targets` is empty unless the mediator was told to act against other
    /// players. Game-flow conditions (an empty deck, an elimination) are
    /// reported through the outcome or the mediator, not as errors.
    fn execute(&self, mediator: &mut Mediator, actor: PlayerId, targets: &[PlayerId]) -> Result<ActionOutcome>;
}

/// Draw cards into hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCard {
    pub count: usize,
}

impl Default for DrawCard {
    fn default() -> Self {
        Self { count: 1 }
    }
}

impl GameAction for DrawCard {
    fn name(&self) -> &str {
        "Draw Card"
    }

    fn execute(&self, mediator: &mut Mediator, actor: PlayerId, _targets: &[PlayerId]) -> Result<ActionOutcome> {
        let drawn = mediator.player_draws(actor, self.count)?;
        Ok(match drawn.as_slice() {
            [] => ActionOutcome::None,
            [card] => ActionOutcome::Card(*card),
            _ => ActionOutcome::Cards(drawn),
        })
    }
}

/// Move the top deck card face up into the actor's area, running `on_play`.
///
/// A player who has no card to flip loses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlipTopCard;

impl GameAction for FlipTopCard {
    fn name(&self) -> &str {
        "Flip Top Card"
    }

    fn execute(&self, mediator: &mut Mediator, actor: PlayerId, _targets: &[PlayerId]) -> Result<ActionOutcome> {
        Ok(deck_to_table(mediator, actor, PlacementHook::Play)?.map_or(ActionOutcome::None, ActionOutcome::Card))
    }
}

/// Move `count` deck cards face down into the actor's area, running `on_place`.
///
/// A player who runs out partway loses; cards already placed stay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceFaceDown {
    pub count: usize,
}

impl GameAction for PlaceFaceDown {
    fn name(&self) -> &str {
        "Place Face Down"
    }

    fn execute(&self, mediator: &mut Mediator, actor: PlayerId, _targets: &[PlayerId]) -> Result<ActionOutcome> {
        let mut placed = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            match deck_to_table(mediator, actor, PlacementHook::Place)? {
                Some(card) => placed.push(card),
                None => break,
            }
        }
        Ok(ActionOutcome::Cards(placed))
    }
}

/// Ask the actor which hand card to play, then play it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayChosenCard;

impl GameAction for PlayChosenCard {
    fn name(&self) -> &str {
        "Play Card"
    }

    fn execute(&self, mediator: &mut Mediator, actor: PlayerId, _targets: &[PlayerId]) -> Result<ActionOutcome> {
        let hand: Vec<CardId> = mediator.get_player_by_id(actor)?.hand().iter().collect();
        if hand.is_empty() {
            return Ok(ActionOutcome::None);
        }
        let choice = mediator.choose(actor, "play a card from hand", hand.len())?;
        let card = hand[choice];
        mediator.player_plays_card(actor, card)?;
        Ok(ActionOutcome::Card(card))
    }
}

/// Top deck card onto the actor's area, face up for `Play`, face down for
/// `Place`. Eliminates the actor when the deck is empty.
fn deck_to_table(mediator: &mut Mediator, actor: PlayerId, hook: PlacementHook) -> Result<Option<CardId>> {
    let Some(card) = mediator.get_player_mut(actor)?.deck_mut().draw_card() else {
        mediator.player_lost(actor)?;
        return Ok(None);
    };

    let area = mediator.player_area(actor);
    let table = mediator.table_mut();
    table.cards_mut().set_face_down(card, hook == PlacementHook::Place);
    match hook {
        PlacementHook::Play => table.play_card(ZoneType::PlayerZone, area, card)?,
        PlacementHook::Place => table.place_card(ZoneType::PlayerZone, area, card)?,
    };
    Ok(Some(card))
}
