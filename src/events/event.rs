//! Game events and round control signals.
//!
//! Cards and players never call back into round rules directly. They raise
//! [`GameEvent`]s into an [`EventQueue`], and the mediator drains that queue
//! at defined checkpoints (after each card operation, after each action).
//! Events that affect round flow become a one-shot [`RoundSignal`] that the
//! round rules consume after the running phase yields.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;

/// Something that happened during play that other components react to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player should draw `count` cards from their deck into hand.
    DrawCards { player: PlayerId, count: usize },

    /// A player gains (or loses, if negative) uses of a named action.
    GainActions { player: PlayerId, action: String, amount: i64 },

    /// A card asks to be taken off the table.
    RemoveFromTable(CardId),

    /// A card left the table after dying.
    CardDied(CardId),

    /// A card was played onto the table.
    CardPlayed { player: Option<PlayerId>, card: CardId },

    /// A player has been eliminated.
    PlayerLost(PlayerId),

    /// End the running round after the current action.
    EndRoundEarly,

    /// Jump to a phase index after the current action.
    SkipToPhase(usize),

    /// Free-form message, kept for logs.
    Message { player: Option<PlayerId>, text: String },
}

impl GameEvent {
    /// Create a message event.
    pub fn message(player: Option<PlayerId>, text: impl Into<String>) -> Self {
        GameEvent::Message { player, text: text.into() }
    }

    /// The round signal this event implies, if any.
    #[must_use]
    pub fn round_signal(&self) -> Option<RoundSignal> {
        match self {
            GameEvent::EndRoundEarly => Some(RoundSignal::EndRound),
            GameEvent::SkipToPhase(index) => Some(RoundSignal::SkipToPhase(*index)),
            _ => None,
        }
    }
}

/// One-shot request for the round rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundSignal {
    /// Terminate the round.
    EndRound,
    /// Continue the round at this phase index.
    SkipToPhase(usize),
}

/// FIFO queue of raised events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise an event.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Take the oldest event.
    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Remove and return all events, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate without consuming.
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::PlayerLost(PlayerId::new(1)));
        queue.push(GameEvent::EndRoundEarly);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(GameEvent::PlayerLost(PlayerId::new(1))));
        assert_eq!(queue.drain(), vec![GameEvent::EndRoundEarly]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_round_signals() {
        assert_eq!(GameEvent::EndRoundEarly.round_signal(), Some(RoundSignal::EndRound));
        assert_eq!(GameEvent::SkipToPhase(2).round_signal(), Some(RoundSignal::SkipToPhase(2)));
        assert_eq!(GameEvent::CardDied(CardId::new(3)).round_signal(), None);
    }

    #[test]
    fn test_message_builder() {
        let event = GameEvent::message(Some(PlayerId::new(0)), "out of cards");
        assert_eq!(
            event,
            GameEvent::Message { player: Some(PlayerId::new(0)), text: "out of cards".to_string() }
        );
    }
}
