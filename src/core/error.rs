//! Error types.
//!
//! Two families are kept apart so callers can tell "the engine refused"
//! from "the engine legitimately produced nothing":
//!
//! - `TableError`: programmer errors against the table (bad indices,
//!   occupied slots, construction mismatches). These are bugs, not game
//!   conditions, and are meant to propagate to the caller.
//! - `GameError`: everything the phase/round layer can fail with,
//!   including wrapped table errors.
//!
//! Empty decks, missing cards on removal-by-reference, and player
//! elimination are *not* errors: they are `Option`/`bool` results or
//! [`GameEvent`](crate::events::GameEvent)s.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::zones::ZoneType;

/// Table placement and lookup failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("area {area} out of range for {zone} ({count} areas)")]
    AreaOutOfRange { zone: ZoneType, area: usize, count: usize },

    #[error("slot {slot} out of range for area {area} (limit {limit})")]
    SlotOutOfRange { area: usize, slot: usize, limit: usize },

    #[error("slot {slot} in area {area} is already occupied")]
    SlotOccupied { area: usize, slot: usize },

    #[error("area {area} is full")]
    AreaFull { area: usize },

    #[error("area {area} has no fixed layout; a slot index is meaningless")]
    SlotOnUnboundedArea { area: usize },

    #[error("table has no {0}")]
    ZoneNotFound(ZoneType),

    #[error("{0} is not in the card arena")]
    UnknownCard(CardId),

    #[error("{0} is already on the table")]
    CardAlreadyOnTable(CardId),

    #[error("{decks} decks supplied for {areas} areas")]
    DeckCountMismatch { decks: usize, areas: usize },

    #[error("player zone has {areas} areas for {players} players")]
    PlayerAreaMismatch { areas: usize, players: usize },
}

impl TableError {
    /// True for out-of-range index errors (bad area, bad slot, missing zone).
    #[must_use]
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            TableError::AreaOutOfRange { .. }
                | TableError::SlotOutOfRange { .. }
                | TableError::ZoneNotFound(_)
        )
    }
}

/// Failures surfaced by the mediator, phases, and round rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("{0} is not seated at this game")]
    UnknownPlayer(PlayerId),

    #[error("phase {index} out of range ({count} phases)")]
    PhaseOutOfRange { index: usize, count: usize },

    #[error("input provider has no more answers for {0}")]
    InputExhausted(PlayerId),

    #[error("choice {choice} is not one of {options} options")]
    InvalidChoice { choice: usize, options: usize },

    #[error("{card} is not in the hand of {player}")]
    NotInHand { player: PlayerId, card: CardId },

    #[error("cannot change a phase's actions while it is running")]
    RoundInProgress,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, GameError>;
