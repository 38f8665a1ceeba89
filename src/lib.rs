//! # card-table
//!
//! A turn-based card game engine built around a table of zones and a
//! phase/round execution engine.
//!
//! ## Design Principles
//!
//! 1. **Ids, not references**: Cards live in a `CardArena` and are referred
//!    to by `CardId`; phases and round rules hold `PlayerId`s and ask the
//!    `Mediator` to resolve them.
//!
//! 2. **Errors versus outcomes**: Bad indices and invalid placements are
//!    errors. An empty deck, a card already removed, an eliminated player
//!    are ordinary data (`None`, `false`, events).
//!
//! 3. **Explicit ordering**: Card hooks raise events into a queue drained at
//!    checkpoints. Round control (end early, skip to a phase) is a one-shot
//!    signal consumed after the running action completes.
//!
//! ## Modules
//!
//! - `core`: Player ids, RNG, configuration, errors, action history
//! - `cards`: Cards, hooks, the arena, decks and piles
//! - `zones`: Table areas, zones, and the table
//! - `events`: Events and round signals
//! - `players`: Players, action allowances, input providers
//! - `rules`: Mediator, actions, phases, round rules, the game shell
//! - `games`: War and Dominion presets

pub mod core;
pub mod cards;
pub mod zones;
pub mod events;
pub mod players;
pub mod rules;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    DeckLayout, GameConfig, GameError, GameRng, PlayerId, PlayerMap, Result, TableConfig, TableError,
    ZoneConfig, ActionRecord,
};

pub use crate::cards::{
    Card, CardArena, CardBehavior, CardId, CardPile, CharacterCard, Deck, DeckPosition, HookContext,
    PlainCard, ResourceCollection,
};

pub use crate::zones::{PlacementDetails, Slot, Table, TableArea, TableZone, ZoneType};

pub use crate::events::{EventQueue, GameEvent, RoundSignal};

pub use crate::players::{ActionChoices, FirstOption, InputProvider, Player, RandomInput, ScriptedInput};

pub use crate::rules::{
    ActionOutcome, BaseRoundRules, Game, GameAction, GameResult, HookOutcome, Mediator, Phase, PhaseLogic,
    PhaseMode, PlayerPhase, PlayerRoundRules, RoundHooks, RoundRules,
};
