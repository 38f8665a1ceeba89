//! Game flow: the mediator, actions, phases, round rules, and the game shell.
//!
//! Control flows downward only. `Game` starts a round; `RoundRules` starts
//! each `Phase`; a phase tells the `Mediator` to have a player run a
//! `GameAction`; the action mutates the player and the `Table`. Anything
//! that must travel back up (an elimination, a request to skip a phase)
//! becomes an event or a round signal consumed at the next checkpoint.
//!
//! ## Key Types
//!
//! - `Mediator`: resolves player ids; owns players, table, signal, history
//! - `GameAction`: one rule step (`DrawCard`, `FlipTopCard`, ...)
//! - `PlayerPhase`: wave or turn-based execution of an action list
//! - `BaseRoundRules` / `PlayerRoundRules`: phase sequencing
//! - `Game`: runs rounds to a `GameResult`

pub mod action;
pub mod game;
pub mod mediator;
pub mod phase;
pub mod round;

pub use action::{ActionOutcome, DrawCard, FlipTopCard, GameAction, PlaceFaceDown, PlayChosenCard};
pub use game::{Game, GameResult};
pub use mediator::Mediator;
pub use phase::{DefaultLogic, Phase, PhaseLogic, PhaseMode, PlayerPhase};
pub use round::{BaseRoundRules, HookOutcome, NoHooks, PlayerRoundRules, RoundHooks, RoundRules};
