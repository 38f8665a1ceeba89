//! Core engine types: players, RNG, configuration, errors, action history.
//!
//! This module contains the game-agnostic building blocks. Games configure
//! the engine via `GameConfig` rather than modifying the core.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{DeckLayout, GameConfig, TableConfig, ZoneConfig};
pub use action::ActionRecord;
pub use error::{GameError, Result, TableError};
