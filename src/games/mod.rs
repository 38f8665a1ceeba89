//! Preset games built on the engine.
//!
//! - `war`: two or more players, simultaneous flips, ties go to war
//! - `dominion`: action cards and per-player turns, no buying

pub mod dominion;
pub mod war;

pub use dominion::{DominionBuilder, DominionGame};
pub use war::{WarBuilder, WarGame};
