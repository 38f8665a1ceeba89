//! Players and the decisions they make.
//!
//! ## Key Types
//!
//! - `Player`: hand, deck, discard pile, active flag
//! - `ActionChoices`: named per-turn action allowances
//! - `InputProvider`: where choices come from (`ScriptedInput`, `FirstOption`, `RandomInput`)

pub mod input;
pub mod player;

pub use input::{FirstOption, InputProvider, RandomInput, ScriptedInput};
pub use player::{ActionChoices, Player};
