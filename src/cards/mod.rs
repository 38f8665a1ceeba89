//! Card system: instances, hooks, the arena, decks and piles.
//!
//! ## Key Types
//!
//! - `CardId`: arena identifier; the only way other components refer to a card
//! - `Card`: orientation, owner, placement on the table, integer attributes
//! - `CardBehavior`: per-card-type `on_play` / `on_place` / `on_removal` hooks
//! - `CardArena`: owns all cards and collects events their hooks raise
//! - `Deck`, `CardPile`: collections of card ids behind `ResourceCollection`

pub mod arena;
pub mod card;
pub mod deck;

pub use arena::{CardArena, PlacementHook};
pub use card::{Card, CardBehavior, CardId, CharacterCard, HookContext, PlainCard};
pub use deck::{CardPile, Deck, DeckPosition, ResourceCollection};
