//! The table and its placement model.
//!
//! Zones are configured per game, not hardcoded. A game declares a player
//! zone (one area per player, usually) and optionally a neutral zone (market
//! rows, shared piles) through `ZoneConfig`.
//!
//! ## Key Types
//!
//! - `ZoneType`: `PlayerZone` or `NeutralZone`
//! - `Slot`: `Empty` or `Occupied(CardId)`; bounded areas keep one per capacity
//! - `PlacementDetails`: zone + area + slot handed to card hooks
//! - `TableArea`: one slot group with capacity rules
//! - `TableZone`: validated routing to areas, plus the zone's decks
//! - `Table`: every zone, plus the card arena

pub mod area;
pub mod table;
pub mod zone;

pub use area::{PlacementDetails, Slot, TableArea, ZoneType};
pub use table::Table;
pub use zone::TableZone;
