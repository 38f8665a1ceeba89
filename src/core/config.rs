//! Game configuration types.
//!
//! Games describe their table layout and seating at startup:
//! - `ZoneConfig`: one zone (type, area count, per-area card limit, decks)
//! - `TableConfig`: all zones on the table
//! - `GameConfig`: players, seed, round limit and the table
//!
//! Configs are plain serde data, so a layout can also be loaded from JSON.

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use crate::zones::ZoneType;

/// How decks are attached to a zone's areas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckLayout {
    /// No managed decks.
    #[default]
    None,
    /// One deck shared by every area in the zone.
    Shared,
    /// One deck per area.
    PerArea,
}

/// Configuration for a single table zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Player zone or neutral zone.
    pub zone_type: ZoneType,

    /// Number of areas. `None` means one per seated player.
    pub area_count: Option<usize>,

    /// Fixed slot count per area. `None` for unbounded areas.
    pub area_card_limit: Option<usize>,

    /// Deck attachment.
    #[serde(default)]
    pub decks: DeckLayout,
}

impl ZoneConfig {
    /// A player zone with one area per seated player.
    #[must_use]
    pub fn player() -> Self {
        Self {
            zone_type: ZoneType::PlayerZone,
            area_count: None,
            area_card_limit: None,
            decks: DeckLayout::None,
        }
    }

    /// A neutral zone with `area_count` areas (market rows, shared piles).
    #[must_use]
    pub fn neutral(area_count: usize) -> Self {
        Self {
            zone_type: ZoneType::NeutralZone,
            area_count: Some(area_count),
            area_card_limit: None,
            decks: DeckLayout::None,
        }
    }

    /// Fix the number of areas explicitly.
    #[must_use]
    pub fn with_area_count(mut self, count: usize) -> Self {
        self.area_count = Some(count);
        self
    }

    /// Give every area a fixed number of slots.
    #[must_use]
    pub fn with_area_limit(mut self, limit: usize) -> Self {
        self.area_card_limit = Some(limit);
        self
    }

    /// Attach one deck shared by all areas.
    #[must_use]
    pub fn with_shared_deck(mut self) -> Self {
        self.decks = DeckLayout::Shared;
        self
    }

    /// Attach one deck per area.
    #[must_use]
    pub fn with_deck_per_area(mut self) -> Self {
        self.decks = DeckLayout::PerArea;
        self
    }

    /// Resolve the area count for a game with `player_count` players.
    #[must_use]
    pub fn resolved_area_count(&self, player_count: usize) -> usize {
        self.area_count.unwrap_or(player_count)
    }
}

/// Table layout: the zones a table is built from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub zones: Vec<ZoneConfig>,
}

impl TableConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone configuration.
    #[must_use]
    pub fn with_zone(mut self, zone: ZoneConfig) -> Self {
        self.zones.push(zone);
        self
    }

    /// Get the config of a zone type, if present.
    #[must_use]
    pub fn get_zone(&self, zone_type: ZoneType) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.zone_type == zone_type)
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seated players, in initial turn order.
    pub player_names: Vec<String>,

    /// Seed for deck shuffles and random input.
    pub seed: u64,

    /// Stop after this many rounds even without a winner.
    pub max_rounds: u32,

    /// Table layout.
    pub table: TableConfig,
}

impl GameConfig {
    /// Create a configuration for `player_count` players named "Player N".
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_names: (0..player_count).map(|i| format!("Player {}", i)).collect(),
            seed: 0,
            max_rounds: 1000,
            table: TableConfig::default(),
        }
    }

    /// Load a configuration from JSON.
    ///
    /// Rejects malformed JSON and seatings outside 1..=255 players.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        let players = config.player_count();
        if !(1..=255).contains(&players) {
            return Err(GameError::InvalidConfig(format!("{} players seated", players)));
        }
        Ok(config)
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    /// Replace the player names (and so the player count).
    #[must_use]
    pub fn with_player_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.player_names = names.into_iter().map(Into::into).collect();
        assert!(!self.player_names.is_empty(), "Must have at least 1 player");
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }
}
