//! Table zones: a fixed group of areas sharing a [`ZoneType`].
//!
//! The zone validates area indices and routes each call to the right
//! [`TableArea`]. It also owns the zone's decks: none, one shared by every
//! area, or exactly one per area.

use serde::{Deserialize, Serialize};

use super::area::{PlacementDetails, Slot, TableArea, ZoneType};
use crate::cards::{CardArena, CardId, Deck};
use crate::core::{DeckLayout, TableError, ZoneConfig};

/// A group of same-kind areas plus their decks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableZone {
    zone_type: ZoneType,
    areas: Vec<TableArea>,
    decks: Vec<Deck>,
}

impl TableZone {
    /// Create a zone with `area_count` areas and no decks.
    #[must_use]
    pub fn new(zone_type: ZoneType, area_count: usize, area_card_limit: Option<usize>) -> Self {
        let areas = (0..area_count)
            .map(|id| TableArea::new(id, zone_type, area_card_limit))
            .collect();
        Self { zone_type, areas, decks: Vec::new() }
    }

    /// Create a zone with decks attached.
    ///
    /// `decks` must be empty, hold a single shared deck, or hold exactly one
    /// deck per area.
    pub fn with_decks(
        zone_type: ZoneType,
        area_count: usize,
        area_card_limit: Option<usize>,
        decks: Vec<Deck>,
    ) -> Result<Self, TableError> {
        if decks.len() > 1 && decks.len() != area_count {
            return Err(TableError::DeckCountMismatch { decks: decks.len(), areas: area_count });
        }
        let mut zone = Self::new(zone_type, area_count, area_card_limit);
        zone.decks = decks;
        Ok(zone)
    }

    /// Build an empty zone from configuration.
    #[must_use]
    pub fn from_config(config: &ZoneConfig, player_count: usize) -> Self {
        let area_count = config.resolved_area_count(player_count);
        let mut zone = Self::new(config.zone_type, area_count, config.area_card_limit);
        zone.decks = match config.decks {
            DeckLayout::None => Vec::new(),
            DeckLayout::Shared => vec![Deck::new()],
            DeckLayout::PerArea => vec![Deck::new(); area_count],
        };
        zone
    }

    #[must_use]
    pub fn zone_type(&self) -> ZoneType {
        self.zone_type
    }

    #[must_use]
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Number of decks attached (0, 1, or one per area).
    #[must_use]
    pub fn deck_count(&self) -> usize {
        self.decks.len()
    }

    pub fn area(&self, area: usize) -> Result<&TableArea, TableError> {
        self.areas.get(area).ok_or(self.area_out_of_range(area))
    }

    pub fn area_mut(&mut self, area: usize) -> Result<&mut TableArea, TableError> {
        let err = self.area_out_of_range(area);
        self.areas.get_mut(area).ok_or(err)
    }

    pub fn areas(&self) -> impl Iterator<Item = &TableArea> {
        self.areas.iter()
    }

    /// The deck serving `area`: its own, or the shared one.
    pub fn deck(&self, area: usize) -> Result<Option<&Deck>, TableError> {
        self.area(area)?;
        Ok(match self.decks.len() {
            0 => None,
            1 => self.decks.first(),
            _ => self.decks.get(area),
        })
    }

    /// Mutable variant of [`TableZone::deck`].
    pub fn deck_mut(&mut self, area: usize) -> Result<Option<&mut Deck>, TableError> {
        self.area(area)?;
        Ok(match self.decks.len() {
            0 => None,
            1 => self.decks.first_mut(),
            _ => self.decks.get_mut(area),
        })
    }

    /// Draw from the deck serving `area`.
    ///
    /// `Ok(None)` when that deck is exhausted or the zone has no decks.
    pub fn draw_card_from_zone(&mut self, area: usize) -> Result<Option<CardId>, TableError> {
        Ok(self.deck_mut(area)?.and_then(Deck::draw_card))
    }

    pub fn play_card(
        &mut self,
        area: usize,
        card: CardId,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.area_mut(area)?.play_card(card, arena)
    }

    pub fn play_card_at(
        &mut self,
        area: usize,
        card: CardId,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.area_mut(area)?.play_card_at(card, slot, arena)
    }

    pub fn place_card(
        &mut self,
        area: usize,
        card: CardId,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.area_mut(area)?.place_card(card, arena)
    }

    pub fn place_card_at(
        &mut self,
        area: usize,
        card: CardId,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.area_mut(area)?.place_card_at(card, slot, arena)
    }

    /// Play several cards into one area, stopping at the first failure.
    pub fn play_cards(
        &mut self,
        area: usize,
        cards: &[CardId],
        arena: &mut CardArena,
    ) -> Result<Vec<PlacementDetails>, TableError> {
        self.area_mut(area)?.play_cards(cards, arena)
    }

    /// Place several cards into one area, stopping at the first failure.
    pub fn place_multiple_cards_to_area(
        &mut self,
        area: usize,
        cards: &[CardId],
        arena: &mut CardArena,
    ) -> Result<Vec<PlacementDetails>, TableError> {
        self.area_mut(area)?.place_cards(cards, arena)
    }

    /// Remove whatever is in `slot` of `area`.
    pub fn remove_card_at(
        &mut self,
        area: usize,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<Option<CardId>, TableError> {
        self.area_mut(area)?.remove_card_at(slot, arena)
    }

    /// Remove `card` from `area`. `Ok(false)` if it is not there.
    pub fn remove_card(
        &mut self,
        area: usize,
        card: CardId,
        arena: &mut CardArena,
    ) -> Result<bool, TableError> {
        Ok(self.area_mut(area)?.remove_card(card, arena))
    }

    /// Remove `card` from `slot` of `area` only if it is there.
    pub fn remove_card_at_slot(
        &mut self,
        area: usize,
        card: CardId,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<bool, TableError> {
        self.area_mut(area)?.remove_card_at_slot(card, slot, arena)
    }

    /// Remove `card` from whichever area holds it.
    pub fn remove_card_anywhere(&mut self, card: CardId, arena: &mut CardArena) -> bool {
        self.areas.iter_mut().any(|a| a.remove_card(card, arena))
    }

    /// Slots of one area.
    pub fn cards_in_area(&self, area: usize) -> Result<&[Slot], TableError> {
        Ok(self.area(area)?.cards_in_area())
    }

    /// `(area, slot)` of a card in this zone.
    #[must_use]
    pub fn find_card(&self, card: CardId) -> Option<(usize, usize)> {
        self.areas
            .iter()
            .find_map(|a| a.find_card(card).map(|slot| (a.id(), slot)))
    }

    /// Real cards across all areas.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.areas.iter().map(TableArea::card_count).sum()
    }

    /// Remove every card from one area.
    pub fn clear_area(&mut self, area: usize, arena: &mut CardArena) -> Result<Vec<CardId>, TableError> {
        Ok(self.area_mut(area)?.clear(arena))
    }

    /// Remove every card from every area, area by area.
    pub fn clear(&mut self, arena: &mut CardArena) -> Vec<CardId> {
        self.areas.iter_mut().flat_map(|a| a.clear(arena)).collect()
    }

    fn area_out_of_range(&self, area: usize) -> TableError {
        TableError::AreaOutOfRange {
            zone: self.zone_type,
            area,
            count: self.areas.len(),
        }
    }
}
