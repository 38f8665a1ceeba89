//! The table: every zone in play plus the arena that owns the cards.
//!
//! All "what card is where" reads and writes go through here. Each call
//! names a [`ZoneType`] and an area index; the table finds the zone and lends
//! it the arena so placement hooks can run.

use log::debug;

use super::area::{PlacementDetails, Slot, ZoneType};
use super::zone::TableZone;
use crate::cards::{Card, CardArena, CardId, Deck, DeckPosition};
use crate::core::{TableConfig, TableError};

/// Zones keyed by type, plus the card arena.
#[derive(Debug, Default)]
pub struct Table {
    cards: CardArena,
    zones: Vec<TableZone>,
}

impl Table {
    /// An empty table with no zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone, replacing any existing zone of the same type.
    #[must_use]
    pub fn with_zone(mut self, zone: TableZone) -> Self {
        self.zones.retain(|z| z.zone_type() != zone.zone_type());
        self.zones.push(zone);
        self
    }

    /// Build the zones a configuration describes for `player_count` players.
    #[must_use]
    pub fn from_config(config: &TableConfig, player_count: usize) -> Self {
        config
            .zones
            .iter()
            .fold(Self::new(), |table, zone| {
                table.with_zone(TableZone::from_config(zone, player_count))
            })
    }

    #[must_use]
    pub fn cards(&self) -> &CardArena {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardArena {
        &mut self.cards
    }

    /// Register a card with the table's arena.
    pub fn add_card(&mut self, card: Card) -> CardId {
        self.cards.add(card)
    }

    #[must_use]
    pub fn has_zone(&self, zone: ZoneType) -> bool {
        self.zones.iter().any(|z| z.zone_type() == zone)
    }

    pub fn zone(&self, zone: ZoneType) -> Result<&TableZone, TableError> {
        self.zones
            .iter()
            .find(|z| z.zone_type() == zone)
            .ok_or(TableError::ZoneNotFound(zone))
    }

    pub fn zone_mut(&mut self, zone: ZoneType) -> Result<&mut TableZone, TableError> {
        self.zones
            .iter_mut()
            .find(|z| z.zone_type() == zone)
            .ok_or(TableError::ZoneNotFound(zone))
    }

    /// Borrow a zone and the arena at the same time.
    fn split(&mut self, zone: ZoneType) -> Result<(&mut TableZone, &mut CardArena), TableError> {
        let Self { cards, zones } = self;
        let zone = zones
            .iter_mut()
            .find(|z| z.zone_type() == zone)
            .ok_or(TableError::ZoneNotFound(zone))?;
        Ok((zone, cards))
    }

    pub fn play_card(
        &mut self,
        zone: ZoneType,
        area: usize,
        card: CardId,
    ) -> Result<PlacementDetails, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.play_card(area, card, arena)
    }

    pub fn play_card_at(
        &mut self,
        zone: ZoneType,
        area: usize,
        card: CardId,
        slot: usize,
    ) -> Result<PlacementDetails, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.play_card_at(area, card, slot, arena)
    }

    pub fn place_card(
        &mut self,
        zone: ZoneType,
        area: usize,
        card: CardId,
    ) -> Result<PlacementDetails, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.place_card(area, card, arena)
    }

    pub fn place_card_at(
        &mut self,
        zone: ZoneType,
        area: usize,
        card: CardId,
        slot: usize,
    ) -> Result<PlacementDetails, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.place_card_at(area, card, slot, arena)
    }

    /// Play cards in order. Cards placed before a failure stay placed.
    pub fn play_cards(
        &mut self,
        zone: ZoneType,
        area: usize,
        cards: &[CardId],
    ) -> Result<Vec<PlacementDetails>, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.play_cards(area, cards, arena)
    }

    /// Place cards in order. Cards placed before a failure stay placed.
    pub fn place_multiple_cards_to_area(
        &mut self,
        zone: ZoneType,
        area: usize,
        cards: &[CardId],
    ) -> Result<Vec<PlacementDetails>, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.place_multiple_cards_to_area(area, cards, arena)
    }

    pub fn remove_card_at(
        &mut self,
        zone: ZoneType,
        area: usize,
        slot: usize,
    ) -> Result<Option<CardId>, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.remove_card_at(area, slot, arena)
    }

    pub fn remove_card(
        &mut self,
        zone: ZoneType,
        area: usize,
        card: CardId,
    ) -> Result<bool, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.remove_card(area, card, arena)
    }

    pub fn remove_card_at_slot(
        &mut self,
        zone: ZoneType,
        area: usize,
        card: CardId,
        slot: usize,
    ) -> Result<bool, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.remove_card_at_slot(area, card, slot, arena)
    }

    /// Take a card off the table wherever it is.
    ///
    /// Returns false if the card is not on the table.
    pub fn remove_from_table(&mut self, card: CardId) -> bool {
        let Some(details) = self.card_location(card) else {
            return false;
        };
        self.remove_card(details.zone, details.area, card).unwrap_or(false)
    }

    /// Where a card currently sits.
    #[must_use]
    pub fn card_location(&self, card: CardId) -> Option<PlacementDetails> {
        self.cards.get(card).and_then(Card::placement)
    }

    pub fn cards_in_area(&self, zone: ZoneType, area: usize) -> Result<&[Slot], TableError> {
        self.zone(zone)?.cards_in_area(area)
    }

    /// Real cards across every area of a zone.
    pub fn card_count(&self, zone: ZoneType) -> Result<usize, TableError> {
        Ok(self.zone(zone)?.card_count())
    }

    /// Remove every card from a zone, running removal hooks.
    pub fn clear_zone(&mut self, zone: ZoneType) -> Result<Vec<CardId>, TableError> {
        let (zone, arena) = self.split(zone)?;
        let cleared = zone.clear(arena);
        debug!("cleared {} cards from {}", cleared.len(), zone.zone_type());
        Ok(cleared)
    }

    /// Remove every card from one area, running removal hooks.
    pub fn clear_area(&mut self, zone: ZoneType, area: usize) -> Result<Vec<CardId>, TableError> {
        let (zone, arena) = self.split(zone)?;
        zone.clear_area(area, arena)
    }

    /// Turn a card over. Returns the new face-down state.
    pub fn flip_card(&mut self, card: CardId) -> Result<bool, TableError> {
        self.cards.flip(card)
    }

    pub fn deck_mut(&mut self, zone: ZoneType, area: usize) -> Result<Option<&mut Deck>, TableError> {
        self.zone_mut(zone)?.deck_mut(area)
    }

    /// Draw from the deck serving `area` of `zone`.
    pub fn draw_card_from_zone(
        &mut self,
        zone: ZoneType,
        area: usize,
    ) -> Result<Option<CardId>, TableError> {
        self.zone_mut(zone)?.draw_card_from_zone(area)
    }

    /// Deal `count` cards from a neutral-zone deck face up into a neutral area.
    ///
    /// Stops early if the deck runs out. Returns the cards played. A card the
    /// area refuses goes back on top of the deck, face down, before the
    /// error is returned; cards dealt before it stay dealt.
    pub fn play_cards_from_table_deck_to_neutral_zone(
        &mut self,
        count: usize,
        deck_area: usize,
        target_area: usize,
    ) -> Result<Vec<CardId>, TableError> {
        let (zone, arena) = self.split(ZoneType::NeutralZone)?;
        zone.area(target_area)?;
        zone.area(deck_area)?;

        let mut played = Vec::with_capacity(count);
        for _ in 0..count {
            if zone.area(target_area)?.is_full() {
                return Err(TableError::AreaFull { area: target_area });
            }
            let Some(card) = zone.draw_card_from_zone(deck_area)? else {
                break;
            };
            let was_face_down = arena.get(card).map_or(true, Card::is_face_down);
            arena.set_face_down(card, false);
            if let Err(err) = zone.play_card(target_area, card, arena) {
                arena.set_face_down(card, was_face_down);
                if let Some(deck) = zone.deck_mut(deck_area)? {
                    deck.add_card_to_deck(card, DeckPosition::Top, false, None);
                }
                return Err(err);
            }
            played.push(card);
        }
        debug!("dealt {} cards to neutral area {}", played.len(), target_area);
        Ok(played)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ZoneConfig;

    fn deck_table(n: usize) -> (Table, Vec<CardId>) {
        let mut table = Table::new();
        let ids: Vec<_> = (0..n).map(|i| table.add_card(Card::plain(format!("c{}", i)).face_down())).collect();
        let zone = TableZone::with_decks(ZoneType::NeutralZone, 1, None, vec![Deck::from_cards(ids.clone())])
            .unwrap();
        (table.with_zone(zone).with_zone(TableZone::new(ZoneType::PlayerZone, 2, Some(2))), ids)
    }

    #[test]
    fn test_missing_zone() {
        let mut table = Table::new().with_zone(TableZone::new(ZoneType::PlayerZone, 2, None));
        let card = table.add_card(Card::plain("a"));

        let err = table.play_card(ZoneType::NeutralZone, 0, card).unwrap_err();
        assert_eq!(err, TableError::ZoneNotFound(ZoneType::NeutralZone));
        assert!(err.is_range_error());
    }

    #[test]
    fn test_deal_from_table_deck() {
        let (mut table, ids) = deck_table(5);

        let played = table.play_cards_from_table_deck_to_neutral_zone(2, 0, 0).unwrap();

        assert_eq!(played, vec![ids[4], ids[3]]);
        assert_eq!(table.card_count(ZoneType::NeutralZone), Ok(2));
        assert_eq!(table.deck_mut(ZoneType::NeutralZone, 0).unwrap().map(|d| d.len()), Some(3));
        assert!(!table.cards().get(ids[4]).unwrap().is_face_down());
    }

    #[test]
    fn test_deal_stops_when_deck_runs_out() {
        let (mut table, _) = deck_table(1);

        let played = table.play_cards_from_table_deck_to_neutral_zone(3, 0, 0).unwrap();
        assert_eq!(played.len(), 1);
    }

    #[test]
    fn test_deal_to_bad_area_draws_nothing() {
        let (mut table, _) = deck_table(3);

        assert!(table.play_cards_from_table_deck_to_neutral_zone(1, 0, 4).is_err());
        assert_eq!(table.deck_mut(ZoneType::NeutralZone, 0).unwrap().map(|d| d.len()), Some(3));
    }

    #[test]
    fn test_rejected_deal_returns_card_to_deck_top() {
        let (mut table, ids) = deck_table(5);
        table.play_card(ZoneType::PlayerZone, 0, ids[4]).unwrap();

        let err = table.play_cards_from_table_deck_to_neutral_zone(2, 0, 0).unwrap_err();

        assert_eq!(err, TableError::CardAlreadyOnTable(ids[4]));
        let deck = table.deck_mut(ZoneType::NeutralZone, 0).unwrap().unwrap();
        assert_eq!((deck.len(), deck.peek()), (5, Some(ids[4])));
        assert_eq!(table.card_count(ZoneType::NeutralZone), Ok(0));
    }

    #[test]
    fn test_card_location_and_remove_from_table() {
        let (mut table, ids) = deck_table(2);
        table.play_card_at(ZoneType::PlayerZone, 1, ids[0], 1).unwrap();

        assert_eq!(
            table.card_location(ids[0]),
            Some(PlacementDetails::new(ZoneType::PlayerZone, 1, 1))
        );
        assert!(table.remove_from_table(ids[0]));
        assert!(!table.remove_from_table(ids[0]));
        assert_eq!(table.card_location(ids[0]), None);
    }

    #[test]
    fn test_clear_zone() {
        let (mut table, ids) = deck_table(3);
        table.play_cards(ZoneType::PlayerZone, 0, &ids[..2]).unwrap();

        table.play_card(ZoneType::PlayerZone, 1, ids[2]).unwrap();
        assert_eq!(table.clear_area(ZoneType::PlayerZone, 1), Ok(vec![ids[2]]));
        assert_eq!(table.clear_zone(ZoneType::PlayerZone), Ok(vec![ids[0], ids[1]]));
        assert_eq!(table.card_count(ZoneType::PlayerZone), Ok(0));
        assert_eq!(table.cards_in_area(ZoneType::PlayerZone, 0).map(<[Slot]>::len), Ok(2));
    }

    #[test]
    fn test_from_config() {
        let config = TableConfig::new()
            .with_zone(ZoneConfig::player().with_area_limit(3))
            .with_zone(ZoneConfig::neutral(2).with_shared_deck());
        let table = Table::from_config(&config, 4);

        assert_eq!(table.zone(ZoneType::PlayerZone).map(TableZone::area_count), Ok(4));
        assert_eq!(table.zone(ZoneType::NeutralZone).map(TableZone::deck_count), Ok(1));
    }
}
