//! Table areas: one slot-group inside a zone.
//!
//! An area is either **bounded** (a fixed number of slots, empty ones held
//! by [`Slot::Empty`]) or **unbounded** (a growing list of real cards).
//!
//! ## Invariants
//!
//! - Bounded: `cards_in_area().len() == limit` at all times.
//! - Unbounded: `cards_in_area()` never contains `Slot::Empty`.
//! - A failed placement changes nothing and runs no hook.
//! - Every successful placement or removal runs exactly one hook.

use serde::{Deserialize, Serialize};

use crate::cards::{CardArena, CardId, PlacementHook};
use crate::core::TableError;

/// The role of a zone on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    /// One area per player.
    PlayerZone,
    /// Shared areas (market rows, the middle of the table).
    NeutralZone,
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneType::PlayerZone => write!(f, "player zone"),
            ZoneType::NeutralZone => write!(f, "neutral zone"),
        }
    }
}

/// Where a card sits on the table. Handed to card hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementDetails {
    pub zone: ZoneType,
    pub area: usize,
    pub slot: usize,
}

impl PlacementDetails {
    #[must_use]
    pub const fn new(zone: ZoneType, area: usize, slot: usize) -> Self {
        Self { zone, area, slot }
    }
}

/// One position in an area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(CardId),
}

impl Slot {
    /// The card in this slot, if any.
    #[must_use]
    pub fn card(self) -> Option<CardId> {
        match self {
            Slot::Occupied(card) => Some(card),
            Slot::Empty => None,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// A slot-group within a zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableArea {
    id: usize,
    zone: ZoneType,
    limit: Option<usize>,
    slots: Vec<Slot>,
}

impl TableArea {
    /// Create an area. `limit: None` makes it unbounded.
    #[must_use]
    pub fn new(id: usize, zone: ZoneType, limit: Option<usize>) -> Self {
        let slots = match limit {
            Some(limit) => vec![Slot::Empty; limit],
            None => Vec::new(),
        };
        Self { id, zone, limit, slots }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn zone_type(&self) -> ZoneType {
        self.zone
    }

    /// Fixed slot count, `None` if unbounded.
    #[must_use]
    pub fn card_limit(&self) -> Option<usize> {
        self.limit
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.limit.is_some()
    }

    /// Raw slot sequence. For bounded areas its length is always the limit.
    #[must_use]
    pub fn cards_in_area(&self) -> &[Slot] {
        &self.slots
    }

    /// Real cards, in slot order.
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.slots.iter().filter_map(|s| s.card())
    }

    /// Number of real cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    /// True when a bounded area has no empty slot. Unbounded areas are never full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_bounded() && self.slots.iter().all(|s| !s.is_empty())
    }

    /// Slot index holding `card`, if present.
    #[must_use]
    pub fn find_card(&self, card: CardId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Slot::Occupied(card))
    }

    /// Play a card into the first free position.
    pub fn play_card(
        &mut self,
        card: CardId,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.put(card, None, PlacementHook::Play, arena)
    }

    /// Play a card into a specific slot of a bounded area.
    pub fn play_card_at(
        &mut self,
        card: CardId,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.put(card, Some(slot), PlacementHook::Play, arena)
    }

    /// Place a card (no play effect) into the first free position.
    pub fn place_card(
        &mut self,
        card: CardId,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.put(card, None, PlacementHook::Place, arena)
    }

    /// Place a card into a specific slot of a bounded area.
    pub fn place_card_at(
        &mut self,
        card: CardId,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        self.put(card, Some(slot), PlacementHook::Place, arena)
    }

    /// Play cards in order. Stops at the first failure; earlier cards stay placed.
    pub fn play_cards(
        &mut self,
        cards: &[CardId],
        arena: &mut CardArena,
    ) -> Result<Vec<PlacementDetails>, TableError> {
        cards
            .iter()
            .map(|&card| self.put(card, None, PlacementHook::Play, arena))
            .collect()
    }

    /// Place cards in order. Stops at the first failure; earlier cards stay placed.
    pub fn place_cards(
        &mut self,
        cards: &[CardId],
        arena: &mut CardArena,
    ) -> Result<Vec<PlacementDetails>, TableError> {
        cards
            .iter()
            .map(|&card| self.put(card, None, PlacementHook::Place, arena))
            .collect()
    }

    /// Remove whatever card is in `slot`.
    ///
    /// `Ok(None)` if the slot is empty; an error if the slot does not exist.
    pub fn remove_card_at(
        &mut self,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<Option<CardId>, TableError> {
        let Some(current) = self.slots.get(slot).copied() else {
            return Err(self.slot_out_of_range(slot));
        };
        match current.card() {
            Some(card) => {
                self.take_slot(slot, arena);
                Ok(Some(card))
            }
            None => Ok(None),
        }
    }

    /// Remove the first occurrence of `card`. False if it is not here.
    pub fn remove_card(&mut self, card: CardId, arena: &mut CardArena) -> bool {
        match self.find_card(card) {
            Some(slot) => {
                self.take_slot(slot, arena);
                true
            }
            None => false,
        }
    }

    /// Remove `card` only if it sits in `slot`.
    pub fn remove_card_at_slot(
        &mut self,
        card: CardId,
        slot: usize,
        arena: &mut CardArena,
    ) -> Result<bool, TableError> {
        match self.slots.get(slot).copied() {
            None => Err(self.slot_out_of_range(slot)),
            Some(s) if s == Slot::Occupied(card) => {
                self.take_slot(slot, arena);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    /// Remove every card, returning them in slot order.
    pub fn clear(&mut self, arena: &mut CardArena) -> Vec<CardId> {
        let cards: Vec<CardId> = self.cards().collect();
        for &card in &cards {
            self.remove_card(card, arena);
        }
        cards
    }

    fn put(
        &mut self,
        card: CardId,
        slot: Option<usize>,
        hook: PlacementHook,
        arena: &mut CardArena,
    ) -> Result<PlacementDetails, TableError> {
        let index = self.target_slot(slot)?;
        arena.check_placeable(card)?;

        if self.is_bounded() {
            self.slots[index] = Slot::Occupied(card);
        } else {
            self.slots.push(Slot::Occupied(card));
        }

        let details = PlacementDetails::new(self.zone, self.id, index);
        arena.attach(card, details, hook);
        Ok(details)
    }

    /// Resolve where a card would go, without mutating anything.
    fn target_slot(&self, slot: Option<usize>) -> Result<usize, TableError> {
        match (self.limit, slot) {
            (None, Some(_)) => Err(TableError::SlotOnUnboundedArea { area: self.id }),
            (None, None) => Ok(self.slots.len()),
            (Some(limit), Some(slot)) => {
                if slot >= limit {
                    Err(TableError::SlotOutOfRange { area: self.id, slot, limit })
                } else if !self.slots[slot].is_empty() {
                    Err(TableError::SlotOccupied { area: self.id, slot })
                } else {
                    Ok(slot)
                }
            }
            (Some(_), None) => self
                .slots
                .iter()
                .position(|s| s.is_empty())
                .ok_or(TableError::AreaFull { area: self.id }),
        }
    }

    /// Vacate a slot known to hold a card and fire its removal hook.
    fn take_slot(&mut self, slot: usize, arena: &mut CardArena) {
        let Some(card) = self.slots[slot].card() else {
            return;
        };

        if self.is_bounded() {
            self.slots[slot] = Slot::Empty;
        } else {
            self.slots.remove(slot);
            // Later cards shifted down by one.
            for (index, s) in self.slots.iter().enumerate().skip(slot) {
                if let Some(moved) = s.card() {
                    arena.relocate(moved, PlacementDetails::new(self.zone, self.id, index));
                }
            }
        }

        arena.detach(card);
    }

    fn slot_out_of_range(&self, slot: usize) -> TableError {
        TableError::SlotOutOfRange {
            area: self.id,
            slot,
            limit: self.limit.unwrap_or(self.slots.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardBehavior, HookContext};
    use crate::events::GameEvent;

    #[derive(Debug)]
    struct Counting;

    impl CardBehavior for Counting {
        fn on_play(&self, ctx: &mut HookContext<'_>) {
            ctx.raise(GameEvent::message(None, format!("play {}", ctx.details.slot)));
        }

        fn on_place(&self, ctx: &mut HookContext<'_>) {
            ctx.raise(GameEvent::message(None, format!("place {}", ctx.details.slot)));
        }

        fn on_removal(&self, ctx: &mut HookContext<'_>) {
            ctx.raise(GameEvent::message(None, format!("remove {}", ctx.details.slot)));
        }
    }

    fn arena_with(n: usize) -> (CardArena, Vec<CardId>) {
        let mut arena = CardArena::new();
        let ids = (0..n).map(|i| arena.add(Card::new(format!("c{}", i), Counting))).collect();
        (arena, ids)
    }

    fn messages(arena: &mut CardArena) -> Vec<String> {
        arena
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bounded_area_starts_with_empty_slots() {
        let area = TableArea::new(0, ZoneType::PlayerZone, Some(3));

        assert_eq!(area.cards_in_area(), &[Slot::Empty; 3]);
        assert_eq!(area.card_count(), 0);
        assert!(!area.is_full());
    }

    #[test]
    fn test_bounded_play_fills_first_empty_slot() {
        let (mut arena, ids) = arena_with(3);
        let mut area = TableArea::new(2, ZoneType::NeutralZone, Some(3));

        area.play_card_at(ids[0], 0, &mut arena).unwrap();
        area.play_card_at(ids[1], 2, &mut arena).unwrap();
        let details = area.play_card(ids[2], &mut arena).unwrap();

        assert_eq!(details, PlacementDetails::new(ZoneType::NeutralZone, 2, 1));
        assert!(area.is_full());
        assert_eq!(messages(&mut arena), vec!["play 0", "play 2", "play 1"]);
    }

    #[test]
    fn test_bounded_area_full() {
        let (mut arena, ids) = arena_with(2);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(1));

        area.play_card(ids[0], &mut arena).unwrap();
        assert_eq!(area.play_card(ids[1], &mut arena), Err(TableError::AreaFull { area: 0 }));
        assert!(!arena.get(ids[1]).unwrap().is_on_table());
    }

    #[test]
    fn test_occupied_slot_rejected_without_hook() {
        let (mut arena, ids) = arena_with(2);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(2));

        area.play_card_at(ids[0], 1, &mut arena).unwrap();
        arena.drain_events();

        let err = area.play_card_at(ids[1], 1, &mut arena).unwrap_err();
        assert_eq!(err, TableError::SlotOccupied { area: 0, slot: 1 });
        assert_eq!(area.cards_in_area()[1], Slot::Occupied(ids[0]));
        assert!(!arena.has_pending_events());
    }

    #[test]
    fn test_slot_out_of_range() {
        let (mut arena, ids) = arena_with(1);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(2));

        let err = area.place_card_at(ids[0], 2, &mut arena).unwrap_err();
        assert!(err.is_range_error());
        assert!(area.remove_card_at(5, &mut arena).unwrap_err().is_range_error());
    }

    #[test]
    fn test_unbounded_rejects_slot_index() {
        let (mut arena, ids) = arena_with(1);
        let mut area = TableArea::new(4, ZoneType::NeutralZone, None);

        assert_eq!(
            area.play_card_at(ids[0], 0, &mut arena),
            Err(TableError::SlotOnUnboundedArea { area: 4 })
        );
        assert!(area.cards_in_area().is_empty());
    }

    #[test]
    fn test_unbounded_append_and_shrink() {
        let (mut arena, ids) = arena_with(3);
        let mut area = TableArea::new(0, ZoneType::NeutralZone, None);

        area.play_cards(&ids, &mut arena).unwrap();
        assert_eq!(area.card_count(), 3);

        assert!(area.remove_card(ids[0], &mut arena));
        assert_eq!(area.cards_in_area(), &[Slot::Occupied(ids[1]), Slot::Occupied(ids[2])]);

        // Shifted cards keep accurate placement details.
        assert_eq!(arena.get(ids[2]).and_then(Card::placement).map(|d| d.slot), Some(1));
    }

    #[test]
    fn test_bounded_removal_keeps_length() {
        let (mut arena, ids) = arena_with(2);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(4));

        area.place_cards(&ids, &mut arena).unwrap();
        assert_eq!(area.remove_card_at(0, &mut arena), Ok(Some(ids[0])));
        assert_eq!(area.remove_card_at(0, &mut arena), Ok(None));
        assert_eq!(area.cards_in_area().len(), 4);
        assert_eq!(area.cards_in_area()[1], Slot::Occupied(ids[1]));
    }

    #[test]
    fn test_remove_by_reference_is_idempotent() {
        let (mut arena, ids) = arena_with(1);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(2));

        area.play_card(ids[0], &mut arena).unwrap();
        arena.drain_events();

        assert!(area.remove_card(ids[0], &mut arena));
        assert!(!area.remove_card(ids[0], &mut arena));
        assert_eq!(messages(&mut arena), vec!["remove 0"]);
    }

    #[test]
    fn test_remove_card_at_slot_checks_identity() {
        let (mut arena, ids) = arena_with(2);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(2));

        area.play_card_at(ids[0], 0, &mut arena).unwrap();

        assert_eq!(area.remove_card_at_slot(ids[1], 0, &mut arena), Ok(false));
        assert_eq!(area.remove_card_at_slot(ids[0], 1, &mut arena), Ok(false));
        assert_eq!(area.remove_card_at_slot(ids[0], 0, &mut arena), Ok(true));
        assert!(area.remove_card_at_slot(ids[0], 9, &mut arena).is_err());
    }

    #[test]
    fn test_batch_play_has_no_rollback() {
        let (mut arena, ids) = arena_with(3);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(2));

        let err = area.play_cards(&ids, &mut arena).unwrap_err();
        assert_eq!(err, TableError::AreaFull { area: 0 });
        assert_eq!(area.card_count(), 2);
    }

    #[test]
    fn test_same_card_cannot_be_placed_twice() {
        let (mut arena, ids) = arena_with(1);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, None);

        area.play_card(ids[0], &mut arena).unwrap();
        assert_eq!(area.play_card(ids[0], &mut arena), Err(TableError::CardAlreadyOnTable(ids[0])));
        assert_eq!(area.card_count(), 1);
    }

    #[test]
    fn test_clear_returns_cards_and_fires_hooks() {
        let (mut arena, ids) = arena_with(2);
        let mut area = TableArea::new(0, ZoneType::PlayerZone, Some(3));

        area.place_card_at(ids[0], 2, &mut arena).unwrap();
        area.place_card_at(ids[1], 0, &mut arena).unwrap();
        arena.drain_events();

        assert_eq!(area.clear(&mut arena), vec![ids[1], ids[0]]);
        assert_eq!(messages(&mut arena), vec!["remove 0", "remove 2"]);
        assert_eq!(area.cards_in_area().len(), 3);
    }
}
