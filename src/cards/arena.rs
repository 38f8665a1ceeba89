//! Card arena: owns every card instance in a game.
//!
//! Everything else refers to cards by [`CardId`]. The arena is also where
//! lifecycle hooks run, since it is the only place that can see both the
//! card and the outbox its hooks raise events into.

use log::trace;
use rustc_hash::FxHashMap;

use super::card::{Card, CardId, CharacterCard, HookContext};
use crate::core::TableError;
use crate::events::{EventQueue, GameEvent};
use crate::zones::PlacementDetails;

/// Which hook a placement runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementHook {
    /// `on_play`: the card's effect resolves.
    Play,
    /// `on_place`: the card is put down without its effect.
    Place,
}

/// Storage for card instances plus the outbox of hook-raised events.
#[derive(Debug, Default)]
pub struct CardArena {
    cards: FxHashMap<CardId, Card>,
    next_id: u32,
    outbox: EventQueue,
}

impl CardArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card, assigning it a fresh id.
    pub fn add(&mut self, mut card: Card) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;
        card.id = id;
        self.cards.insert(id, card);
        id
    }

    /// Permanently discard a card. Returns it if it existed.
    pub fn discard(&mut self, id: CardId) -> Option<Card> {
        self.cards.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Read an attribute of a card, with a default for unknown cards.
    #[must_use]
    pub fn attr(&self, id: CardId, key: &str, default: i64) -> i64 {
        self.get(id).map_or(default, |c| c.attr(key, default))
    }

    /// Turn a card over. Returns the new face-down state.
    pub fn flip(&mut self, id: CardId) -> Result<bool, TableError> {
        let card = self.cards.get_mut(&id).ok_or(TableError::UnknownCard(id))?;
        card.flip();
        Ok(card.is_face_down())
    }

    /// Set orientation. Unknown cards are ignored.
    pub fn set_face_down(&mut self, id: CardId, face_down: bool) {
        if let Some(card) = self.cards.get_mut(&id) {
            card.set_face_down(face_down);
        }
    }

    /// Check that a card exists and is not already on the table.
    pub fn check_placeable(&self, id: CardId) -> Result<(), TableError> {
        match self.cards.get(&id) {
            None => Err(TableError::UnknownCard(id)),
            Some(card) if card.is_on_table() => Err(TableError::CardAlreadyOnTable(id)),
            Some(_) => Ok(()),
        }
    }

    /// Record a card's new placement and run its play/place hook.
    ///
    /// Callers must have validated the card with [`check_placeable`](Self::check_placeable).
    pub(crate) fn attach(&mut self, id: CardId, details: PlacementDetails, hook: PlacementHook) {
        let Self { cards, outbox, .. } = self;
        let Some(card) = cards.get_mut(&id) else {
            return;
        };
        card.set_placement(Some(details));
        trace!("{} {:?} at {:?}", id, hook, details);

        let card = &*card;
        let mut ctx = HookContext::new(card, details, outbox);
        match hook {
            PlacementHook::Play => card.behavior().on_play(&mut ctx),
            PlacementHook::Place => card.behavior().on_place(&mut ctx),
        }
    }

    /// Clear a card's placement and run its removal hook.
    pub(crate) fn detach(&mut self, id: CardId) {
        let Self { cards, outbox, .. } = self;
        let Some(card) = cards.get_mut(&id) else {
            return;
        };
        let Some(details) = card.placement() else {
            return;
        };
        card.set_placement(None);
        trace!("{} removed from {:?}", id, details);

        let card = &*card;
        card.behavior().on_removal(&mut HookContext::new(card, details, outbox));
    }

    /// Update the recorded placement of a card that moved within its area.
    /// No hook runs.
    pub(crate) fn relocate(&mut self, id: CardId, details: PlacementDetails) {
        if let Some(card) = self.cards.get_mut(&id) {
            if card.is_on_table() {
                card.set_placement(Some(details));
            }
        }
    }

    /// Deal damage to a character card's `health`.
    ///
    /// Returns true if this damage killed it. A card that dies on the table
    /// raises [`GameEvent::RemoveFromTable`]; the table removal that follows
    /// fires its removal hook.
    pub fn damage(&mut self, id: CardId, amount: i64) -> Result<bool, TableError> {
        let card = self.cards.get_mut(&id).ok_or(TableError::UnknownCard(id))?;
        let before = card.attr(CharacterCard::HEALTH, 0);
        let after = card.modify_attr(CharacterCard::HEALTH, -amount);
        let died = before > 0 && after <= 0;
        if died && card.is_on_table() {
            self.outbox.push(GameEvent::RemoveFromTable(id));
        }
        Ok(died)
    }

    /// Raise an event on behalf of a card.
    pub fn raise(&mut self, event: GameEvent) {
        self.outbox.push(event);
    }

    /// Take every event raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.outbox.drain()
    }

    #[must_use]
    pub fn has_pending_events(&self) -> bool {
        !self.outbox.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::CardBehavior;
    use crate::core::PlayerId;
    use crate::zones::ZoneType;

    #[derive(Debug)]
    struct Loud;

    impl CardBehavior for Loud {
        fn on_play(&self, ctx: &mut HookContext<'_>) {
            ctx.raise(GameEvent::message(ctx.owner, format!("play {}", ctx.details.slot)));
        }

        fn on_place(&self, ctx: &mut HookContext<'_>) {
            ctx.raise(GameEvent::message(ctx.owner, "place"));
        }

        fn on_removal(&self, ctx: &mut HookContext<'_>) {
            ctx.raise(GameEvent::message(ctx.owner, "removed"));
        }
    }

    fn details() -> PlacementDetails {
        PlacementDetails::new(ZoneType::PlayerZone, 1, 2)
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut arena = CardArena::new();
        let a = arena.add(Card::plain("a"));
        let b = arena.add(Card::plain("b"));

        assert_eq!(a, CardId::new(0));
        assert_eq!(b, CardId::new(1));
        assert_eq!(arena.get(b).map(Card::id), Some(b));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_attach_runs_matching_hook() {
        let mut arena = CardArena::new();
        let owner = PlayerId::new(0);
        let id = arena.add(Card::new("loud", Loud).with_owner(owner));

        arena.attach(id, details(), PlacementHook::Play);
        assert_eq!(arena.get(id).and_then(Card::placement), Some(details()));
        assert_eq!(arena.drain_events(), vec![GameEvent::message(Some(owner), "play 2")]);

        arena.detach(id);
        assert!(arena.get(id).and_then(Card::placement).is_none());
        assert_eq!(arena.drain_events(), vec![GameEvent::message(Some(owner), "removed")]);

        arena.attach(id, details(), PlacementHook::Place);
        assert_eq!(arena.drain_events(), vec![GameEvent::message(Some(owner), "place")]);
    }

    #[test]
    fn test_detach_off_table_is_silent() {
        let mut arena = CardArena::new();
        let id = arena.add(Card::new("loud", Loud));

        arena.detach(id);
        assert!(!arena.has_pending_events());
    }

    #[test]
    fn test_check_placeable() {
        let mut arena = CardArena::new();
        let id = arena.add(Card::plain("a"));

        assert_eq!(arena.check_placeable(id), Ok(()));
        assert_eq!(arena.check_placeable(CardId::new(99)), Err(TableError::UnknownCard(CardId::new(99))));

        arena.attach(id, details(), PlacementHook::Place);
        assert_eq!(arena.check_placeable(id), Err(TableError::CardAlreadyOnTable(id)));
    }

    #[test]
    fn test_damage_kills_once() {
        let mut arena = CardArena::new();
        let id = arena.add(Card::new("knight", CharacterCard).with_attr(CharacterCard::HEALTH, 2));
        arena.attach(id, details(), PlacementHook::Play);

        assert_eq!(arena.damage(id, 1), Ok(false));
        assert!(!arena.has_pending_events());

        assert_eq!(arena.damage(id, 1), Ok(true));
        assert_eq!(arena.drain_events(), vec![GameEvent::RemoveFromTable(id)]);

        assert_eq!(arena.damage(id, 1), Ok(false));
        assert!(!arena.has_pending_events());
    }

    #[test]
    fn test_flip_unknown_card() {
        let mut arena = CardArena::new();
        assert_eq!(arena.flip(CardId::new(4)), Err(TableError::UnknownCard(CardId::new(4))));
    }
}
