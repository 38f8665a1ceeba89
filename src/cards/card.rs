//! Cards and their lifecycle hooks.
//!
//! A `Card` is an identity object living in the [`CardArena`](super::CardArena).
//! Decks, hands, and table areas only hold its [`CardId`]; a card is moved
//! between them, never copied.
//!
//! Per-card-type behavior goes through [`CardBehavior`]. Hooks receive a
//! [`HookContext`] describing where the card sits and can raise events, but
//! never reach into the table or players directly.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::events::{EventQueue, GameEvent};
use crate::zones::PlacementDetails;

/// Arena identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Everything a hook may look at, plus an outlet for events.
pub struct HookContext<'a> {
    /// The card the hook is running for.
    pub card: CardId,
    /// The card's owner, if any.
    pub owner: Option<PlayerId>,
    /// Where the card was placed (for removal: where it was).
    pub details: PlacementDetails,
    attributes: &'a FxHashMap<String, i64>,
    events: &'a mut EventQueue,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        card: &'a Card,
        details: PlacementDetails,
        events: &'a mut EventQueue,
    ) -> Self {
        Self {
            card: card.id,
            owner: card.owner,
            details,
            attributes: &card.attributes,
            events,
        }
    }

    /// Read an attribute of the card with a default.
    #[must_use]
    pub fn attr(&self, key: &str, default: i64) -> i64 {
        self.attributes.get(key).copied().unwrap_or(default)
    }

    /// Raise an event for the mediator to handle.
    pub fn raise(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Lifecycle hooks for a card type.
///
/// All hooks default to doing nothing. The table invokes exactly one hook
/// per successful placement or removal.
pub trait CardBehavior: std::fmt::Debug {
    /// Called after the card is *played* onto the table.
    fn on_play(&self, ctx: &mut HookContext<'_>) {
        let _ = ctx;
    }

    /// Called after the card is *placed* onto the table (no play effect).
    fn on_place(&self, ctx: &mut HookContext<'_>) {
        let _ = ctx;
    }

    /// Called after the card is removed from the table.
    fn on_removal(&self, ctx: &mut HookContext<'_>) {
        let _ = ctx;
    }
}

/// A card with no hooks (War cards, treasures).
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainCard;

impl CardBehavior for PlainCard {}

/// A card with health. Dying takes it off the table.
///
/// Damage is tracked in the `health` attribute by
/// [`CardArena::damage`](super::CardArena::damage); the removal hook reports
/// the death once the table has let go of the card.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharacterCard;

impl CharacterCard {
    pub const HEALTH: &'static str = "health";
}

impl CardBehavior for CharacterCard {
    fn on_removal(&self, ctx: &mut HookContext<'_>) {
        if ctx.attr(Self::HEALTH, 1) <= 0 {
            ctx.raise(GameEvent::CardDied(ctx.card));
        }
    }
}

/// A card instance.
#[derive(Debug)]
pub struct Card {
    pub(crate) id: CardId,
    name: String,
    face_down: bool,
    owner: Option<PlayerId>,
    placement: Option<PlacementDetails>,
    attributes: FxHashMap<String, i64>,
    behavior: Box<dyn CardBehavior>,
}

impl Card {
    /// Create a face-up, unowned card. The arena assigns its id.
    pub fn new(name: impl Into<String>, behavior: impl CardBehavior + 'static) -> Self {
        Self {
            id: CardId(u32::MAX),
            name: name.into(),
            face_down: false,
            owner: None,
            placement: None,
            attributes: FxHashMap::default(),
            behavior: Box::new(behavior),
        }
    }

    /// A card without hooks.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, PlainCard)
    }

    /// Set the owner (builder pattern).
    #[must_use]
    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Add an integer attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: i64) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Start face down (builder pattern).
    #[must_use]
    pub fn face_down(mut self) -> Self {
        self.face_down = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_face_down(&self) -> bool {
        self.face_down
    }

    /// Turn the card over.
    pub fn flip(&mut self) {
        self.face_down = !self.face_down;
    }

    /// Force an orientation.
    pub fn set_face_down(&mut self, face_down: bool) {
        self.face_down = face_down;
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }

    /// Where the card sits on the table, if it is on the table.
    #[must_use]
    pub fn placement(&self) -> Option<PlacementDetails> {
        self.placement
    }

    #[must_use]
    pub fn is_on_table(&self) -> bool {
        self.placement.is_some()
    }

    /// Get an attribute with a default.
    #[must_use]
    pub fn attr(&self, key: &str, default: i64) -> i64 {
        self.attributes.get(key).copied().unwrap_or(default)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: i64) {
        self.attributes.insert(key.into(), value);
    }

    /// Modify an attribute by delta, returning the new value.
    pub fn modify_attr(&mut self, key: &str, delta: i64) -> i64 {
        let value = self.attr(key, 0) + delta;
        self.attributes.insert(key.to_string(), value);
        value
    }

    pub(crate) fn behavior(&self) -> &dyn CardBehavior {
        self.behavior.as_ref()
    }

    pub(crate) fn set_placement(&mut self, placement: Option<PlacementDetails>) {
        self.placement = placement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::ZoneType;

    #[test]
    fn test_card_builder() {
        let card = Card::plain("Five of Hearts")
            .with_owner(PlayerId::new(1))
            .with_attr("value", 5)
            .face_down();

        assert_eq!(card.name(), "Five of Hearts");
        assert_eq!(card.owner(), Some(PlayerId::new(1)));
        assert_eq!(card.attr("value", 0), 5);
        assert_eq!(card.attr("missing", -1), -1);
        assert!(card.is_face_down());
        assert!(!card.is_on_table());
    }

    #[test]
    fn test_flip() {
        let mut card = Card::plain("Ace");
        assert!(!card.is_face_down());
        card.flip();
        assert!(card.is_face_down());
        card.flip();
        assert!(!card.is_face_down());
    }

    #[test]
    fn test_modify_attr() {
        let mut card = Card::new("Knight", CharacterCard).with_attr(CharacterCard::HEALTH, 3);
        assert_eq!(card.modify_attr(CharacterCard::HEALTH, -2), 1);
        assert_eq!(card.attr(CharacterCard::HEALTH, 0), 1);
    }

    #[test]
    fn test_character_reports_death_only_when_dead() {
        let details = PlacementDetails::new(ZoneType::PlayerZone, 0, 0);
        let mut events = EventQueue::new();

        let alive = Card::new("Knight", CharacterCard).with_attr(CharacterCard::HEALTH, 2);
        alive.behavior().on_removal(&mut HookContext::new(&alive, details, &mut events));
        assert!(events.is_empty());

        let dead = Card::new("Knight", CharacterCard).with_attr(CharacterCard::HEALTH, 0);
        dead.behavior().on_removal(&mut HookContext::new(&dead, details, &mut events));
        assert_eq!(events.drain(), vec![GameEvent::CardDied(dead.id())]);
    }
}
