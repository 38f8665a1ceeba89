//! Seated players and their card collections.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardPile, Deck, ResourceCollection};
use crate::core::PlayerId;

/// Named per-turn action allowances ("Play Card", "Buy", ...).
///
/// `base` is what a fresh turn starts with; `current` is what is left.
///
/// ```
/// use card_table::players::ActionChoices;
///
/// let mut choices = ActionChoices::new().with_base(ActionChoices::PLAY_CARD, 1);
/// assert!(choices.consume(ActionChoices::PLAY_CARD));
/// assert!(!choices.consume(ActionChoices::PLAY_CARD));
///
/// choices.reset();
/// assert_eq!(choices.get(ActionChoices::PLAY_CARD), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionChoices {
    base: FxHashMap<String, i64>,
    current: FxHashMap<String, i64>,
}

impl ActionChoices {
    /// Allowance for playing a card from hand.
    pub const PLAY_CARD: &'static str = "Play Card";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-turn allowance of an action. Also sets the current count.
    #[must_use]
    pub fn with_base(mut self, action: impl Into<String>, count: i64) -> Self {
        let action = action.into();
        self.current.insert(action.clone(), count);
        self.base.insert(action, count);
        self
    }

    /// Remaining uses. Unknown actions have none.
    #[must_use]
    pub fn get(&self, action: &str) -> i64 {
        self.current.get(action).copied().unwrap_or(0)
    }

    pub fn set(&mut self, action: impl Into<String>, count: i64) {
        self.current.insert(action.into(), count);
    }

    /// Add uses (negative `amount` removes them). Returns the new count.
    pub fn gain(&mut self, action: impl Into<String>, amount: i64) -> i64 {
        let count = self.current.entry(action.into()).or_insert(0);
        *count += amount;
        *count
    }

    /// Spend one use. Returns false, spending nothing, if none are left.
    pub fn consume(&mut self, action: &str) -> bool {
        match self.current.get_mut(action) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Restore the per-turn allowances.
    pub fn reset(&mut self) {
        self.current = self.base.clone();
    }
}

/// A seated player: hand, draw deck, discard pile, action allowances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: CardPile,
    deck: Deck,
    discard: CardPile,
    active: bool,
    choices: ActionChoices,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: CardPile::new(),
            deck: Deck::new(),
            discard: CardPile::new(),
            active: true,
            choices: ActionChoices::new(),
        }
    }

    #[must_use]
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn with_action_choices(mut self, choices: ActionChoices) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the player as eliminated.
    pub fn lose_game(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn hand(&self) -> &CardPile {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut CardPile {
        &mut self.hand
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    #[must_use]
    pub fn discard(&self) -> &CardPile {
        &self.discard
    }

    pub fn discard_mut(&mut self) -> &mut CardPile {
        &mut self.discard
    }

    #[must_use]
    pub fn choices(&self) -> &ActionChoices {
        &self.choices
    }

    pub fn choices_mut(&mut self) -> &mut ActionChoices {
        &mut self.choices
    }

    /// Move the top card of the deck into hand.
    ///
    /// `None` when the deck is empty; the discard pile is not touched.
    pub fn draw_card(&mut self) -> Option<CardId> {
        let card = self.deck.draw_card()?;
        self.hand.add(card);
        Some(card)
    }

    /// Take a specific card out of hand. False if it is not there.
    pub fn take_from_hand(&mut self, card: CardId) -> bool {
        self.hand.remove(&card)
    }

    /// Cards the player holds off the table.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.deck.len() + self.discard.len()
    }
}
