//! Decks, piles, and the resource-collection interface.
//!
//! - [`Deck`]: ordered draw pile (index 0 = bottom, last = top)
//! - [`CardPile`]: a plain list of cards (hands, discards, won cards)
//! - [`ResourceCollection`]: the common add/remove/take/clear surface that
//!   players and actions use without caring which collection they hold

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::CardId;
use crate::core::GameRng;

/// Where to insert a card into a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckPosition {
    /// On top (drawn next).
    Top,
    /// On the bottom.
    Bottom,
    /// At a specific index (0 = bottom). Clamped to the deck size.
    Index(usize),
}

/// Common interface for anything that holds a collection of resources.
pub trait ResourceCollection<T> {
    /// Add an item in the collection's natural position.
    fn add(&mut self, item: T);

    /// Remove a specific item. Returns false if it was not present.
    fn remove(&mut self, item: &T) -> bool;

    /// Take the next item, if any.
    fn take(&mut self) -> Option<T>;

    /// Remove and return everything.
    fn clear(&mut self) -> Vec<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, item: &T) -> bool;
}

/// Ordered draw pile.
///
/// Backed by `im::Vector` so snapshots are cheap and inserts at either end
/// or in the middle stay fast.
///
/// ```
/// use card_table::cards::{CardId, Deck, DeckPosition};
///
/// let mut deck = Deck::from_cards([CardId::new(1), CardId::new(2)]);
/// deck.add_card_to_deck(CardId::new(3), DeckPosition::Bottom, false, None);
///
/// assert_eq!(deck.draw_card(), Some(CardId::new(2)));
/// assert_eq!(deck.draw_bottom(), Some(CardId::new(3)));
/// assert_eq!(deck.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<CardId>,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deck from bottom to top.
    pub fn from_cards(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self { cards: cards.into_iter().collect() }
    }

    /// Draw the top card. `None` when the deck is exhausted.
    pub fn draw_card(&mut self) -> Option<CardId> {
        self.cards.pop_back()
    }

    /// Draw the bottom card.
    pub fn draw_bottom(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    /// Look at the top card without drawing it.
    #[must_use]
    pub fn peek(&self) -> Option<CardId> {
        self.cards.back().copied()
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<CardId> = self.cards.iter().copied().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    /// Insert a card, optionally shuffling afterwards.
    ///
    /// Shuffling needs an RNG; without one `shuffle_after` is ignored.
    pub fn add_card_to_deck(
        &mut self,
        card: CardId,
        position: DeckPosition,
        shuffle_after: bool,
        rng: Option<&mut GameRng>,
    ) {
        match position {
            DeckPosition::Top => self.cards.push_back(card),
            DeckPosition::Bottom => self.cards.push_front(card),
            DeckPosition::Index(i) => {
                let idx = i.min(self.cards.len());
                self.cards.insert(idx, card);
            }
        }

        if shuffle_after {
            if let Some(rng) = rng {
                self.shuffle(rng);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }
}

/// Collected cards go under the pile; `take` draws from the top.
impl ResourceCollection<CardId> for Deck {
    fn add(&mut self, item: CardId) {
        self.cards.push_front(item);
    }

    fn remove(&mut self, item: &CardId) -> bool {
        match self.cards.index_of(item) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    fn take(&mut self) -> Option<CardId> {
        self.draw_card()
    }

    fn clear(&mut self) -> Vec<CardId> {
        std::mem::take(&mut self.cards).into_iter().collect()
    }

    fn len(&self) -> usize {
        self.cards.len()
    }

    fn contains(&self, item: &CardId) -> bool {
        self.cards.contains(item)
    }
}

/// A plain list of cards: hands, discard piles, won cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPile {
    cards: Vec<CardId>,
}

impl CardPile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }
}

impl ResourceCollection<CardId> for CardPile {
    fn add(&mut self, item: CardId) {
        self.cards.push(item);
    }

    fn remove(&mut self, item: &CardId) -> bool {
        match self.cards.iter().position(|c| c == item) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    fn take(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    fn clear(&mut self) -> Vec<CardId> {
        std::mem::take(&mut self.cards)
    }

    fn len(&self) -> usize {
        self.cards.len()
    }

    fn contains(&self, item: &CardId) -> bool {
        self.cards.contains(item)
    }
}
