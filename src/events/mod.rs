//! Event plumbing between cards, players, and round rules.
//!
//! ## Key Types
//!
//! - [`GameEvent`]: something a card or player raised (draw, elimination, ...)
//! - [`RoundSignal`]: one-shot end-round / skip-to-phase request
//! - [`EventQueue`]: FIFO buffer drained synchronously by the mediator
//!
//! Events replace callback subscriptions so that ordering is explicit:
//! they are handled in raise order, at checkpoints, never mid-action.

mod event;

pub use event::{EventQueue, GameEvent, RoundSignal};
