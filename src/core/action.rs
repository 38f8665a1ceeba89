//! Action history records.
//!
//! Every action the mediator executes is recorded with the acting player,
//! its targets, and the round/sequence it ran in. The history is what tests
//! (and replays) use to check execution order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;

/// A recorded action with ordering metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action's name.
    pub action: String,

    /// Players the action was directed against.
    /// SmallVec keeps the common 0-3 target case off the heap.
    pub targets: SmallVec<[PlayerId; 3]>,

    /// Round number when the action was taken (starts at 1).
    pub round: u32,

    /// Sequence number within the round.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a record for an untargeted action.
    #[must_use]
    pub fn new(player: PlayerId, action: impl Into<String>, round: u32, sequence: u32) -> Self {
        Self {
            player,
            action: action.into(),
            targets: SmallVec::new(),
            round,
            sequence,
        }
    }

    /// Attach targets (builder pattern).
    #[must_use]
    pub fn with_targets(mut self, targets: &[PlayerId]) -> Self {
        self.targets = SmallVec::from_slice(targets);
        self
    }

    /// Check if this action targeted other players.
    #[must_use]
    pub fn is_targeted(&self) -> bool {
        !self.targets.is_empty()
    }
}
