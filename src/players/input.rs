//! Player decisions.
//!
//! Whenever a rule needs a player to pick something, the mediator asks its
//! [`InputProvider`]. Providers are synchronous; a human front end would
//! block inside `choose`, a test feeds a script.

use std::collections::VecDeque;
use std::fmt::Debug;

use crate::core::{GameRng, PlayerId};

/// Source of player choices.
pub trait InputProvider: Debug {
    /// Pick one of `options` choices (`0..options`) for `player`.
    ///
    /// `None` means the provider has nothing more to say.
    fn choose(&mut self, player: PlayerId, prompt: &str, options: usize) -> Option<usize>;
}

/// Replays a fixed list of answers, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<usize>,
}

impl ScriptedInput {
    pub fn new(answers: impl IntoIterator<Item = usize>) -> Self {
        Self { answers: answers.into_iter().collect() }
    }

    /// Answers not yet given.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputProvider for ScriptedInput {
    fn choose(&mut self, _player: PlayerId, _prompt: &str, _options: usize) -> Option<usize> {
        self.answers.pop_front()
    }
}

/// Always picks the first option.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOption;

impl InputProvider for FirstOption {
    fn choose(&mut self, _player: PlayerId, _prompt: &str, options: usize) -> Option<usize> {
        (options > 0).then_some(0)
    }
}

/// Uniform random choices from a seeded RNG.
#[derive(Clone, Debug)]
pub struct RandomInput {
    rng: GameRng,
}

impl RandomInput {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl InputProvider for RandomInput {
    fn choose(&mut self, _player: PlayerId, _prompt: &str, options: usize) -> Option<usize> {
        (options > 0).then(|| self.rng.gen_range_usize(0..options))
    }
}
