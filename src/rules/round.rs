//! Round rules: the phase sequencer.
//!
//! A round runs phases in list order from phase 0. Before each phase the
//! game's [`RoundHooks::next_phase_hook`] may claim it; a claimed phase is
//! not started, so exactly one of the hook or the phase acts per step.
//!
//! After each step the mediator's one-shot signal decides what follows:
//!
//! | Signal            | Next                                         |
//! |-------------------|----------------------------------------------|
//! | none              | the following phase, or the end of the round |
//! | `SkipToPhase(n)`  | phase `n`                                    |
//! | `EndRound`        | the round ends                               |
//!
//! ## Key Types
//!
//! - `RoundRules`: what the game shell drives
//! - `BaseRoundRules`: phases for the whole turn order each round
//! - `PlayerRoundRules`: one player's turn per round, rotating

use log::{debug, info};

use super::game::GameResult;
use super::mediator::Mediator;
use super::phase::Phase;
use crate::core::{GameError, PlayerId, Result};
use crate::events::RoundSignal;

/// What a [`RoundHooks::next_phase_hook`] did with the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    /// Start the phase as usual.
    Continue,
    /// The hook dealt with the phase; do not start it.
    Handled,
}

/// Game-specific hooks into round sequencing.
pub trait RoundHooks {
    fn on_round_start(&mut self, _mediator: &mut Mediator) -> Result<()> {
        Ok(())
    }

    /// Inspect shared state before phase `phase` runs.
    fn next_phase_hook(&mut self, _mediator: &mut Mediator, _phase: usize) -> Result<HookOutcome> {
        Ok(HookOutcome::Continue)
    }

    fn on_round_end(&mut self, _mediator: &mut Mediator) -> Result<()> {
        Ok(())
    }

    /// Result once the round limit is reached with several players left.
    fn final_result(&self, _mediator: &Mediator) -> GameResult {
        GameResult::Draw
    }
}

/// Hooks that add nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl RoundHooks for NoHooks {}

/// Drives phases through a round.
pub trait RoundRules {
    /// Reset per-round state and run the round until it ends.
    fn start_round(&mut self, mediator: &mut Mediator) -> Result<()>;

    /// End the round, stopping the current phase early. No-op if not running.
    fn end_round(&mut self, mediator: &mut Mediator) -> Result<()>;

    /// Jump to phase `index` and continue the round from there.
    fn skip_to_phase(&mut self, mediator: &mut Mediator, index: usize) -> Result<()>;

    /// Phase cursor; `None` when no round is running.
    fn current_phase(&self) -> Option<usize>;

    fn phase_count(&self) -> usize;

    fn is_running(&self) -> bool {
        self.current_phase().is_some()
    }

    /// Result once the round limit is reached with several players left.
    fn final_result(&self, _mediator: &Mediator) -> GameResult {
        GameResult::Draw
    }
}

/// Ordered phases run for the mediator's turn order each round.
pub struct BaseRoundRules<H = NoHooks> {
    phases: Vec<Box<dyn Phase>>,
    cursor: Option<usize>,
    turn_order: Vec<PlayerId>,
    hooks: H,
}

impl BaseRoundRules<NoHooks> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(NoHooks)
    }
}

impl Default for BaseRoundRules<NoHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RoundHooks> BaseRoundRules<H> {
    #[must_use]
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            phases: Vec::new(),
            cursor: None,
            turn_order: Vec::new(),
            hooks,
        }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Append a phase. Refused while a round runs.
    pub fn add_phase(&mut self, phase: Box<dyn Phase>) -> Result<()> {
        if self.cursor.is_some() {
            return Err(GameError::RoundInProgress);
        }
        self.phases.push(phase);
        Ok(())
    }

    pub fn phase(&self, index: usize) -> Result<&dyn Phase> {
        self.phases
            .get(index)
            .map(|p| p.as_ref())
            .ok_or(GameError::PhaseOutOfRange { index, count: self.phases.len() })
    }

    /// Turn order last pushed to the phases.
    #[must_use]
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Start a round whose phases run for `order`.
    ///
    /// The order reaches the phases only if it differs from last round's.
    pub fn start_round_with_order(&mut self, mediator: &mut Mediator, order: Vec<PlayerId>) -> Result<()> {
        mediator.begin_round();
        if order != self.turn_order {
            debug!("turn order changed to {:?}", order);
            for phase in &mut self.phases {
                phase.update_turn_order(order.clone());
            }
            self.turn_order = order;
        }

        info!("round {} begins", mediator.round());
        self.hooks.on_round_start(mediator)?;
        self.cursor = Some(0);
        self.next_phase(mediator)
    }

    /// Run phases from the cursor until the round ends.
    ///
    /// An error aborts the round: the current phase is stopped early and the
    /// cursor cleared before the error is returned.
    fn next_phase(&mut self, mediator: &mut Mediator) -> Result<()> {
        while let Some(index) = self.cursor {
            if index >= self.phases.len() {
                return self.finish_round(mediator);
            }
            if let Err(err) = self.step(mediator, index) {
                self.abort(index);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Run phase `index` (or its hook) and act on the signal it left.
    fn step(&mut self, mediator: &mut Mediator, index: usize) -> Result<()> {
        match self.hooks.next_phase_hook(mediator, index)? {
            HookOutcome::Continue => self.phases[index].start_phase(mediator)?,
            HookOutcome::Handled => debug!("phase {} handled by hook", index),
        }
        mediator.process_events()?;

        match mediator.take_signal() {
            None => self.cursor = Some(index + 1),
            Some(RoundSignal::EndRound) => self.end_round(mediator)?,
            Some(RoundSignal::SkipToPhase(target)) => self.jump(target)?,
        }
        Ok(())
    }

    fn abort(&mut self, index: usize) {
        if let Some(phase) = self.phases.get_mut(index) {
            if phase.is_running() {
                phase.end_phase_early();
            }
        }
        self.cursor = None;
        debug!("round aborted in phase {}", index);
    }

    /// Stop the current phase and move the cursor to `target`.
    fn jump(&mut self, target: usize) -> Result<()> {
        if target >= self.phases.len() {
            return Err(GameError::PhaseOutOfRange { index: target, count: self.phases.len() });
        }
        if let Some(phase) = self.cursor.and_then(|i| self.phases.get_mut(i)) {
            phase.end_phase_early();
        }
        debug!("skipping to phase {}", target);
        self.cursor = Some(target);
        Ok(())
    }

    fn finish_round(&mut self, mediator: &mut Mediator) -> Result<()> {
        self.cursor = None;
        info!("round {} complete", mediator.round());
        self.hooks.on_round_end(mediator)
    }
}

impl<H: RoundHooks> RoundRules for BaseRoundRules<H> {
    fn start_round(&mut self, mediator: &mut Mediator) -> Result<()> {
        let order = mediator.turn_order().to_vec();
        self.start_round_with_order(mediator, order)
    }

    fn end_round(&mut self, mediator: &mut Mediator) -> Result<()> {
        let Some(index) = self.cursor.take() else {
            return Ok(());
        };
        if let Some(phase) = self.phases.get_mut(index) {
            phase.end_phase_early();
        }
        info!("round {} ended early", mediator.round());
        self.hooks.on_round_end(mediator)
    }

    fn skip_to_phase(&mut self, mediator: &mut Mediator, index: usize) -> Result<()> {
        self.jump(index)?;
        self.next_phase(mediator)
    }

    fn current_phase(&self) -> Option<usize> {
        self.cursor
    }

    fn phase_count(&self) -> usize {
        self.phases.len()
    }

    fn final_result(&self, mediator: &Mediator) -> GameResult {
        self.hooks.final_result(mediator)
    }
}

/// One player takes a turn per round, in turn order.
///
/// Every phase runs for that player only.
///
/// The next player is the first one seated after the previous player, in the
/// turn order that round started with, who is still in the mediator's turn
/// order. Players eliminated in between are passed over.
pub struct PlayerRoundRules<H = NoHooks> {
    inner: BaseRoundRules<H>,
    seating: Vec<PlayerId>,
    current_player: Option<PlayerId>,
}

impl<H: RoundHooks> PlayerRoundRules<H> {
    #[must_use]
    pub fn new(inner: BaseRoundRules<H>) -> Self {
        Self { inner, seating: Vec::new(), current_player: None }
    }

    /// Who follows the previous player, given the live turn order.
    fn next_player(&self, order: &[PlayerId]) -> Option<PlayerId> {
        let first = order.first().copied()?;
        let Some(last) = self.current_player else {
            return Some(first);
        };
        let Some(seat) = self.seating.iter().position(|&p| p == last) else {
            return Some(first);
        };
        let len = self.seating.len();
        (1..=len)
            .map(|offset| self.seating[(seat + offset) % len])
            .find(|p| order.contains(p))
            .or(Some(first))
    }

    /// Whose turn the current (or last) round is.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.current_player
    }

    #[must_use]
    pub fn inner(&self) -> &BaseRoundRules<H> {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut BaseRoundRules<H> {
        &mut self.inner
    }
}

impl<H: RoundHooks> RoundRules for PlayerRoundRules<H> {
    fn start_round(&mut self, mediator: &mut Mediator) -> Result<()> {
        let order = mediator.turn_order().to_vec();
        let Some(player) = self.next_player(&order) else {
            return Ok(());
        };
        self.seating = order;
        self.current_player = Some(player);

        debug!("turn of {}", player);
        self.inner.start_round_with_order(mediator, vec![player])
    }

    fn end_round(&mut self, mediator: &mut Mediator) -> Result<()> {
        self.inner.end_round(mediator)
    }

    fn skip_to_phase(&mut self, mediator: &mut Mediator, index: usize) -> Result<()> {
        self.inner.skip_to_phase(mediator, index)
    }

    fn current_phase(&self) -> Option<usize> {
        self.inner.current_phase()
    }

    fn phase_count(&self) -> usize {
        self.inner.phase_count()
    }

    fn final_result(&self, mediator: &Mediator) -> GameResult {
        self.inner.final_result(mediator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Phase that logs into a shared journal and may raise a signal.
    struct Logged {
        name: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
        signal: Option<RoundSignal>,
        running: bool,
        order: Vec<PlayerId>,
    }

    impl Logged {
        fn new(name: &'static str, journal: &Rc<RefCell<Vec<String>>>) -> Self {
            Self { name, journal: Rc::clone(journal), signal: None, running: false, order: Vec::new() }
        }

        fn signalling(mut self, signal: RoundSignal) -> Self {
            self.signal = Some(signal);
            self
        }
    }

    impl Phase for Logged {
        fn name(&self) -> &str {
            self.name
        }

        fn start_phase(&mut self, mediator: &mut Mediator) -> Result<()> {
            self.journal.borrow_mut().push(format!("start {}", self.name));
            match self.signal.take() {
                Some(RoundSignal::EndRound) => mediator.request_end_round(),
                Some(RoundSignal::SkipToPhase(n)) => mediator.request_skip_to_phase(n),
                None => return Ok(()),
            }
            self.running = true;
            Ok(())
        }

        fn end_phase(&mut self) {
            self.running = false;
        }

        fn end_phase_early(&mut self) {
            self.journal.borrow_mut().push(format!("early {}", self.name));
            self.end_phase();
        }

        fn update_turn_order(&mut self, order: Vec<PlayerId>) {
            self.order = order;
        }

        fn turn_order(&self) -> &[PlayerId] {
            &self.order
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    fn journal() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries(journal: &Rc<RefCell<Vec<String>>>) -> Vec<String> {
        journal.borrow().clone()
    }

    #[test]
    fn test_phases_run_in_order() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = BaseRoundRules::new().with_phase(Logged::new("a", &j)).with_phase(Logged::new("b", &j));

        rules.start_round(&mut m).unwrap();

        assert_eq!(entries(&j), vec!["start a", "start b"]);
        assert_eq!(rules.current_phase(), None);
        assert_eq!(m.round(), 1);
    }

    #[test]
    fn test_end_round_signal_stops_remaining_phases() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = BaseRoundRules::new()
            .with_phase(Logged::new("a", &j).signalling(RoundSignal::EndRound))
            .with_phase(Logged::new("b", &j));

        rules.start_round(&mut m).unwrap();

        assert_eq!(entries(&j), vec!["start a", "early a"]);
        assert!(!rules.is_running());
    }

    #[test]
    fn test_end_round_is_idempotent() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = BaseRoundRules::new().with_phase(Logged::new("a", &j));
        rules.cursor = Some(0);

        rules.end_round(&mut m).unwrap();
        rules.end_round(&mut m).unwrap();

        assert_eq!(entries(&j), vec!["early a"]);
        assert_eq!(rules.current_phase(), None);
    }

    #[test]
    fn test_skip_signal_jumps() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = BaseRoundRules::new()
            .with_phase(Logged::new("a", &j).signalling(RoundSignal::SkipToPhase(2)))
            .with_phase(Logged::new("b", &j))
            .with_phase(Logged::new("c", &j));

        rules.start_round(&mut m).unwrap();

        assert_eq!(entries(&j), vec!["start a", "early a", "start c"]);
    }

    #[test]
    fn test_skip_out_of_range() {
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = BaseRoundRules::new().with_phase(Logged::new("a", &journal()));

        assert_eq!(
            rules.skip_to_phase(&mut m, 3),
            Err(GameError::PhaseOutOfRange { index: 3, count: 1 })
        );
    }

    struct SkipSecond;

    impl RoundHooks for SkipSecond {
        fn next_phase_hook(&mut self, _m: &mut Mediator, phase: usize) -> Result<HookOutcome> {
            Ok(if phase == 1 { HookOutcome::Handled } else { HookOutcome::Continue })
        }
    }

    #[test]
    fn test_handled_phase_is_not_started() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = BaseRoundRules::with_hooks(SkipSecond)
            .with_phase(Logged::new("a", &j))
            .with_phase(Logged::new("b", &j))
            .with_phase(Logged::new("c", &j));

        rules.start_round(&mut m).unwrap();

        assert_eq!(entries(&j), vec!["start a", "start c"]);
    }

    #[test]
    fn test_turn_order_propagates_on_change() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(3));
        let mut rules = BaseRoundRules::new().with_phase(Logged::new("a", &j));

        rules.start_round(&mut m).unwrap();
        assert_eq!(rules.phase(0).unwrap().turn_order().len(), 3);

        m.player_lost(PlayerId::new(1)).unwrap();
        rules.start_round(&mut m).unwrap();

        assert_eq!(rules.phase(0).unwrap().turn_order(), &[PlayerId::new(0), PlayerId::new(2)]);
        assert_eq!(rules.turn_order(), &[PlayerId::new(0), PlayerId::new(2)]);
    }

    #[test]
    fn test_player_rounds_rotate() {
        let j = journal();
        let mut m = Mediator::new(&GameConfig::new(2));
        let mut rules = PlayerRoundRules::new(BaseRoundRules::new().with_phase(Logged::new("a", &j)));

        rules.start_round(&mut m).unwrap();
        assert_eq!(rules.current_player(), Some(PlayerId::new(0)));
        assert_eq!(rules.inner().phase(0).unwrap().turn_order(), &[PlayerId::new(0)]);

        rules.start_round(&mut m).unwrap();
        assert_eq!(rules.current_player(), Some(PlayerId::new(1)));
        assert_eq!(rules.inner().phase(0).unwrap().turn_order(), &[PlayerId::new(1)]);
    }

    #[test]
    fn test_add_phase_refused_mid_round() {
        let mut rules = BaseRoundRules::new();
        rules.cursor = Some(0);
        assert_eq!(
            rules.add_phase(Box::new(Logged::new("a", &journal()))).unwrap_err(),
            GameError::RoundInProgress
        );
    }
}
