//! Phases: one step of a round.
//!
//! A phase drives a list of actions for the players in its turn order.
//! [`PlayerPhase`] is the general implementation:
//!
//! - one player: every action in order, stopping once the player is eliminated
//! - several players, [`PhaseMode::Wave`]: action 0 for everyone in turn
//!   order, then action 1 for everyone, and so on
//! - several players, [`PhaseMode::TurnBased`]: every action for the first
//!   player, then every action for the next
//!
//! Eliminated players are skipped. A pending round signal (end of round,
//! skip to phase) stops the phase after the current action and leaves it
//! running; the round rules then end it early.
//!
//! Turn-order updates requested while the phase runs are held until the
//! phase ends, so an elimination never disturbs an iteration in progress.

use log::{debug, trace};

use super::action::{ActionOutcome, GameAction};
use super::mediator::Mediator;
use crate::core::{GameError, PlayerId, Result};

/// One step of a round.
pub trait Phase {
    fn name(&self) -> &str;

    /// Run the phase to completion or until a round signal is pending.
    fn start_phase(&mut self, mediator: &mut Mediator) -> Result<()>;

    /// Reset cursors and apply any pending turn-order update.
    fn end_phase(&mut self);

    /// Stop a phase that a round signal interrupted.
    fn end_phase_early(&mut self) {
        self.end_phase();
    }

    /// Replace the players this phase runs for.
    ///
    /// While the phase is running the update waits for the phase to end.
    fn update_turn_order(&mut self, order: Vec<PlayerId>);

    /// Players this phase runs for.
    fn turn_order(&self) -> &[PlayerId];

    fn is_running(&self) -> bool;
}

/// How a multi-player phase interleaves actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhaseMode {
    /// Action `i` for every player before action `i + 1`.
    #[default]
    Wave,
    /// All actions for one player before the next player.
    TurnBased,
}

/// Game-specific hooks into a [`PlayerPhase`].
pub trait PhaseLogic {
    /// Called once before any action runs.
    fn on_phase_start(&mut self, _mediator: &mut Mediator, _turn_order: &[PlayerId]) -> Result<()> {
        Ok(())
    }

    /// Intercept an action.
    ///
    /// Return `Some(outcome)` to handle the action here instead of having the
    /// mediator run it.
    fn phase_action_logic(
        &mut self,
        _mediator: &mut Mediator,
        _player: PlayerId,
        _action: &dyn GameAction,
    ) -> Result<Option<ActionOutcome>> {
        Ok(None)
    }

    /// See each action's outcome, whoever ran it.
    fn on_action_outcome(
        &mut self,
        _mediator: &mut Mediator,
        _player: PlayerId,
        _outcome: &ActionOutcome,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when every action ran without a round signal interrupting.
    fn on_phase_complete(&mut self, _mediator: &mut Mediator) -> Result<()> {
        Ok(())
    }
}

/// Phase logic that adds nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultLogic;

impl PhaseLogic for DefaultLogic {}

/// Runs a list of actions for the players in its turn order.
#[derive(Debug)]
pub struct PlayerPhase<L = DefaultLogic> {
    name: String,
    mode: PhaseMode,
    actions: Vec<Box<dyn GameAction>>,
    turn_order: Vec<PlayerId>,
    pending_turn_order: Option<Vec<PlayerId>>,
    current_action: Option<usize>,
    current_player: Option<usize>,
    logic: L,
}

impl PlayerPhase<DefaultLogic> {
    /// A wave phase with no extra logic.
    #[must_use]
    pub fn new(name: impl Into<String>, turn_order: Vec<PlayerId>) -> Self {
        Self::with_logic(name, turn_order, DefaultLogic)
    }

    /// A turn-based phase with no extra logic.
    #[must_use]
    pub fn turn_based(name: impl Into<String>, turn_order: Vec<PlayerId>) -> Self {
        Self::new(name, turn_order).with_mode(PhaseMode::TurnBased)
    }
}

impl<L: PhaseLogic> PlayerPhase<L> {
    #[must_use]
    pub fn with_logic(name: impl Into<String>, turn_order: Vec<PlayerId>, logic: L) -> Self {
        Self {
            name: name.into(),
            mode: PhaseMode::default(),
            actions: Vec::new(),
            turn_order,
            pending_turn_order: None,
            current_action: None,
            current_player: None,
            logic,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PhaseMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl GameAction + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Replace the action list. Refused while the phase runs.
    pub fn set_actions(&mut self, actions: Vec<Box<dyn GameAction>>) -> Result<()> {
        if self.is_running() {
            return Err(GameError::RoundInProgress);
        }
        self.actions = actions;
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> PhaseMode {
        self.mode
    }

    #[must_use]
    pub fn actions(&self) -> &[Box<dyn GameAction>] {
        &self.actions
    }

    /// Index of the action being run.
    #[must_use]
    pub fn current_action(&self) -> Option<usize> {
        self.current_action
    }

    /// Turn-order position of the player being served.
    #[must_use]
    pub fn current_player(&self) -> Option<usize> {
        self.current_player
    }

    /// Turn order waiting for the phase to end.
    #[must_use]
    pub fn pending_turn_order(&self) -> Option<&[PlayerId]> {
        self.pending_turn_order.as_deref()
    }

    #[must_use]
    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    /// Run one action for one player. Returns true if a round signal is pending.
    fn step(&mut self, mediator: &mut Mediator, action: usize, position: usize) -> Result<bool> {
        let player = self.turn_order[position];
        self.current_action = Some(action);
        self.current_player = Some(position);

        let action = self.actions[action].as_ref();
        trace!("{}: {} for {}", self.name, action.name(), player);

        let outcome = match self.logic.phase_action_logic(mediator, player, action)? {
            Some(outcome) => outcome,
            None => mediator.tell_player_to_do_action(player, action)?,
        };
        self.logic.on_action_outcome(mediator, player, &outcome)?;
        Ok(mediator.has_pending_signal())
    }

    /// Start hook, actions, then completion hook. `true` if a signal cut it short.
    fn drive(&mut self, mediator: &mut Mediator) -> Result<bool> {
        let order = self.turn_order.clone();
        self.logic.on_phase_start(mediator, &order)?;
        if self.run(mediator)? {
            return Ok(true);
        }
        self.logic.on_phase_complete(mediator)?;
        Ok(false)
    }

    fn run(&mut self, mediator: &mut Mediator) -> Result<bool> {
        let players = self.turn_order.len();
        let actions = self.actions.len();

        if players == 1 {
            for a in 0..actions {
                if !mediator.is_active(self.turn_order[0]) {
                    debug!("{}: {} is out, skipping the rest", self.name, self.turn_order[0]);
                    break;
                }
                if self.step(mediator, a, 0)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        match self.mode {
            PhaseMode::Wave => {
                for a in 0..actions {
                    for p in 0..players {
                        if mediator.is_active(self.turn_order[p]) && self.step(mediator, a, p)? {
                            return Ok(true);
                        }
                    }
                }
            }
            PhaseMode::TurnBased => {
                for p in 0..players {
                    for a in 0..actions {
                        if !mediator.is_active(self.turn_order[p]) {
                            break;
                        }
                        if self.step(mediator, a, p)? {
                            return Ok(true);
                        }
                    }
                }
            }
        }
        Ok(false)
    }
}

impl<L: PhaseLogic> Phase for PlayerPhase<L> {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_phase(&mut self, mediator: &mut Mediator) -> Result<()> {
        debug!("{}: start for {:?}", self.name, self.turn_order);
        self.current_action = Some(0);
        match self.drive(mediator) {
            Ok(true) => {
                debug!("{}: interrupted by round signal", self.name);
                Ok(())
            }
            Ok(false) => {
                self.end_phase();
                Ok(())
            }
            Err(err) => {
                debug!("{}: stopped by error: {}", self.name, err);
                self.end_phase_early();
                Err(err)
            }
        }
    }

    fn end_phase(&mut self) {
        self.current_action = None;
        self.current_player = None;
        if let Some(order) = self.pending_turn_order.take() {
            debug!("{}: turn order now {:?}", self.name, order);
            self.turn_order = order;
        }
    }

    fn update_turn_order(&mut self, order: Vec<PlayerId>) {
        if self.is_running() {
            self.pending_turn_order = Some(order);
        } else {
            self.turn_order = order;
        }
    }

    fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    fn is_running(&self) -> bool {
        self.current_action.is_some()
    }
}
