//! The game shell: a mediator plus the round rules registered with it.

use log::info;
use serde::{Deserialize, Serialize};

use super::mediator::Mediator;
use super::round::RoundRules;
use crate::core::{GameError, PlayerId, Result};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (shared victory).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Runs rounds until a single player is left or the round limit is hit.
pub struct Game<R> {
    mediator: Mediator,
    rules: R,
}

impl<R: RoundRules> Game<R> {
    #[must_use]
    pub fn new(mediator: Mediator, rules: R) -> Self {
        Self { mediator, rules }
    }

    /// Swap in different round rules. Refused while a round runs.
    pub fn register_round_rules(&mut self, rules: R) -> Result<()> {
        if self.rules.is_running() {
            return Err(GameError::RoundInProgress);
        }
        self.rules = rules;
        Ok(())
    }

    #[must_use]
    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    pub fn mediator_mut(&mut self) -> &mut Mediator {
        &mut self.mediator
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    /// Play one round. Returns the result if the game is now over.
    pub fn play_round(&mut self) -> Result<Option<GameResult>> {
        self.rules.start_round(&mut self.mediator)?;
        Ok(self.decided())
    }

    /// Play until the game is decided or `max_rounds` rounds have run.
    pub fn start_game(&mut self) -> Result<GameResult> {
        info!("game starts with {} players", self.mediator.player_count());
        while self.mediator.round() < self.mediator.max_rounds() {
            if let Some(result) = self.decided() {
                return Ok(self.finish(result));
            }
            self.rules.start_round(&mut self.mediator)?;
        }

        let result = self.decided().unwrap_or_else(|| self.rules.final_result(&self.mediator));
        Ok(self.finish(result))
    }

    fn decided(&self) -> Option<GameResult> {
        let active = self.mediator.active_players();
        match active.as_slice() {
            [] => Some(GameResult::Draw),
            [winner] => Some(GameResult::Winner(*winner)),
            _ => None,
        }
    }

    fn finish(&self, result: GameResult) -> GameResult {
        info!("game over after {} rounds: {:?}", self.mediator.round(), result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::rules::{ActionOutcome, BaseRoundRules, GameAction, PlayerPhase};

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));

        let team = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(team.is_winner(PlayerId::new(0)));
        assert!(!team.is_winner(PlayerId::new(1)));
        assert!(team.is_winner(PlayerId::new(2)));
    }

    #[derive(Debug)]
    struct LoseInRound(u32);

    impl GameAction for LoseInRound {
        fn name(&self) -> &str {
            "lose"
        }

        fn execute(&self, m: &mut Mediator, actor: PlayerId, _targets: &[PlayerId]) -> Result<ActionOutcome> {
            if m.round() == self.0 && actor == PlayerId::new(0) {
                m.player_lost(actor)?;
            }
            Ok(ActionOutcome::None)
        }
    }

    fn game(max_rounds: u32, lose_in: u32) -> Game<BaseRoundRules> {
        let config = GameConfig::new(2).with_max_rounds(max_rounds);
        let phase = PlayerPhase::new("p", PlayerId::all(2).collect()).with_action(LoseInRound(lose_in));
        Game::new(Mediator::new(&config), BaseRoundRules::new().with_phase(phase))
    }

    #[test]
    fn test_last_player_standing_wins() {
        let mut game = game(10, 3);
        assert_eq!(game.start_game(), Ok(GameResult::Winner(PlayerId::new(1))));
        assert_eq!(game.mediator().round(), 3);
    }

    #[test]
    fn test_round_limit_is_a_draw() {
        let mut game = game(4, 99);
        assert_eq!(game.start_game(), Ok(GameResult::Draw));
        assert_eq!(game.mediator().round(), 4);
    }
}
