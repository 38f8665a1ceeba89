//! The mediator: the one place that can resolve a player id.
//!
//! Phases and round rules only hold `PlayerId`s. Everything that touches a
//! player or the table goes through [`Mediator`], which also owns the
//! one-shot round signal and drains card events at checkpoints.
//!
//! ## Checkpoints
//!
//! Events raised by card hooks sit in the arena outbox until
//! [`Mediator::process_events`] runs, which happens after every action the
//! mediator executes. Events are handled in raise order; events raised while
//! handling (a removal hook firing during `RemoveFromTable`) are handled in
//! the same drain.

use im::Vector;
use log::{debug, info, trace, warn};
use rustc_hash::FxHashMap;

use super::action::{ActionOutcome, GameAction};
use crate::cards::{CardId, ResourceCollection};
use crate::core::{ActionRecord, GameConfig, GameError, GameRng, PlayerId, PlayerMap, Result, TableError};
use crate::events::{GameEvent, RoundSignal};
use crate::players::{FirstOption, InputProvider, Player, RandomInput};
use crate::zones::{PlacementDetails, Table, ZoneType};

/// Hub between players, the table, and round rules.
#[derive(Debug)]
pub struct Mediator {
    players: PlayerMap<Player>,
    table: Table,
    turn_order: Vec<PlayerId>,
    round: u32,
    round_state: FxHashMap<String, i64>,
    signal: Option<RoundSignal>,
    history: Vector<ActionRecord>,
    input: Box<dyn InputProvider>,
    rng: GameRng,
    max_rounds: u32,
}

impl Mediator {
    /// Seat the configured players at a table built from the configuration.
    ///
    /// Choices default to [`FirstOption`]; see [`Mediator::with_input`].
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let player_count = config.player_count();
        let players = PlayerMap::new(player_count, |id| {
            let name = config
                .player_names
                .get(id.index())
                .cloned()
                .unwrap_or_else(|| id.to_string());
            Player::new(id, name)
        });

        Self {
            players,
            table: Table::from_config(&config.table, player_count),
            turn_order: PlayerId::all(player_count).collect(),
            round: 0,
            round_state: FxHashMap::default(),
            signal: None,
            history: Vector::new(),
            input: Box::new(FirstOption),
            rng: GameRng::new(config.seed),
            max_rounds: config.max_rounds,
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Make choices at random from a stream forked off the game RNG.
    ///
    /// Deck shuffles keep their own sequence.
    #[must_use]
    pub fn with_random_input(mut self) -> Self {
        let rng = self.rng.fork();
        self.with_input(RandomInput::new(rng))
    }

    /// Replace the table.
    ///
    /// A player zone, if present, must have exactly one area per player.
    pub fn register_table(&mut self, table: Table) -> Result<()> {
        if let Ok(zone) = table.zone(ZoneType::PlayerZone) {
            let players = self.players.player_count();
            if zone.area_count() != players {
                return Err(TableError::PlayerAreaMismatch { areas: zone.area_count(), players }.into());
            }
        }
        self.table = table;
        Ok(())
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().map(|(_, p)| p)
    }

    pub fn get_player_by_id(&self, id: PlayerId) -> Result<&Player> {
        self.players.try_get(id).ok_or(GameError::UnknownPlayer(id))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players.try_get_mut(id).ok_or(GameError::UnknownPlayer(id))
    }

    /// False for unknown and eliminated players.
    #[must_use]
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.players.try_get(id).is_some_and(Player::is_active)
    }

    /// Players still in the game, in seat order.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// The last player standing, if exactly one is left.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.active_players().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Canonical turn order. Eliminated players are dropped from it.
    #[must_use]
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn set_turn_order(&mut self, order: Vec<PlayerId>) -> Result<()> {
        if let Some(&unknown) = order.iter().find(|p| !self.players.contains(**p)) {
            return Err(GameError::UnknownPlayer(unknown));
        }
        self.turn_order = order;
        Ok(())
    }

    /// Eliminate a player.
    ///
    /// The player leaves the turn order. Once one player or fewer remain,
    /// the running round is asked to end.
    pub fn player_lost(&mut self, id: PlayerId) -> Result<()> {
        let player = self.get_player_mut(id)?;
        if !player.is_active() {
            return Ok(());
        }
        player.lose_game();
        self.turn_order.retain(|p| *p != id);
        info!("{} lost the game", id);

        if self.active_players().len() <= 1 {
            self.request_end_round();
        }
        Ok(())
    }

    /// Pick one of `options` choices for a player via the input provider.
    pub fn choose(&mut self, player: PlayerId, prompt: &str, options: usize) -> Result<usize> {
        let choice = self
            .input
            .choose(player, prompt, options)
            .ok_or(GameError::InputExhausted(player))?;
        if choice >= options {
            return Err(GameError::InvalidChoice { choice, options });
        }
        trace!("{} chose {} of {} for {:?}", player, choice, options, prompt);
        Ok(choice)
    }

    // === Actions ===

    /// Have a player execute an action, then process raised events.
    pub fn tell_player_to_do_action(
        &mut self,
        player: PlayerId,
        action: &dyn GameAction,
    ) -> Result<ActionOutcome> {
        self.run_action(player, action, &[])
    }

    pub fn tell_player_to_do_action_against_another_player(
        &mut self,
        player: PlayerId,
        action: &dyn GameAction,
        target: PlayerId,
    ) -> Result<ActionOutcome> {
        self.run_action(player, action, &[target])
    }

    pub fn tell_player_to_do_action_against_multiple_players(
        &mut self,
        player: PlayerId,
        action: &dyn GameAction,
        targets: &[PlayerId],
    ) -> Result<ActionOutcome> {
        self.run_action(player, action, targets)
    }

    fn run_action(
        &mut self,
        player: PlayerId,
        action: &dyn GameAction,
        targets: &[PlayerId],
    ) -> Result<ActionOutcome> {
        self.get_player_by_id(player)?;
        if let Some(&unknown) = targets.iter().find(|t| !self.players.contains(**t)) {
            return Err(GameError::UnknownPlayer(unknown));
        }

        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(player, action.name(), self.round, sequence).with_targets(targets));
        trace!("{} does {} against {:?}", player, action.name(), targets);

        let outcome = action.execute(self, player, targets)?;
        self.process_events()?;
        Ok(outcome)
    }

    /// Actions executed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Cards ===

    /// Area of the player zone that belongs to `player`.
    #[must_use]
    pub fn player_area(&self, player: PlayerId) -> usize {
        player.index()
    }

    /// Play a card from a player's hand to their area, running `on_play`.
    ///
    /// If the table refuses the card it goes back to the hand.
    pub fn player_plays_card(&mut self, player: PlayerId, card: CardId) -> Result<PlacementDetails> {
        if !self.get_player_mut(player)?.take_from_hand(card) {
            return Err(GameError::NotInHand { player, card });
        }

        let area = self.player_area(player);
        match self.table.play_card(ZoneType::PlayerZone, area, card) {
            Ok(details) => {
                self.table.cards_mut().raise(GameEvent::CardPlayed { player: Some(player), card });
                self.process_events()?;
                Ok(details)
            }
            Err(err) => {
                warn!("{} could not play {}: {}", player, card, err);
                self.get_player_mut(player)?.hand_mut().add(card);
                Err(err.into())
            }
        }
    }

    /// Draw up to `count` cards into a player's hand.
    ///
    /// An empty deck is refilled from the shuffled discard pile. Returns the
    /// cards drawn, fewer than `count` if both run out.
    pub fn player_draws(&mut self, player: PlayerId, count: usize) -> Result<Vec<CardId>> {
        let Self { players, rng, .. } = self;
        let p = players.try_get_mut(player).ok_or(GameError::UnknownPlayer(player))?;

        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            if p.deck().is_empty() && !p.discard().is_empty() {
                let discard = p.discard_mut().clear();
                let deck = p.deck_mut();
                discard.into_iter().for_each(|c| deck.add(c));
                deck.shuffle(rng);
                debug!("{} reshuffled discard pile into deck", player);
            }
            match p.draw_card() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        Ok(drawn)
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Handle every pending card event.
    pub fn process_events(&mut self) -> Result<()> {
        while self.table.cards().has_pending_events() {
            for event in self.table.cards_mut().drain_events() {
                self.handle_event(event)?;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: GameEvent) -> Result<()> {
        match event {
            GameEvent::DrawCards { player, count } => {
                self.player_draws(player, count)?;
            }
            GameEvent::GainActions { player, action, amount } => {
                let total = self.get_player_mut(player)?.choices_mut().gain(action.as_str(), amount);
                debug!("{} now has {} {:?}", player, total, action);
            }
            GameEvent::RemoveFromTable(card) => {
                self.table.remove_from_table(card);
            }
            GameEvent::CardDied(card) => debug!("{} died", card),
            GameEvent::CardPlayed { player, card } => trace!("{:?} played {}", player, card),
            GameEvent::PlayerLost(player) => self.player_lost(player)?,
            GameEvent::EndRoundEarly | GameEvent::SkipToPhase(_) => match event.round_signal() {
                Some(RoundSignal::EndRound) => self.request_end_round(),
                Some(RoundSignal::SkipToPhase(index)) => self.request_skip_to_phase(index),
                None => {}
            },
            GameEvent::Message { player: Some(player), text } => info!("{}: {}", player, text),
            GameEvent::Message { player: None, text } => info!("{}", text),
        }
        Ok(())
    }

    // === Rounds ===

    /// Rounds begun so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Reset per-round state and count a new round.
    pub fn begin_round(&mut self) {
        self.round += 1;
        self.round_state.clear();
        self.signal = None;
    }

    /// Round-scoped integer shared between phases. Missing keys read as 0.
    #[must_use]
    pub fn round_state(&self, key: &str) -> i64 {
        self.round_state.get(key).copied().unwrap_or(0)
    }

    pub fn set_round_state(&mut self, key: impl Into<String>, value: i64) {
        self.round_state.insert(key.into(), value);
    }

    /// Ask the round to end after the current action.
    pub fn request_end_round(&mut self) {
        debug!("end of round requested");
        self.signal = Some(RoundSignal::EndRound);
    }

    /// Ask the round to continue at `phase` after the current action.
    ///
    /// A pending end-of-round request wins over a skip.
    pub fn request_skip_to_phase(&mut self, phase: usize) {
        if self.signal != Some(RoundSignal::EndRound) {
            debug!("skip to phase {} requested", phase);
            self.signal = Some(RoundSignal::SkipToPhase(phase));
        }
    }

    #[must_use]
    pub fn has_pending_signal(&self) -> bool {
        self.signal.is_some()
    }

    /// Consume the pending signal.
    pub fn take_signal(&mut self) -> Option<RoundSignal> {
        self.signal.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardBehavior, Deck, HookContext};
    use crate::core::{TableConfig, ZoneConfig};
    use crate::players::ScriptedInput;
    use crate::zones::TableZone;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);
    const P2: PlayerId = PlayerId::new(2);

    fn mediator(players: usize) -> Mediator {
        let config = GameConfig::new(players)
            .with_table(TableConfig::new().with_zone(ZoneConfig::player().with_area_limit(2)));
        Mediator::new(&config)
    }

    #[derive(Debug)]
    struct DrawOnPlay;

    impl CardBehavior for DrawOnPlay {
        fn on_play(&self, ctx: &mut HookContext<'_>) {
            if let Some(player) = ctx.owner {
                ctx.raise(GameEvent::DrawCards { player, count: 1 });
            }
        }
    }

    #[test]
    fn test_unknown_player() {
        let m = mediator(2);
        assert_eq!(m.get_player_by_id(P2).unwrap_err(), GameError::UnknownPlayer(P2));
        assert!(!m.is_active(P2));
    }

    #[test]
    fn test_player_lost_updates_turn_order_and_signals() {
        let mut m = mediator(3);

        m.player_lost(P1).unwrap();
        assert_eq!(m.turn_order(), &[P0, P2]);
        assert!(!m.has_pending_signal());

        m.player_lost(P0).unwrap();
        assert_eq!(m.winner(), Some(P2));
        assert_eq!(m.take_signal(), Some(RoundSignal::EndRound));
    }

    #[test]
    fn test_end_round_beats_skip() {
        let mut m = mediator(2);

        m.request_end_round();
        m.request_skip_to_phase(3);
        assert_eq!(m.take_signal(), Some(RoundSignal::EndRound));
        assert_eq!(m.take_signal(), None);

        m.request_skip_to_phase(1);
        m.request_skip_to_phase(2);
        assert_eq!(m.take_signal(), Some(RoundSignal::SkipToPhase(2)));
    }

    #[test]
    fn test_register_table_checks_player_areas() {
        let mut m = mediator(2);
        let table = Table::new().with_zone(TableZone::new(ZoneType::PlayerZone, 3, None));

        assert_eq!(
            m.register_table(table),
            Err(GameError::Table(TableError::PlayerAreaMismatch { areas: 3, players: 2 }))
        );
        assert!(m.register_table(Table::new()).is_ok());
    }

    #[test]
    fn test_play_card_runs_hook_events() {
        let mut m = mediator(2);
        let village = m.table_mut().add_card(Card::new("draw", DrawOnPlay).with_owner(P0));
        let spare = m.table_mut().add_card(Card::plain("spare"));
        {
            let p = m.get_player_mut(P0).unwrap();
            p.hand_mut().add(village);
            *p.deck_mut() = Deck::from_cards([spare]);
        }

        let details = m.player_plays_card(P0, village).unwrap();

        assert_eq!(details, PlacementDetails::new(ZoneType::PlayerZone, 0, 0));
        assert_eq!(m.get_player_by_id(P0).unwrap().hand().as_slice(), &[spare]);
    }

    #[test]
    fn test_refused_card_returns_to_hand() {
        let mut m = mediator(2);
        let ids: Vec<_> = (0..3).map(|i| m.table_mut().add_card(Card::plain(format!("c{}", i)))).collect();
        for &id in &ids {
            m.get_player_mut(P1).unwrap().hand_mut().add(id);
        }

        m.player_plays_card(P1, ids[0]).unwrap();
        m.player_plays_card(P1, ids[1]).unwrap();
        let err = m.player_plays_card(P1, ids[2]).unwrap_err();

        assert_eq!(err, GameError::Table(TableError::AreaFull { area: 1 }));
        assert!(m.get_player_by_id(P1).unwrap().hand().contains(&ids[2]));
        assert_eq!(
            m.player_plays_card(P1, CardId::new(99)),
            Err(GameError::NotInHand { player: P1, card: CardId::new(99) })
        );
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut m = mediator(2);
        {
            let p = m.get_player_mut(P0).unwrap();
            p.discard_mut().add(CardId::new(1));
            p.discard_mut().add(CardId::new(2));
        }

        let drawn = m.player_draws(P0, 3).unwrap();

        assert_eq!(drawn.len(), 2);
        assert!(m.get_player_by_id(P0).unwrap().discard().is_empty());
    }

    #[test]
    fn test_choose_validates_answers() {
        let mut m = mediator(2).with_input(ScriptedInput::new([1, 5]));

        assert_eq!(m.choose(P0, "pick", 2), Ok(1));
        assert_eq!(m.choose(P0, "pick", 2), Err(GameError::InvalidChoice { choice: 5, options: 2 }));
        assert_eq!(m.choose(P0, "pick", 2), Err(GameError::InputExhausted(P0)));
    }

    #[test]
    fn test_begin_round_resets_state() {
        let mut m = mediator(2);
        m.set_round_state("war", 1);
        m.request_end_round();

        m.begin_round();

        assert_eq!(m.round(), 1);
        assert_eq!(m.round_state("war"), 0);
        assert!(!m.has_pending_signal());
    }

    #[test]
    fn test_random_input_leaves_shuffles_alone() {
        let config = GameConfig::new(2).with_seed(4);
        let mut plain = Mediator::new(&config);
        let mut a = Mediator::new(&config).with_random_input();
        let mut b = Mediator::new(&config).with_random_input();

        let picks: Vec<_> = (0..10).map(|_| a.choose(P0, "pick", 6).unwrap()).collect();
        let again: Vec<_> = (0..10).map(|_| b.choose(P0, "pick", 6).unwrap()).collect();
        assert_eq!(picks, again);

        let mut left: Vec<u32> = (0..20).collect();
        let mut right = left.clone();
        plain.rng_mut().shuffle(&mut left);
        a.rng_mut().shuffle(&mut right);
        assert_eq!(left, right);
    }

    #[test]
    fn test_signal_events_become_round_signals() {
        let mut m = mediator(2);

        m.table_mut().cards_mut().raise(GameEvent::SkipToPhase(2));
        m.process_events().unwrap();
        assert_eq!(m.take_signal(), Some(RoundSignal::SkipToPhase(2)));

        m.table_mut().cards_mut().raise(GameEvent::EndRoundEarly);
        m.table_mut().cards_mut().raise(GameEvent::SkipToPhase(1));
        m.process_events().unwrap();
        assert_eq!(m.take_signal(), Some(RoundSignal::EndRound));
    }
}
