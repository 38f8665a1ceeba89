//! A slice of Dominion: action cards, coins, and the turn cycle.
//!
//! Every round is one player's turn (`PlayerRoundRules`). The action phase
//! plays action cards from hand while "Play Card" actions remain; the
//! cleanup phase discards hand and table, draws a fresh hand, and restores
//! the action allowance. There is no buying; when the round limit is hit
//! the player holding the most coins wins.

use log::debug;

use crate::cards::{Card, CardBehavior, CardId, Deck, HookContext, ResourceCollection};
use crate::core::{GameConfig, PlayerId, Result, TableConfig, ZoneConfig};
use crate::events::GameEvent;
use crate::players::ActionChoices;
use crate::rules::{
    ActionOutcome, BaseRoundRules, Game, GameAction, GameResult, Mediator, Phase, PhaseLogic, PlayerPhase,
    PlayerRoundRules, RoundHooks,
};
use crate::zones::ZoneType;

/// Marks a card as playable with a "Play Card" action.
pub const ACTION: &str = "action";

/// Coins a treasure card is worth.
pub const COINS: &str = "coins";

pub const HAND_SIZE: usize = 5;

/// A Dominion game as built by [`DominionBuilder`].
pub type DominionGame = Game<PlayerRoundRules<DominionHooks>>;

/// +1 card, +2 actions.
#[derive(Clone, Copy, Debug, Default)]
pub struct VillageCard;

impl CardBehavior for VillageCard {
    fn on_play(&self, ctx: &mut HookContext<'_>) {
        if let Some(player) = ctx.owner {
            ctx.raise(GameEvent::DrawCards { player, count: 1 });
            ctx.raise(GameEvent::GainActions { player, action: ActionChoices::PLAY_CARD.to_string(), amount: 2 });
        }
    }
}

/// +3 cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmithyCard;

impl CardBehavior for SmithyCard {
    fn on_play(&self, ctx: &mut HookContext<'_>) {
        if let Some(player) = ctx.owner {
            ctx.raise(GameEvent::DrawCards { player, count: 3 });
        }
    }
}

/// Treasure worth one coin. No hooks.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopperCard;

impl CardBehavior for CopperCard {}

#[must_use]
pub fn village(owner: PlayerId) -> Card {
    Card::new("Village", VillageCard).with_owner(owner).with_attr(ACTION, 1)
}

#[must_use]
pub fn smithy(owner: PlayerId) -> Card {
    Card::new("Smithy", SmithyCard).with_owner(owner).with_attr(ACTION, 1)
}

#[must_use]
pub fn copper(owner: PlayerId) -> Card {
    Card::new("Copper", CopperCard).with_owner(owner).with_attr(COINS, 1)
}

/// Spend one "Play Card" action to play a chosen action card from hand.
///
/// Produces nothing if no actions are left or the hand holds no action card.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayActionCard;

impl GameAction for PlayActionCard {
    fn name(&self) -> &str {
        "Play Action Card"
    }

    fn execute(&self, mediator: &mut Mediator, actor: PlayerId, _targets: &[PlayerId]) -> Result<ActionOutcome> {
        let player = mediator.get_player_by_id(actor)?;
        if player.choices().get(ActionChoices::PLAY_CARD) <= 0 {
            return Ok(ActionOutcome::None);
        }
        let cards = mediator.table().cards();
        let playable: Vec<CardId> = player.hand().iter().filter(|id| cards.attr(*id, ACTION, 0) > 0).collect();
        if playable.is_empty() {
            return Ok(ActionOutcome::None);
        }

        let card = playable[mediator.choose(actor, "play an action card", playable.len())?];
        mediator.player_plays_card(actor, card)?;
        mediator.get_player_mut(actor)?.choices_mut().consume(ActionChoices::PLAY_CARD);
        Ok(ActionOutcome::Card(card))
    }
}

/// Repeats the action until it stops producing cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionPhaseLogic;

impl PhaseLogic for ActionPhaseLogic {
    fn phase_action_logic(
        &mut self,
        mediator: &mut Mediator,
        player: PlayerId,
        action: &dyn GameAction,
    ) -> Result<Option<ActionOutcome>> {
        let mut played = Vec::new();
        while let Some(card) = mediator.tell_player_to_do_action(player, action)?.card() {
            played.push(card);
            if mediator.has_pending_signal() {
                break;
            }
        }
        debug!("{} played {} action cards", player, played.len());
        Ok(Some(ActionOutcome::Cards(played)))
    }
}

/// Discard hand and played cards, draw a new hand, restore actions.
#[derive(Debug, Default)]
pub struct CleanupPhase {
    turn_order: Vec<PlayerId>,
    running: bool,
}

impl CleanupPhase {
    #[must_use]
    pub fn new(turn_order: Vec<PlayerId>) -> Self {
        Self { turn_order, running: false }
    }

    fn clean_up(mediator: &mut Mediator, player: PlayerId) -> Result<()> {
        let area = mediator.player_area(player);
        let played = mediator.table_mut().clear_area(ZoneType::PlayerZone, area)?;

        let p = mediator.get_player_mut(player)?;
        let hand = p.hand_mut().clear();
        let discard = p.discard_mut();
        played.into_iter().chain(hand).for_each(|card| discard.add(card));
        p.choices_mut().reset();

        mediator.player_draws(player, HAND_SIZE)?;
        Ok(())
    }
}

impl Phase for CleanupPhase {
    fn name(&self) -> &str {
        "cleanup"
    }

    fn start_phase(&mut self, mediator: &mut Mediator) -> Result<()> {
        self.running = true;
        for &player in &self.turn_order {
            if mediator.is_active(player) {
                Self::clean_up(mediator, player)?;
            }
        }
        self.end_phase();
        Ok(())
    }

    fn end_phase(&mut self) {
        self.running = false;
    }

    fn update_turn_order(&mut self, order: Vec<PlayerId>) {
        self.turn_order = order;
    }

    fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Scores the game by coins held once the round limit is reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct DominionHooks;

impl DominionHooks {
    /// Coins across a player's hand, deck, and discard pile.
    #[must_use]
    pub fn coins(mediator: &Mediator, player: PlayerId) -> i64 {
        let cards = mediator.table().cards();
        mediator.get_player_by_id(player).map_or(0, |p| {
            p.hand()
                .iter()
                .chain(p.deck().iter())
                .chain(p.discard().iter())
                .map(|id| cards.attr(id, COINS, 0))
                .sum::<i64>()
        })
    }
}

impl RoundHooks for DominionHooks {
    fn final_result(&self, mediator: &Mediator) -> GameResult {
        let scores: Vec<(PlayerId, i64)> = mediator
            .active_players()
            .into_iter()
            .map(|p| (p, Self::coins(mediator, p)))
            .collect();
        let Some(best) = scores.iter().map(|(_, s)| *s).max() else {
            return GameResult::Draw;
        };

        let leaders: Vec<PlayerId> = scores.into_iter().filter(|(_, s)| *s == best).map(|(p, _)| p).collect();
        if leaders.len() == 1 {
            GameResult::Winner(leaders[0])
        } else {
            GameResult::Winners(leaders)
        }
    }
}

/// Action phase then cleanup, one player per round.
#[must_use]
pub fn dominion_rules() -> PlayerRoundRules<DominionHooks> {
    let action = PlayerPhase::with_logic("action", Vec::new(), ActionPhaseLogic).with_action(PlayActionCard);
    PlayerRoundRules::new(
        BaseRoundRules::with_hooks(DominionHooks)
            .with_phase(action)
            .with_phase(CleanupPhase::default()),
    )
}

/// Builder for a Dominion game with starting decks dealt.
#[derive(Clone, Debug)]
pub struct DominionBuilder {
    player_count: usize,
    seed: u64,
    max_rounds: u32,
}

impl Default for DominionBuilder {
    fn default() -> Self {
        Self { player_count: 2, seed: 0, max_rounds: 20 }
    }
}

impl DominionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=6).contains(&count), "Player count must be 2-6");
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.player_count)
            .with_seed(self.seed)
            .with_max_rounds(self.max_rounds)
            .with_table(TableConfig::new().with_zone(ZoneConfig::player()))
    }

    /// Seven Coppers, two Villages and a Smithy each, shuffled, five drawn.
    pub fn build(self) -> Result<DominionGame> {
        let mut mediator = Mediator::new(&self.config());

        for player in PlayerId::all(self.player_count) {
            let table = mediator.table_mut();
            let mut cards: Vec<CardId> = (0..7).map(|_| table.add_card(copper(player))).collect();
            cards.extend((0..2).map(|_| table.add_card(village(player))));
            cards.push(table.add_card(smithy(player)));
            mediator.rng_mut().shuffle(&mut cards);

            let choices = ActionChoices::new().with_base(ActionChoices::PLAY_CARD, 1);
            let p = mediator.get_player_mut(player)?;
            *p.deck_mut() = Deck::from_cards(cards);
            *p.choices_mut() = choices;
            mediator.player_draws(player, HAND_SIZE)?;
        }

        Ok(Game::new(mediator, dominion_rules()))
    }
}
