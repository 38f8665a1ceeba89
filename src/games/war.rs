//! War: flip, compare, and go to war on a tie.
//!
//! Each round every player flips their top card face up. The highest card
//! takes everything on the table to the bottom of its owner's deck. On a
//! tie the round skips to the war phase: three cards face down, one face up,
//! then compare again. A player who cannot flip loses.
//!
//! Phases, in order:
//!
//! | Index | Phase            | Runs                                    |
//! |-------|------------------|-----------------------------------------|
//! | 0     | flip             | `FlipTopCard` for everyone, as a wave   |
//! | 1     | compare          | `WarComparePhase`                       |
//! | 2     | war              | only while a war is pending             |

use log::{debug, info};

use crate::cards::{Card, CardId, ResourceCollection};
use crate::core::{GameConfig, PlayerId, Result, TableConfig, ZoneConfig};
use crate::rules::{
    BaseRoundRules, FlipTopCard, Game, HookOutcome, Mediator, Phase, PhaseLogic, PlaceFaceDown, PlayerPhase,
    RoundHooks,
};
use crate::zones::{Table, ZoneType};

/// Card rank attribute, 2 through 14 (ace high).
pub const VALUE: &str = "value";

/// Round-state key set while a tie waits to be fought out.
pub const WAR_PENDING: &str = "war pending";

pub const FLIP_PHASE: usize = 0;
pub const COMPARE_PHASE: usize = 1;
pub const WAR_PHASE: usize = 2;

const SUITS: [&str; 4] = ["Clubs", "Diamonds", "Hearts", "Spades"];

/// A War game as built by [`WarBuilder`].
pub type WarGame = Game<BaseRoundRules<WarHooks>>;

/// Add a standard 52-card deck to the table's arena, face down.
pub fn standard_deck(table: &mut Table) -> Vec<CardId> {
    SUITS
        .iter()
        .flat_map(|suit| (2..=14).map(move |value| (suit, value)))
        .map(|(suit, value)| {
            table.add_card(Card::plain(format!("{} of {}", rank_name(value), suit)).with_attr(VALUE, value).face_down())
        })
        .collect()
}

fn rank_name(value: i64) -> String {
    match value {
        11 => "Jack".to_string(),
        12 => "Queen".to_string(),
        13 => "King".to_string(),
        14 => "Ace".to_string(),
        n => n.to_string(),
    }
}

/// Compares each active player's newest face-up card.
///
/// A single highest card wins the whole table. A tie between the highest
/// cards leaves every card where it is and sends the round to the war phase.
#[derive(Debug, Default)]
pub struct WarComparePhase {
    turn_order: Vec<PlayerId>,
    running: bool,
}

impl WarComparePhase {
    #[must_use]
    pub fn new(turn_order: Vec<PlayerId>) -> Self {
        Self { turn_order, running: false }
    }

    /// Value of the newest face-up card in a player's area.
    fn showing(mediator: &Mediator, player: PlayerId) -> Result<Option<i64>> {
        let table = mediator.table();
        let area = mediator.player_area(player);
        let value = table
            .cards_in_area(ZoneType::PlayerZone, area)?
            .iter()
            .rev()
            .filter_map(|slot| slot.card())
            .filter_map(|id| table.cards().get(id))
            .find(|card| !card.is_face_down())
            .map(|card| card.attr(VALUE, 0));
        Ok(value)
    }

    fn collect(mediator: &mut Mediator, winner: PlayerId) -> Result<()> {
        let won = mediator.table_mut().clear_zone(ZoneType::PlayerZone)?;
        for &card in &won {
            mediator.table_mut().cards_mut().set_face_down(card, true);
        }
        let deck = mediator.get_player_mut(winner)?.deck_mut();
        for card in &won {
            deck.add(*card);
        }
        info!("{} wins {} cards", winner, won.len());
        Ok(())
    }
}

impl Phase for WarComparePhase {
    fn name(&self) -> &str {
        "compare"
    }

    fn start_phase(&mut self, mediator: &mut Mediator) -> Result<()> {
        self.running = true;

        let mut showing = Vec::with_capacity(self.turn_order.len());
        for &player in &self.turn_order {
            if mediator.is_active(player) {
                if let Some(value) = Self::showing(mediator, player)? {
                    showing.push((player, value));
                }
            }
        }

        if let Some(best) = showing.iter().map(|(_, v)| *v).max() {
            let leaders: Vec<PlayerId> = showing.iter().filter(|(_, v)| *v == best).map(|(p, _)| *p).collect();
            if let [winner] = leaders.as_slice() {
                Self::collect(mediator, *winner)?;
                mediator.set_round_state(WAR_PENDING, 0);
            } else {
                debug!("tie at {} between {:?}", best, leaders);
                mediator.set_round_state(WAR_PENDING, 1);
                mediator.request_skip_to_phase(WAR_PHASE);
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

/// Sends a finished war back to the compare phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct WarPhaseLogic;

impl PhaseLogic for WarPhaseLogic {
    fn on_phase_complete(&mut self, mediator: &mut Mediator) -> Result<()> {
        mediator.request_skip_to_phase(COMPARE_PHASE);
        Ok(())
    }
}

/// Skips the war phase unless a tie is waiting.
#[derive(Clone, Copy, Debug, Default)]
pub struct WarHooks;

impl RoundHooks for WarHooks {
    fn next_phase_hook(&mut self, mediator: &mut Mediator, phase: usize) -> Result<HookOutcome> {
        if phase == WAR_PHASE && mediator.round_state(WAR_PENDING) == 0 {
            return Ok(HookOutcome::Handled);
        }
        Ok(HookOutcome::Continue)
    }
}

/// The three War phases for `turn_order`.
pub fn war_rules(turn_order: Vec<PlayerId>) -> BaseRoundRules<WarHooks> {
    let flip = PlayerPhase::new("flip", turn_order.clone()).with_action(FlipTopCard);
    let war = PlayerPhase::with_logic("war", turn_order.clone(), WarPhaseLogic)
        .with_action(PlaceFaceDown { count: 3 })
        .with_action(FlipTopCard);

    BaseRoundRules::with_hooks(WarHooks)
        .with_phase(flip)
        .with_phase(WarComparePhase::new(turn_order))
        .with_phase(war)
}

/// Builder for a shuffled, dealt War game.
#[derive(Clone, Debug)]
pub struct WarBuilder {
    player_count: usize,
    seed: u64,
    max_rounds: u32,
}

impl Default for WarBuilder {
    fn default() -> Self {
        Self { player_count: 2, seed: 0, max_rounds: 1000 }
    }
}

impl WarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=8).contains(&count), "Player count must be 2-8");
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

    /// Configuration the game is built from.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.player_count)
            .with_seed(self.seed)
            .with_max_rounds(self.max_rounds)
            .with_table(TableConfig::new().with_zone(ZoneConfig::player()))
    }

    /// Shuffle one deck and deal it round-robin into the players' decks.
    pub fn build(self) -> Result<WarGame> {
        let mut mediator = Mediator::new(&self.config());
        let mut deck = standard_deck(mediator.table_mut());
        mediator.rng_mut().shuffle(&mut deck);

        let players = PlayerId::all(self.player_count).collect::<Vec<_>>();
        for (i, card) in deck.into_iter().enumerate() {
            mediator.get_player_mut(players[i % players.len()])?.deck_mut().add(card);
        }

        let rules = war_rules(mediator.turn_order().to_vec());
        Ok(Game::new(mediator, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RoundSignal;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    #[test]
    fn test_standard_deck() {
        let mut table = Table::new();
        let deck = standard_deck(&mut table);

        assert_eq!(deck.len(), 52);
        let total: i64 = deck.iter().map(|id| table.cards().attr(*id, VALUE, 0)).sum();
        assert_eq!(total, 4 * (2..=14).sum::<i64>());
        assert_eq!(table.cards().get(deck[12]).map(Card::name), Some("Ace of Clubs"));
    }

    #[test]
    fn test_deal_splits_evenly() {
        let game = WarBuilder::new().seed(3).build().unwrap();
        let m = game.mediator();

        assert_eq!(m.get_player_by_id(P0).unwrap().deck().len(), 26);
        assert_eq!(m.get_player_by_id(P1).unwrap().deck().len(), 26);
    }

    fn show(m: &mut Mediator, player: PlayerId, value: i64) -> CardId {
        let card = m.table_mut().add_card(Card::plain("shown").with_attr(VALUE, value));
        let area = m.player_area(player);
        m.table_mut().play_card(ZoneType::PlayerZone, area, card).unwrap();
        card
    }

    #[test]
    fn test_compare_gives_table_to_highest() {
        let mut m = Mediator::new(&WarBuilder::new().config());
        let low = show(&mut m, P0, 4);
        let high = show(&mut m, P1, 9);
        let mut phase = WarComparePhase::new(vec![P0, P1]);

        phase.start_phase(&mut m).unwrap();

        let deck: Vec<_> = m.get_player_by_id(P1).unwrap().deck().iter().collect();
        assert_eq!(deck.len(), 2);
        assert!(deck.contains(&low) && deck.contains(&high));
        assert_eq!(m.table().card_count(ZoneType::PlayerZone), Ok(0));
        assert!(m.table().cards().get(high).unwrap().is_face_down());
        assert!(!m.has_pending_signal());
    }

    #[test]
    fn test_compare_tie_requests_war() {
        let mut m = Mediator::new(&WarBuilder::new().config());
        show(&mut m, P0, 7);
        show(&mut m, P1, 7);
        let mut phase = WarComparePhase::new(vec![P0, P1]);

        phase.start_phase(&mut m).unwrap();

        assert_eq!(m.round_state(WAR_PENDING), 1);
        assert_eq!(m.take_signal(), Some(RoundSignal::SkipToPhase(WAR_PHASE)));
        assert_eq!(m.table().card_count(ZoneType::PlayerZone), Ok(2));
    }

    #[test]
    fn test_hook_skips_war_without_tie() {
        let mut m = Mediator::new(&WarBuilder::new().config());
        let mut hooks = WarHooks;

        assert_eq!(hooks.next_phase_hook(&mut m, WAR_PHASE), Ok(HookOutcome::Handled));
        assert_eq!(hooks.next_phase_hook(&mut m, FLIP_PHASE), Ok(HookOutcome::Continue));

        m.set_round_state(WAR_PENDING, 1);
        assert_eq!(hooks.next_phase_hook(&mut m, WAR_PHASE), Ok(HookOutcome::Continue));
    }

    #[test]
    fn test_game_keeps_all_cards() {
        let mut game = WarBuilder::new().seed(11).max_rounds(50).build().unwrap();
        for _ in 0..50 {
            if game.play_round().unwrap().is_some() {
                break;
            }
        }

        let m = game.mediator();
        let held: usize = m.players().map(|p| p.card_count()).sum();
        let on_table = m.table().card_count(ZoneType::PlayerZone).unwrap();
        assert_eq!(held + on_table, 52);
    }
}
