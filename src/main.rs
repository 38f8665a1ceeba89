//! Plays one seeded game of War and logs the outcome.
//!
//! Set `RUST_LOG=debug` (or `trace`) to follow the rounds.

use log::{error, info};

use card_table::games::WarBuilder;
use card_table::GameResult;

const SEED: u64 = 0x5EED;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut game = match WarBuilder::new().seed(SEED).build() {
        Ok(game) => game,
        Err(err) => {
            error!("could not set up the game: {}", err);
            std::process::exit(1);
        }
    };

    match game.start_game() {
        Ok(GameResult::Winner(player)) => info!("{} wins", player),
        Ok(GameResult::Winners(players)) => info!("shared win: {:?}", players),
        Ok(GameResult::Draw) => info!("draw after {} rounds", game.mediator().round()),
        Err(err) => {
            error!("game aborted: {}", err);
            std::process::exit(1);
        }
    }
}
