//! Application entry point and subsystem bootstrapper.

mod app;
mod audio;
mod error;
mod game;
mod render;
mod settings;
mod state;

use crate::app::App;
use crate::game::Game;
use crate::settings::GameSettings;

fn main() -> anyhow::Result<()> {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    log::info!("MAIN: Booting Sheepfield...");

    let settings = GameSettings::load();
    let audio = audio::start_thread();

    // A failed init means a missing asset; nothing to do but report and stop.
    let game = Game::new(&settings, audio)?;

    App::run(settings, game)
}
