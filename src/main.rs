/// Entry point and coordinator loop.
///
/// One task per concern: this main loop, one per patrol enemy, one per
/// portal, plus a dedicated thread blocking on terminal input. They share
/// the game state through one mutex and otherwise talk only over
/// capacity-1 signal channels.

mod config;
mod domain;
mod sim;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time;

use config::GameConfig;
use domain::InputEvent;
use sim::level::{self, LoadedMap};
use sim::world::SharedGame;
use sim::{action, patrol, portal, radar};
use ui::input;
use ui::renderer::Renderer;

#[tokio::main]
async fn main() {
    let config = GameConfig::load();
    let map_arg = std::env::args().nth(1);

    let loaded = match level::load(map_arg.as_deref(), &config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load map: {e}");
            std::process::exit(1);
        }
    };
    let LoadedMap {
        state,
        patrol_channels,
        portal_channels,
    } = loaded;
    let game: SharedGame = Arc::new(Mutex::new(state));

    // Spawn the agents before the first frame; they idle until their first
    // timer period or activation.
    let enemy_step = Duration::from_millis(config.timing.enemy_step_ms);
    for (idx, rx) in patrol_channels.into_iter().enumerate() {
        tokio::spawn(patrol::run(game.clone(), idx, rx, enemy_step));
    }
    let portal_open = Duration::from_millis(config.timing.portal_open_ms);
    for (idx, rx) in portal_channels.into_iter().enumerate() {
        tokio::spawn(portal::run(game.clone(), idx, rx, portal_open));
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (input_tx, input_rx) = mpsc::channel(8);
    input::spawn_reader(input_tx);

    let result = run_loop(&game, &mut renderer, input_rx, &config).await;

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }
}

/// Multiplex the input channel against the tick timer; first ready wins.
/// Every branch holds the lock for one logical decision, renders while
/// still holding it, and releases before sleeping again.
async fn run_loop(
    game: &SharedGame,
    renderer: &mut Renderer,
    mut input: mpsc::Receiver<InputEvent>,
    config: &GameConfig,
) -> io::Result<()> {
    // The first tick fires immediately and paints the initial frame.
    let mut ticker = time::interval(Duration::from_millis(config.timing.tick_ms));

    loop {
        let finished = tokio::select! {
            Some(event) = input.recv() => {
                let mut state = game.lock().await;
                if !action::execute(&mut state, event) {
                    // Quit: leave at once, no game-over hold.
                    return Ok(());
                }
                renderer.render(&state)?;
                state.over
            }
            _ = ticker.tick() => {
                let state = game.lock().await;
                radar::scan(&state, config.timing.radar_radius);
                renderer.render(&state)?;
                state.over
            }
        };

        if finished {
            // Final frame is already on screen; keep it visible briefly.
            time::sleep(Duration::from_millis(config.timing.game_over_hold_ms)).await;
            return Ok(());
        }
    }
}
