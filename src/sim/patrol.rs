/// Patrol enemy: one task per enemy, two behaviors.
///
/// **Patrolling** — walk horizontally, reverse on any blocked cell.
/// **Chasing** — active while a target coordinate is set; one single-axis
/// step per tick toward the target, larger |delta| axis first, ties along y.
/// Reaching the target drops back to patrolling.
///
/// The task multiplexes a fixed step timer against the sighting channel;
/// whichever is ready first is handled, no fairness guarantee. A sighting
/// always overwrites the current target, even mid-chase. Every decision
/// happens under one lock acquisition.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::domain::element::Element;
use crate::domain::Coords;
use crate::sim::world::{GameState, SharedGame};

const CAUGHT_MESSAGE: &str = "An enemy caught you! Game over.";

/// Agent loop. `idx` is the stable handle into `state.patrols`.
/// The first step fires one full period after spawn.
pub async fn run(
    game: SharedGame,
    idx: usize,
    mut sightings: mpsc::Receiver<Coords>,
    step_period: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + step_period, step_period);
    loop {
        tokio::select! {
            Some(target) = sightings.recv() => {
                game.lock().await.patrols[idx].target = Some(target);
            }
            _ = ticker.tick() => {
                let mut state = game.lock().await;
                step(&mut state, idx);
            }
        }
    }
}

/// One timer decision for the patrol at `idx`. Caller holds the lock.
pub fn step(state: &mut GameState, idx: usize) {
    match state.patrols[idx].target {
        Some(target) => chase(state, idx, target),
        None => patrol(state, idx),
    }
}

fn patrol(state: &mut GameState, idx: usize) {
    let (x, y, dir) = {
        let p = &state.patrols[idx];
        (p.x, p.y, p.dir)
    };
    let nx = x + dir;

    if nx == state.player_x && y == state.player_y {
        state.end_game(CAUGHT_MESSAGE);
        return;
    }
    if state.can_enter_at(nx, y) {
        advance(state, idx, nx, y);
    } else {
        state.patrols[idx].dir = -dir;
    }
}

fn chase(state: &mut GameState, idx: usize, target: Coords) {
    let (x, y) = {
        let p = &state.patrols[idx];
        (p.x, p.y)
    };
    if x == target.x && y == target.y {
        // Sighting reached; go back to patrolling, no move this tick.
        state.patrols[idx].target = None;
        return;
    }

    let (dx, dy) = chase_step(x, y, target);
    let (nx, ny) = (x + dx, y + dy);

    if nx == state.player_x && ny == state.player_y {
        state.end_game(CAUGHT_MESSAGE);
        return;
    }
    if state.can_enter_at(nx, ny) {
        advance(state, idx, nx, ny);
    }
    // Blocked while chasing: stay put. Chase has no persistent direction.
}

/// Single-axis unit step toward `target`: the axis with the larger absolute
/// delta wins, ties go to y.
fn chase_step(x: i32, y: i32, target: Coords) -> (i32, i32) {
    let dx = target.x - x;
    let dy = target.y - y;
    if dx.abs() > dy.abs() {
        (dx.signum(), 0)
    } else {
        (0, dy.signum())
    }
}

/// Swap-move the enemy marker to `(nx, ny)`. Destination already validated.
fn advance(state: &mut GameState, idx: usize, nx: i32, ny: i32) {
    let (from, restore) = {
        let p = &state.patrols[idx];
        (Coords { x: p.x, y: p.y }, p.displaced)
    };
    let to = Coords { x: nx, y: ny };
    let displaced = state.swap_occupancy(from, to, restore, Some(Element::ENEMY));

    let p = &mut state.patrols[idx];
    p.displaced = displaced;
    p.x = nx;
    p.y = ny;
}
