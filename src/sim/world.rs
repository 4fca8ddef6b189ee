/// GameState: the single shared aggregate of a running session.
///
/// ## Sharing model
///
/// One `GameState` lives behind `Arc<tokio::sync::Mutex<_>>` for the whole
/// process. The main loop, every patrol task, and every portal task lock it
/// for exactly one logical decision (one agent step, one player action, one
/// radar sweep + render) and release. The mutex is non-reentrant: nothing
/// here ever acquires while holding.
///
/// ## Occupancy model
///
/// The player's position is tracked out-of-band in `player_x`/`player_y`;
/// the player glyph is never written into the grid. Enemies ARE written into
/// the grid (their marker is what collision checks see). Both kinds of mover
/// remember the element they displaced and restore it when they leave — see
/// `swap_occupancy`.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::domain::element::Element;
use crate::domain::Coords;

pub type SharedGame = Arc<Mutex<GameState>>;

/// Mutable record of one patrol enemy, owned by the shared state.
/// The spawned task holds only `(SharedGame, index)` plus the receiving half
/// of the sighting channel; everything it mutates lives here, under the lock.
#[derive(Debug)]
pub struct PatrolEntry {
    pub x: i32,
    pub y: i32,
    /// Horizontal patrol direction, +1 or -1.
    pub dir: i32,
    /// Element this enemy is currently standing on, restored on every move.
    pub displaced: Element,
    /// Present = chasing that coordinate, absent = patrolling.
    pub target: Option<Coords>,
    /// Capacity-1 sighting slot; the radar writes with `try_send`.
    pub sightings: mpsc::Sender<Coords>,
}

/// Record of one portal. The open/closed state is not stored here — it IS
/// the element value of the portal's grid cell.
#[derive(Debug)]
pub struct PortalEntry {
    pub x: i32,
    pub y: i32,
    /// Capacity-1 activation slot; senders use `try_send` and never block.
    pub activations: mpsc::Sender<()>,
}

#[derive(Debug)]
pub struct GameState {
    /// Row-major, rows may have differing lengths (ragged).
    pub grid: Vec<Vec<Element>>,
    pub player_x: i32,
    pub player_y: i32,
    /// Element displaced by the player's last move.
    pub displaced: Element,
    /// Transient status line, cleared at the start of every player action.
    pub status: String,
    /// Termination flag; observed by the main loop only.
    pub over: bool,
    // Append-only agent lists; entries are never removed at runtime, so an
    // index handed to a task stays valid for the process lifetime.
    pub patrols: Vec<PatrolEntry>,
    pub portals: Vec<PortalEntry>,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            grid: vec![],
            player_x: 0,
            player_y: 0,
            displaced: Element::EMPTY,
            status: String::new(),
            over: false,
            patrols: vec![],
            portals: vec![],
        }
    }

    /// Element at (x, y), or None when the coordinate is outside the grid
    /// (negative, row out of range, or column out of range for that row).
    pub fn element_at(&self, x: i32, y: i32) -> Option<Element> {
        if x < 0 || y < 0 {
            return None;
        }
        self.grid
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Passability query. Out-of-range coordinates are simply impassable,
    /// never an error. Performs no locking; the caller holds the lock.
    pub fn can_enter_at(&self, x: i32, y: i32) -> bool {
        match self.element_at(x, y) {
            Some(e) => !e.blocks_entry(),
            None => false,
        }
    }

    /// Overwrite a cell. `(x, y)` must be inside the grid.
    pub fn set_cell(&mut self, x: i32, y: i32, element: Element) {
        self.grid[y as usize][x as usize] = element;
    }

    /// The displaced-element swap shared by every mover: write `restore`
    /// (the mover's previously displaced element) back into the vacated
    /// cell, stamp `marker` into the destination if the mover has a grid
    /// presence, and return what the destination held. Both coordinates
    /// must be inside the grid; callers bounds-check via `can_enter_at`.
    pub fn swap_occupancy(
        &mut self,
        from: Coords,
        to: Coords,
        restore: Element,
        marker: Option<Element>,
    ) -> Element {
        let displaced = self.grid[to.y as usize][to.x as usize];
        self.grid[from.y as usize][from.x as usize] = restore;
        if let Some(marker) = marker {
            self.grid[to.y as usize][to.x as usize] = marker;
        }
        displaced
    }

    /// Flip the termination flag with a final status line.
    pub fn end_game(&mut self, message: &str) {
        self.status = message.to_string();
        self.over = true;
    }
}
