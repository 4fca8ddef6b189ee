/// Map loader.
///
/// ## Sources (priority order):
///   1. Explicit path from the command line — failure to load is fatal
///   2. The configured map path (`map_file` in config.toml)
///   3. The built-in map embedded in the binary
///
/// ## Map format:
///   Plain text, one line per row, one glyph per column. Rows may have
///   differing lengths; missing trailing columns simply do not exist for
///   that row (ragged grid).
///
/// ## Glyph legend:
///   '▤' = Wall            '☠' = Enemy (patrol spawn)
///   '♣' = Vegetation      '☺' = Player start (position only, cell is Empty)
///   '*' = Trap            '.' = Pressure plate
///   '⬱' = Closed portal   anything else = Empty

use std::path::Path;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::GameConfig;
use crate::domain::element::Element;
use crate::domain::Coords;
use crate::sim::world::{GameState, PatrolEntry, PortalEntry};

/// Fallback map compiled into the binary so the game runs out of the box.
const EMBEDDED_MAP: &str = include_str!("../../map.txt");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read map '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("map '{path}' defines no player start")]
    NoPlayerStart { path: String },
}

/// A freshly parsed map: the shared state plus the receiving half of every
/// agent channel, in list order, ready to hand to the spawned tasks.
#[derive(Debug)]
pub struct LoadedMap {
    pub state: GameState,
    pub patrol_channels: Vec<mpsc::Receiver<Coords>>,
    pub portal_channels: Vec<mpsc::Receiver<()>>,
}

/// Resolve the map source and parse it.
/// An explicitly requested map must load; the configured default quietly
/// falls back to the embedded map when missing.
pub fn load(explicit: Option<&str>, config: &GameConfig) -> Result<LoadedMap, LoadError> {
    if let Some(path) = explicit {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        return parse(&text, path);
    }

    let default = &config.map_file;
    if Path::new(default).is_file() {
        if let Ok(text) = std::fs::read_to_string(default) {
            return parse(&text, default);
        }
    }
    parse(EMBEDDED_MAP, "<built-in>")
}

/// Translate map text into the initial entity layout. One capacity-1
/// channel per agent is created here; the senders go into the agent lists,
/// the receivers are returned for the tasks.
pub fn parse(text: &str, origin: &str) -> Result<LoadedMap, LoadError> {
    let mut state = GameState::new();
    let mut patrol_channels = vec![];
    let mut portal_channels = vec![];
    let mut player_found = false;

    for (y, line) in text.lines().enumerate() {
        let mut row = vec![];
        for (x, ch) in line.chars().enumerate() {
            let mut element = Element::EMPTY;
            match ch {
                c if c == Element::WALL.symbol => element = Element::WALL,
                c if c == Element::VEGETATION.symbol => element = Element::VEGETATION,
                c if c == Element::TRAP.symbol => element = Element::TRAP,
                c if c == Element::PRESSURE_PLATE.symbol => element = Element::PRESSURE_PLATE,
                c if c == Element::PLAYER.symbol => {
                    state.player_x = x as i32;
                    state.player_y = y as i32;
                    player_found = true;
                }
                c if c == Element::ENEMY.symbol => {
                    element = Element::ENEMY;
                    let (tx, rx) = mpsc::channel(1);
                    state.patrols.push(PatrolEntry {
                        x: x as i32,
                        y: y as i32,
                        dir: 1,
                        displaced: Element::EMPTY,
                        target: None,
                        sightings: tx,
                    });
                    patrol_channels.push(rx);
                }
                c if c == Element::PORTAL_CLOSED.symbol => {
                    element = Element::PORTAL_CLOSED;
                    let (tx, rx) = mpsc::channel(1);
                    state.portals.push(PortalEntry {
                        x: x as i32,
                        y: y as i32,
                        activations: tx,
                    });
                    portal_channels.push(rx);
                }
                _ => {}
            }
            row.push(element);
        }
        state.grid.push(row);
    }

    if !player_found {
        return Err(LoadError::NoPlayerStart {
            path: origin.to_string(),
        });
    }

    Ok(LoadedMap {
        state,
        patrol_channels,
        portal_channels,
    })
}
