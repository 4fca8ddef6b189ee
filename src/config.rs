/// External configuration.
///
/// `config.toml` is looked up next to the binary first, then in the current
/// working directory. Every key falls back to its default when the file or
/// the key is absent; a malformed file warns on stderr and runs on defaults.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub map_file: String,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Coordinator pulse: radar sweep + redraw.
    pub tick_ms: u64,
    /// One patrol decision per period.
    pub enemy_step_ms: u64,
    /// How long an activated portal stays open.
    pub portal_open_ms: u64,
    /// Hold after game over so the final message is readable.
    pub game_over_hold_ms: u64,
    /// Radar detection radius in cells (Euclidean, exclusive).
    pub radar_radius: f64,
}

impl GameConfig {
    pub fn load() -> Self {
        let parsed = read_config_text().and_then(|text| {
            toml::from_str::<TomlConfig>(&text)
                .map_err(|e| {
                    eprintln!("Warning: ignoring malformed config.toml: {e}");
                })
                .ok()
        });
        let cfg = parsed.unwrap_or_default();

        GameConfig {
            timing: TimingConfig {
                tick_ms: cfg.timing.tick_ms,
                enemy_step_ms: cfg.timing.enemy_step_ms,
                portal_open_ms: cfg.timing.portal_open_ms,
                game_over_hold_ms: cfg.timing.game_over_hold_ms,
                radar_radius: cfg.timing.radar_radius,
            },
            map_file: cfg.general.map_file,
        }
    }
}

/// First readable `config.toml` from the search directories, if any.
fn read_config_text() -> Option<String> {
    for dir in search_dirs() {
        if let Ok(text) = std::fs::read_to_string(dir.join("config.toml")) {
            return Some(text);
        }
    }
    None
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(dir) = resolved.parent() {
            dirs.push(dir.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    dirs
}

// ── TOML schema, every key individually defaulted ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick")]
    tick_ms: u64,
    #[serde(default = "default_enemy_step")]
    enemy_step_ms: u64,
    #[serde(default = "default_portal_open")]
    portal_open_ms: u64,
    #[serde(default = "default_game_over_hold")]
    game_over_hold_ms: u64,
    #[serde(default = "default_radar_radius")]
    radar_radius: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_map_file")]
    map_file: String,
}

fn default_tick() -> u64 { 100 }
fn default_enemy_step() -> u64 { 500 }
fn default_portal_open() -> u64 { 5_000 }
fn default_game_over_hold() -> u64 { 2_000 }
fn default_radar_radius() -> f64 { 8.0 }
fn default_map_file() -> String { "map.txt".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_ms: default_tick(),
            enemy_step_ms: default_enemy_step(),
            portal_open_ms: default_portal_open(),
            game_over_hold_ms: default_game_over_hold(),
            radar_radius: default_radar_radius(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            map_file: default_map_file(),
        }
    }
}
