/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// ```toml
/// [rules]
/// level_time_secs = 60
/// enemy_move_interval = 15
/// coin_value = 10
///
/// [timing]
/// frame_ms = 16
/// end_screen_ms = 2000
///
/// [general]
/// levels_dir = "levels"
/// level_files = ["level1.txt", "level2.txt", "level3.txt", "level4.txt", "level5.txt"]
///
/// [gamepad]
/// confirm = ["Start", "A"]
/// cancel = ["Select"]
/// ```

use log::{info, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub frame: Duration,
    pub end_screen: Duration,
    pub gamepad: GamepadConfig,
    pub levels_dir: PathBuf,
    pub level_files: Vec<String>,
}

/// Everything the simulation step needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    pub level_time: Duration,
    pub enemy_move_interval: u32, // ticks between patrol moves
    pub coin_value: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            level_time: Duration::from_secs(default_level_time()),
            enemy_move_interval: default_enemy_interval(),
            coin_value: default_coin_value(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_level_time")]
    level_time_secs: u64,
    #[serde(default = "default_enemy_interval")]
    enemy_move_interval: u32,
    #[serde(default = "default_coin_value")]
    coin_value: u32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_end_screen_ms")]
    end_screen_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_level_files")]
    level_files: Vec<String>,
}

// ── Defaults ──

fn default_level_time() -> u64 { 60 }
fn default_enemy_interval() -> u32 { 15 }  // one patrol step per 15 frames
fn default_coin_value() -> u32 { 10 }
fn default_frame_ms() -> u64 { 16 }        // ~60 FPS
fn default_end_screen_ms() -> u64 { 2000 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_levels_dir() -> String { "levels".into() }
fn default_level_files() -> Vec<String> {
    (1..=5).map(|i| format!("level{i}.txt")).collect()
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            level_time_secs: default_level_time(),
            enemy_move_interval: default_enemy_interval(),
            coin_value: default_coin_value(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame_ms(),
            end_screen_ms: default_end_screen_ms(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            level_files: default_level_files(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Build from config text (no filesystem search for the file itself).
    #[cfg(test)]
    fn from_text(text: &str) -> Self {
        let toml_cfg = parse_toml(text).unwrap_or_default();
        Self::from_toml(toml_cfg, &[])
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve levels directory
        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        let mut level_files = toml_cfg.general.level_files;
        if level_files.is_empty() {
            warn!("config.toml: level_files is empty, using the default five levels");
            level_files = default_level_files();
        }

        let mut interval = toml_cfg.rules.enemy_move_interval;
        if interval == 0 {
            warn!("config.toml: enemy_move_interval must be at least 1");
            interval = 1;
        }

        GameConfig {
            rules: RulesConfig {
                level_time: Duration::from_secs(toml_cfg.rules.level_time_secs),
                enemy_move_interval: interval,
                coin_value: toml_cfg.rules.coin_value,
            },
            frame: Duration::from_millis(toml_cfg.timing.frame_ms),
            end_screen: Duration::from_millis(toml_cfg.timing.end_screen_ms),
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            levels_dir,
            level_files,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/tilemaze)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/tilemaze");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/tilemaze");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn parse_toml(text: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str::<TomlConfig>(text)
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match parse_toml(&text) {
                    Ok(cfg) => {
                        info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_text("");
        assert_eq!(cfg.rules, RulesConfig::default());
        assert_eq!(cfg.rules.level_time, Duration::from_secs(60));
        assert_eq!(cfg.rules.enemy_move_interval, 15);
        assert_eq!(cfg.rules.coin_value, 10);
        assert_eq!(cfg.frame, Duration::from_millis(16));
        assert_eq!(cfg.end_screen, Duration::from_millis(2000));
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
        assert_eq!(cfg.level_files.len(), 5);
        assert_eq!(cfg.level_files[0], "level1.txt");
        assert_eq!(cfg.level_files[4], "level5.txt");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_text("[rules]\ncoin_value = 25\n");
        assert_eq!(cfg.rules.coin_value, 25);
        assert_eq!(cfg.rules.enemy_move_interval, 15);
        assert_eq!(cfg.frame, Duration::from_millis(16));
    }

    #[test]
    fn custom_level_list() {
        let cfg = GameConfig::from_text(
            "[general]\nlevels_dir = \"/opt/mazes\"\nlevel_files = [\"a.txt\", \"b.txt\"]\n",
        );
        assert_eq!(cfg.levels_dir, PathBuf::from("/opt/mazes"));
        assert_eq!(cfg.level_files, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn zero_interval_clamped() {
        let cfg = GameConfig::from_text("[rules]\nenemy_move_interval = 0\n");
        assert_eq!(cfg.rules.enemy_move_interval, 1);
    }

    #[test]
    fn empty_level_list_falls_back() {
        let cfg = GameConfig::from_text("[general]\nlevel_files = []\n");
        assert_eq!(cfg.level_files.len(), 5);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(parse_toml("[rules\ncoin_value = ").is_err());
        assert!(parse_toml("[rules]\ncoin_value = \"ten\"").is_err());
    }
}
