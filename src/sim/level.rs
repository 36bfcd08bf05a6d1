/// Level loader and level progression.
///
/// ## Sources (priority order):
///   1. `levels/` directory: the configured `level_files`, in order
///   2. Built-in embedded levels (only when the directory does not exist)
///
/// If the directory exists, every configured file must be present: a missing
/// file is a `MissingLevelFile` error at the moment that level is loaded,
/// never a silent fallback.
///
/// ## Tile legend:
///   'W' = Wall          'P' = Player start
///   'G' = Goal          'C' = Coin
///   'E' = Enemy         anything else = Floor

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::GameConfig;
use crate::domain::grid::MazeGrid;
use crate::error::LevelError;
use super::world::{GameOutcome, GameSession};

/// Where the levels come from.
#[derive(Clone, Debug)]
pub enum LevelSource {
    Files(Vec<PathBuf>),
    Embedded,
}

/// Ordered list of levels; each one is read and parsed on demand.
#[derive(Clone, Debug)]
pub struct LevelSet {
    source: LevelSource,
}

impl LevelSet {
    /// Choose the level source from config.
    pub fn from_config(config: &GameConfig) -> Self {
        if config.levels_dir.is_dir() {
            info!("using levels from {}", config.levels_dir.display());
            LevelSet::from_dir(&config.levels_dir, &config.level_files)
        } else {
            info!(
                "{} not found, using built-in levels",
                config.levels_dir.display()
            );
            LevelSet::embedded()
        }
    }

    pub fn from_dir(dir: &Path, files: &[String]) -> Self {
        LevelSet {
            source: LevelSource::Files(files.iter().map(|f| dir.join(f)).collect()),
        }
    }

    pub fn embedded() -> Self {
        LevelSet { source: LevelSource::Embedded }
    }

    pub fn len(&self) -> usize {
        match &self.source {
            LevelSource::Files(paths) => paths.len(),
            LevelSource::Embedded => EMBEDDED.len(),
        }
    }

    /// Read and parse level `index`.
    pub fn load(&self, index: usize) -> Result<MazeGrid, LevelError> {
        let total = self.len();
        if index >= total {
            return Err(LevelError::LevelOutOfRange { index, total });
        }
        match &self.source {
            LevelSource::Files(paths) => load_file(&paths[index]),
            LevelSource::Embedded => {
                let (name, rows) = EMBEDDED[index];
                MazeGrid::parse(name, rows)
            }
        }
    }
}

fn load_file(path: &Path) -> Result<MazeGrid, LevelError> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelError::MissingLevelFile {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    MazeGrid::parse_str(&name, &content)
}

// ══════════════════════════════════════════════════════════════
// Progression
// ══════════════════════════════════════════════════════════════

/// Start a new game on the first level.
pub fn start_game(levels: &LevelSet) -> Result<GameSession, LevelError> {
    let first = levels.load(0)?;
    info!("starting level 1/{}: {}", levels.len(), first.name);
    debug!("layout:\n{}", first.grid.to_lines().join("\n"));
    Ok(GameSession::new(first, levels.len()))
}

/// Move on from a completed level.
///
/// `LevelComplete` on the last level becomes `FinalWin`; otherwise the next
/// level is loaded and play resumes with score intact. Any other outcome is
/// returned unchanged.
pub fn advance_level(session: &mut GameSession, levels: &LevelSet) -> Result<GameOutcome, LevelError> {
    if session.outcome != GameOutcome::LevelComplete {
        return Ok(session.outcome);
    }

    let next = session.level_index + 1;
    if next >= levels.len() {
        session.outcome = GameOutcome::FinalWin;
        info!(
            "all {} levels cleared, final score {}",
            levels.len(),
            session.score
        );
        return Ok(session.outcome);
    }

    let maze = levels.load(next)?;
    info!("starting level {}/{}: {}", next + 1, levels.len(), maze.name);
    debug!("layout:\n{}", maze.grid.to_lines().join("\n"));
    session.total_levels = levels.len();
    session.enter_level(next, maze);
    Ok(session.outcome)
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

type EmbeddedLevel = (&'static str, &'static [&'static str]);

const EMBEDDED: [EmbeddedLevel; 5] = [
    ("Level 1 - First Steps", &[
        "WWWWWWWWWWWWWWWWWWWW",
        "WP     W     C     W",
        "W WWWW W WWWWWWWWW W",
        "W W  C W W       W W",
        "W W WWWW W WWWWW W W",
        "W W      W W  C  W W",
        "W WWWWWWWW W WWWWW W",
        "W C        W      GW",
        "WWWWWWWWWWWWWWWWWWWW",
    ]),
    ("Level 2 - The Guard", &[
        "WWWWWWWWWWWWWWWWWWWW",
        "WP   W      C      W",
        "WWWW W WWWWWWWWWWW W",
        "W    W W  E      W W",
        "W WWWW WWWWWWWW WW W",
        "W C            C   W",
        "W WWWWWWWWWW WWWWWWW",
        "W   E        C    GW",
        "WWWWWWWWWWWWWWWWWWWW",
    ]),
    ("Level 3 - Crossfire", &[
        "WWWWWWWWWWWWWWWWWWWWWW",
        "WP  C   W      C     W",
        "W WWWWW W WWWWWWWWWW W",
        "W    E    W  C     W W",
        "WWWWWWWWW W WWWWWW W W",
        "W C     W       E  W W",
        "W WWWWW WWWWWWWWWWWW W",
        "W   E       C        W",
        "W WWWWWWWWWWWWWWWWWW W",
        "W C               E GW",
        "WWWWWWWWWWWWWWWWWWWWWW",
    ]),
    ("Level 4 - Two Exits", &[
        "WWWWWWWWWWWWWWWWWWWWWW",
        "WG   E      W   C    W",
        "WWWWWWW WWW W WWWWWW W",
        "W C       W W    E   W",
        "W WWWWWWW W WWWWWWWW W",
        "W   E   W P   C      W",
        "W WWWWW WWWWWWWWWWW WW",
        "W C   W      E     C W",
        "WWWWW WWWWWWWWWWWWWW W",
        "W       E          GWW",
        "WWWWWWWWWWWWWWWWWWWWWW",
    ]),
    ("Level 5 - The Gauntlet", &[
        "WWWWWWWWWWWWWWWWWWWWWWWW",
        "WP C    E     C      E W",
        "W WWWWWWWWWWWWWWWWWWWW W",
        "W   E      C     E     W",
        "WWWWWWWWWWWWWWWWWWWWWW W",
        "W C    E     C     E   W",
        "W WWWWWWWWWWWWWWWWWWWWWW",
        "W    E     C     E    CW",
        "WWWWWWWWWWWWWWWWWWWWWW W",
        "WG     E     C     E   W",
        "WWWWWWWWWWWWWWWWWWWWWWWW",
    ]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MoveDir;
    use crate::domain::entity::Pos;

    fn temp_level_dir(tag: &str, levels: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tilemaze-test-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for (file, content) in levels {
            std::fs::write(dir.join(file), content).unwrap();
        }
        dir
    }

    #[test]
    fn embedded_levels_all_parse() {
        let set = LevelSet::embedded();
        assert_eq!(set.len(), 5);
        for i in 0..set.len() {
            let m = set.load(i).unwrap_or_else(|e| panic!("level {i}: {e}"));
            assert!(!m.scan.goals.is_empty());
            // Player starts on open ground.
            assert!(!m.grid.tile(m.scan.player_start).is_wall());
        }
    }

    #[test]
    fn out_of_range_is_an_error() {
        let err = LevelSet::embedded().load(5).unwrap_err();
        assert!(matches!(err, LevelError::LevelOutOfRange { index: 5, total: 5 }));
    }

    #[test]
    fn loads_files_in_configured_order() {
        let dir = temp_level_dir("order", &[
            ("b.txt", "WWW\nWPW\nWGW\n"),
            ("a.txt", "PCG\n"),
        ]);
        let set = LevelSet::from_dir(&dir, &["a.txt".into(), "b.txt".into()]);
        assert_eq!(set.len(), 2);
        let first = set.load(0).unwrap();
        assert_eq!(first.name, "a");
        assert_eq!(first.scan.coins, vec![Pos::new(1, 0)]);
        assert_eq!(set.load(1).unwrap().name, "b");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_reported() {
        let dir = temp_level_dir("missing", &[("level1.txt", "PG\n")]);
        let set = LevelSet::from_dir(&dir, &["level1.txt".into(), "level2.txt".into()]);
        assert!(set.load(0).is_ok());
        match set.load(1) {
            Err(LevelError::MissingLevelFile { path, .. }) => {
                assert_eq!(path, dir.join("level2.txt"));
            }
            other => panic!("expected MissingLevelFile, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn broken_file_reported() {
        let dir = temp_level_dir("broken", &[("l.txt", "WWW\nW W\nWWW\n"), ("e.txt", "\n\n")]);
        let set = LevelSet::from_dir(&dir, &["l.txt".into(), "e.txt".into()]);
        assert!(matches!(set.load(0), Err(LevelError::NoPlayerStart { .. })));
        assert!(matches!(set.load(1), Err(LevelError::EmptyOrMalformedGrid { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn advance_moves_one_level_and_keeps_score() {
        let dir = temp_level_dir("advance", &[
            ("1.txt", "PCG\n"),
            ("2.txt", "WWWWW\nWGCPW\nWCE W\nWWWWW\n"),
        ]);
        let set = LevelSet::from_dir(&dir, &["1.txt".into(), "2.txt".into()]);
        let rules = crate::config::RulesConfig::default();
        let mut s = start_game(&set).unwrap();
        assert_eq!(s.total_levels, 2);

        let mut events = vec![];
        crate::sim::step::move_player(&mut s, MoveDir::Right, &rules, &mut events);
        crate::sim::step::move_player(&mut s, MoveDir::Right, &rules, &mut events);
        assert_eq!(s.outcome, GameOutcome::LevelComplete);
        assert_eq!(s.score, 10);

        let outcome = advance_level(&mut s, &set).unwrap();
        assert_eq!(outcome, GameOutcome::Playing);
        assert_eq!(s.level_index, 1);
        assert_eq!(s.score, 10);
        assert_eq!(s.player.pos, Pos::new(3, 1));
        assert_eq!(s.coins, vec![Pos::new(2, 1), Pos::new(1, 2)]);
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies[0].pos, Pos::new(2, 2));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn last_level_goes_to_final_win() {
        let mut s = start_game(&LevelSet::embedded()).unwrap();
        s.level_index = 4;
        s.score = 120;
        s.outcome = GameOutcome::LevelComplete;
        let outcome = advance_level(&mut s, &LevelSet::embedded()).unwrap();
        assert_eq!(outcome, GameOutcome::FinalWin);
        assert_eq!(s.score, 120);
    }

    #[test]
    fn advance_ignores_unfinished_levels() {
        let set = LevelSet::embedded();
        let mut s = start_game(&set).unwrap();
        assert_eq!(advance_level(&mut s, &set).unwrap(), GameOutcome::Playing);
        assert_eq!(s.level_index, 0);
        s.outcome = GameOutcome::Caught;
        assert_eq!(advance_level(&mut s, &set).unwrap(), GameOutcome::Caught);
        assert_eq!(s.level_index, 0);
    }
}
