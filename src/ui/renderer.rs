/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads the session. Which screen is drawn follows
/// directly from `session.outcome`.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::RulesConfig;
use crate::domain::entity::Pos;
use crate::domain::tile::Tile;
use crate::sim::world::{GameOutcome, GameSession};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 8],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // occupies 2 terminal columns
    cont: bool,    // right half of a wide char (skip render)
}

impl Cell {
    /// Explicit background for every cell, matched by `Clear` so that
    /// inter-row gaps never show the terminal's own default.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 20, b: 28 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 8],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Differs from every real cell; filling `back` with it forces a full repaint.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Fill a whole row with `bg`, then write `s` from column 0.
    fn put_bar(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', fg, bg));
        }
        self.put_str(0, y, s, fg, bg);
    }

    /// `s` horizontally centered on row `y`.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, Color::Reset);
    }

    /// Text of row `y`, continuation cells skipped. Used by tests.
    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width)
            .map(|x| self.get(x, y))
            .filter(|c| !c.cont)
            .map(|c| c.as_str().to_string())
            .collect()
    }
}

// ── Renderer ──

/// Each game cell is 2 terminal columns wide so the maze looks square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 24, g: 40, b: 80 };
const GOLD: Color = Color::Rgb { r: 255, g: 215, b: 60 };
const GREEN: Color = Color::Rgb { r: 90, g: 230, b: 110 };
const RED: Color = Color::Rgb { r: 255, g: 70, b: 70 };
const DIM: Color = Color::Rgb { r: 110, g: 110, b: 130 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    /// Screen drawn last frame: (outcome, level index).
    last_screen: Option<(GameOutcome, usize)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &GameSession, rules: &RulesConfig) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // New screen or new level: clear for a clean transition
        let screen = (session.outcome, session.level_index);
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.compose(session, rules);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn compose(&mut self, session: &GameSession, rules: &RulesConfig) {
        self.front.clear();
        match session.outcome {
            GameOutcome::Playing => self.compose_game(session, rules),
            GameOutcome::LevelComplete => self.compose_level_complete(session),
            GameOutcome::Caught => self.compose_game_over(session, "CAUGHT BY AN ENEMY!"),
            GameOutcome::TimeUp => self.compose_game_over(session, "TIME'S UP!"),
            GameOutcome::FinalWin => self.compose_final_win(session),
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit colors, never ResetColor: the terminal default may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, s: &GameSession, rules: &RulesConfig) {
        let hud = format!(
            " Level {}/{}  {}   Score:{:<6}  Coins:{:<4}  Time:{:>3}s ",
            s.level_index + 1,
            s.total_levels,
            s.level_name,
            s.score,
            s.coins_collected,
            s.time_left(rules.level_time),
        );
        self.front.put_bar(HUD_ROW, &hud, Color::White, HUD_BG);

        self.compose_map(s);

        let help_row = MAP_ROW + s.grid.height() + 1;
        if help_row < self.front.height {
            self.front.put_str(
                1,
                help_row,
                "Arrows/WASD: Move   Pad: D-pad/Stick   ESC: Quit",
                DIM,
                Color::Reset,
            );
        }
    }

    fn compose_map(&mut self, s: &GameSession) {
        for gy in 0..s.grid.height() {
            let row = MAP_ROW + gy;
            if row >= self.front.height { break; }
            for gx in 0..s.grid.width() {
                let col = gx * CELL_W;
                if col + 1 >= self.front.width { break; }
                self.compose_cell(s, Pos::new(gx, gy), col, row);
            }
        }
    }

    /// Write the visual for game cell `pos` at (col, row).
    /// Priority: player, enemy, coin, goal, then the static tile.
    fn compose_cell(&mut self, s: &GameSession, pos: Pos, col: usize, row: usize) {
        let glyph = if s.player.pos == pos {
            Some('😀')
        } else if s.enemy_at(pos).is_some() {
            Some('👾')
        } else if s.has_coin_at(pos) {
            Some('🪙')
        } else if s.is_goal(pos) {
            Some('🚩')
        } else {
            None
        };
        if let Some(ch) = glyph {
            self.front.set(col, row, Cell::from_char_wide(ch, Color::Reset, Color::Reset));
            self.front.set(col + 1, row, Cell::WIDE_CONT);
            return;
        }

        // Markers that moved away (P, E, C already taken) render as floor.
        let (ch, fg, bg) = match s.grid.tile(pos) {
            Tile::Wall => ('█', Color::Rgb { r: 90, g: 100, b: 130 }, Color::Rgb { r: 50, g: 56, b: 80 }),
            _ => (' ', Color::Reset, Color::Reset),
        };
        self.front.set(col, row, Cell::from_char(ch, fg, bg));
        self.front.set(col + 1, row, Cell::from_char(ch, fg, bg));
    }

    fn compose_banner(&mut self, top: usize, text: &str, color: Color) {
        let inner = text.chars().count() + 6;
        let bar: String = std::iter::repeat('═').take(inner).collect();
        self.front.put_centered(top, &format!("╔{bar}╗"), color);
        self.front.put_centered(top + 1, &format!("║   {text}   ║"), color);
        self.front.put_centered(top + 2, &format!("╚{bar}╝"), color);
    }

    fn compose_level_complete(&mut self, s: &GameSession) {
        self.compose_banner(4, "You Win!", GREEN);
        let cleared = format!("{} cleared", s.level_name);
        let score = format!("Score: {}   Coins: {}", s.score, s.coins_collected);
        self.front.put_centered(8, &cleared, Color::White);
        self.front.put_centered(9, &score, Color::White);
        let prompt = if s.is_final_level() {
            "Press ENTER to Finish"
        } else {
            "Press ENTER for Next Level"
        };
        self.front.put_centered(11, prompt, GOLD);
    }

    fn compose_game_over(&mut self, s: &GameSession, reason: &str) {
        self.compose_banner(4, "GAME OVER", RED);
        self.front.put_centered(8, reason, RED);
        let score = format!("Final Score: {}", s.score);
        let level = format!("Reached Level {}/{}", s.level_index + 1, s.total_levels);
        self.front.put_centered(10, &score, Color::White);
        self.front.put_centered(11, &level, Color::White);
    }

    fn compose_final_win(&mut self, s: &GameSession) {
        self.compose_banner(4, "ALL LEVELS CLEARED!", GOLD);
        let score = format!("Total Score: {}", s.score);
        let coins = format!("Coins Collected: {}", s.coins_collected);
        self.front.put_centered(8, &score, Color::White);
        self.front.put_centered(9, &coins, Color::White);
        self.front.put_centered(11, "Press ESC to quit", DIM);
    }
}
