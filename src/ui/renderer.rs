/// Presentation layer: diff-based terminal renderer.
///
/// Each call composes the whole frame off-screen, diffs it against the
/// previously emitted frame, and only writes the cells that changed, batched
/// with `queue!` and flushed once. A terminal resize throws the previous
/// frame away and repaints from scratch.
///
/// The renderer is a pure consumer: it reads the state under the caller's
/// lock and feeds nothing back into the game.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::element::Element;
use crate::sim::world::GameState;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
    bg: Color::Reset,
};

/// One composed frame, sized to the terminal.
struct Frame {
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    fn sized(cols: usize, lines: usize) -> Self {
        Frame {
            rows: vec![vec![BLANK; cols]; lines],
        }
    }

    fn paint(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    fn text(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.paint(
                x + i,
                y,
                Cell {
                    ch,
                    fg,
                    bg: Color::Reset,
                },
            );
        }
    }
}

/// Vertical layout: title row, blank, map rows, blank, status row.
const TITLE_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HINT: &str = "WASD/arrows move · E interact · Q quits";

pub struct Renderer {
    out: BufWriter<io::Stdout>,
    /// Last emitted frame; None forces a full repaint.
    prev: Option<Frame>,
    size: (u16, u16),
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::new(io::stdout()),
            prev: None,
            size: (0, 0),
        }
    }

    /// Enter raw mode + alternate screen, hide the cursor.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
        )
    }

    /// Restore the terminal. Safe to call after a failed init.
    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Draw one frame of the given state.
    pub fn render(&mut self, state: &GameState) -> io::Result<()> {
        let size = terminal::size()?;
        if size != self.size {
            self.size = size;
            self.prev = None;
            queue!(self.out, Clear(ClearType::All))?;
        }

        let frame = compose(state, size.0 as usize, size.1 as usize);
        self.emit(&frame)?;
        self.prev = Some(frame);
        Ok(())
    }

    /// Write every cell that differs from the previous frame.
    fn emit(&mut self, frame: &Frame) -> io::Result<()> {
        let mut fg = None;
        let mut bg = None;

        for (y, row) in frame.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let unchanged = self
                    .prev
                    .as_ref()
                    .is_some_and(|p| p.rows[y][x] == *cell);
                if unchanged {
                    continue;
                }
                queue!(self.out, MoveTo(x as u16, y as u16))?;
                if fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(cell.bg))?;
                    bg = Some(cell.bg);
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        self.out.flush()
    }
}

/// Build the frame: title, grid, player glyph over their cell, status line.
fn compose(state: &GameState, cols: usize, lines: usize) -> Frame {
    let mut frame = Frame::sized(cols, lines);

    frame.text(1, TITLE_ROW, "T H I C K E T", Color::Green);

    for (y, row) in state.grid.iter().enumerate() {
        for (x, element) in row.iter().enumerate() {
            frame.paint(
                x,
                MAP_ROW + y,
                Cell {
                    ch: element.symbol,
                    fg: element.fg,
                    bg: element.bg,
                },
            );
        }
    }

    // The player is tracked out-of-band; the glyph covers whatever the
    // occupied cell holds.
    if state.player_x >= 0 && state.player_y >= 0 {
        frame.paint(
            state.player_x as usize,
            MAP_ROW + state.player_y as usize,
            Cell {
                ch: Element::PLAYER.symbol,
                fg: Element::PLAYER.fg,
                bg: Element::PLAYER.bg,
            },
        );
    }

    let status_row = MAP_ROW + state.grid.len() + 1;
    if state.status.is_empty() {
        frame.text(0, status_row, HINT, Color::DarkGrey);
    } else {
        let fg = if state.over { Color::Red } else { Color::Yellow };
        frame.text(0, status_row, &state.status, fg);
    }

    frame
}
