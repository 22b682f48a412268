use std::io;

use crate::grid::{Direction::{self, *}, Grid, Position};
use crate::session::{Frame, Phase};
use crate::term::TermManager;
use crate::{Coords, TermInt};

use anyhow::{bail, Result};

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = ' ';

/// Draws a frame of the game. Implementations only read the frame.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Where the HUD and the board sit on the terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub hud: Coords,
    pub frame_top_left: Coords,
    pub frame_width: TermInt,
    pub frame_height: TermInt,
}

impl Layout {
    /// Centers the board and the HUD line above it, if the terminal is large enough.
    pub fn fit(term_size: Coords, grid: &Grid) -> Option<Layout> {
        let frame_width = grid.columns().checked_add(2)?;
        let frame_height = grid.rows().checked_add(2)?;
        let total_height = frame_height.checked_add(1)?;

        if term_size.0 < frame_width || term_size.1 < total_height {
            return None;
        }

        let x0 = (term_size.0 - frame_width) / 2;
        let y0 = (term_size.1 - total_height) / 2;
        Some(Layout { hud: (x0, y0), frame_top_left: (x0, y0 + 1), frame_width, frame_height })
    }

    pub fn cell(&self, column: u16, row: u16) -> Coords {
        (self.frame_top_left.0 + 1 + column, self.frame_top_left.1 + 1 + row)
    }
}

pub fn check_fits(term_size: Coords, grid: &Grid) -> Result<Layout> {
    match Layout::fit(term_size, grid) {
        Some(layout) => Ok(layout),
        None => bail!(
            "terminal is {}x{} but a {}x{} board needs at least {}x{}; \
             enlarge the window or pass smaller --columns/--rows",
            term_size.0, term_size.1,
            grid.columns(), grid.rows(),
            u32::from(grid.columns()) + 2, u32::from(grid.rows()) + 3,
        ),
    }
}

pub fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

/// One character per grid cell, row-major.
pub fn board_chars(frame: &Frame<'_>) -> Vec<char> {
    let columns = frame.grid.columns() as usize;
    let mut cells = vec![EMPTY_CHAR; frame.grid.cell_count()];
    let index = |pos: Position| {
        let (c, r) = frame.grid.cell_of(pos);
        r as usize * columns + c as usize
    };

    cells[index(frame.food)] = APPLE_CHAR;

    for (i, pos) in frame.body.iter().enumerate().rev() {
        cells[index(*pos)] = if !frame.alive {
            DEAD_SNAKE_CHAR
        } else if i == 0 {
            head_char(frame.direction)
        } else {
            SNAKE_BODY_CHAR
        };
    }

    cells
}

/// Exactly `width` characters, so a shorter line overwrites a longer one.
pub fn hud_line(frame: &Frame<'_>, width: usize) -> String {
    let left = format!("Score: {}", frame.score);
    let right = format!("High Score: {}", frame.high_score);
    let gap = width.saturating_sub(left.len() + right.len()).max(1);
    let line: String = format!("{}{}{}", left, " ".repeat(gap), right).chars().take(width).collect();
    format!("{:<width$}", line, width = width)
}

pub fn message_lines(frame: &Frame<'_>) -> Option<Vec<String>> {
    let lines: Vec<String> = match frame.phase {
        Phase::Playing => return None,
        Phase::Start => vec![
            "SNAKE".into(),
            "".into(),
            "Arrow keys or WASD to move".into(),
            "Eat the apples to grow".into(),
            "Avoid biting yourself".into(),
            "".into(),
            "Space to start".into(),
            "Esc or q to quit".into(),
        ],
        Phase::GameOver => vec![
            "GAME OVER".into(),
            format!("Your score: {}", frame.score),
            format!("High score: {}", frame.high_score),
            "".into(),
            "Space to play again".into(),
            "Esc or q to quit".into(),
        ],
    };

    Some(lines)
}

impl Renderer for TermManager {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let layout = match Layout::fit(self.get_terminal_size(), frame.grid) {
            Some(layout) => layout,
            // Checked at startup; a shrunk terminal just stops drawing
            None => return Ok(()),
        };

        let message = message_lines(frame);
        if message.is_none() {
            self.hide_message()?;
        }

        self.print_str_at(layout.hud, &hud_line(frame, layout.frame_width as usize))?;
        self.draw_borders(layout.frame_top_left, layout.frame_width, layout.frame_height)?;

        let columns = frame.grid.columns();
        for (i, ch) in board_chars(frame).into_iter().enumerate() {
            let (c, r) = ((i % columns as usize) as u16, (i / columns as usize) as u16);
            self.print_at(layout.cell(c, r), ch)?;
        }

        if let Some(lines) = message {
            self.show_message(&lines)?;
        }

        self.flush()
    }
}
