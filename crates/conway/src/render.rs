//! # Text Renderer
//!
//! Draws a grid into any [`Write`] sink, one character per cell, followed by
//! a status line.
//!
//! ## Age Colors
//!
//! With colors enabled a live cell's background follows its age:
//!
//! ```text
//! age:   0      1    2       3      4     5     6+
//!        plain  red  yellow  green  cyan  blue  magenta
//! ```

use std::io::{self, Write};

use conway_core::{Cell, Grid};

/// Glyph for a live cell.
pub const LIVE_GLYPH: char = 'o';

/// Glyph for a dead cell.
pub const DEAD_GLYPH: char = ' ';

/// Ages at or above this share the last color.
pub const MAX_AGE_BUCKET: u64 = 6;

/// ANSI background color per age bucket. Bucket 0 is uncolored.
const AGE_BACKGROUNDS: [Option<u8>; 7] = [
    None,
    Some(41),
    Some(43),
    Some(42),
    Some(46),
    Some(44),
    Some(45),
];

const RESET: &str = "\x1b[0m";
const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";

/// Maps a cell age to its color bucket.
#[inline]
#[must_use]
pub fn age_bucket(age: u64) -> usize {
    usize::try_from(age.min(MAX_AGE_BUCKET)).unwrap_or_default()
}

/// What the status line reports besides the grid itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// Whether the scheduler is running.
    pub running: bool,
    /// Tick interval in milliseconds.
    pub interval_ms: u64,
}

/// Writes frames to a text sink.
pub struct TextRenderer<W: Write> {
    out: W,
    /// Emit cursor movement so each frame overwrites the previous one.
    terminal: bool,
    frames: u64,
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer that appends plain frames to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out,
            terminal: false,
            frames: 0,
        }
    }

    /// Creates a renderer that redraws in place on an ANSI terminal.
    #[must_use]
    pub const fn terminal(out: W) -> Self {
        Self {
            out,
            terminal: true,
            frames: 0,
        }
    }

    /// Returns the number of frames drawn.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the underlying sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draws one frame: every row of `grid`, then the status line.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn draw(&mut self, grid: &Grid, status: Status) -> io::Result<()> {
        if self.terminal {
            if self.frames == 0 {
                self.out.write_all(CLEAR_SCREEN.as_bytes())?;
            }
            self.out.write_all(CURSOR_HOME.as_bytes())?;
        }

        let mut line = String::with_capacity(grid.width() * 8 + 1);
        for row in grid.rows() {
            line.clear();
            for &cell in row {
                push_cell(&mut line, cell, grid.colors());
            }
            line.push('\n');
            self.out.write_all(line.as_bytes())?;
        }

        writeln!(
            self.out,
            "Population: {}  Turns: {}  Rule: {}  Speed: {}ms  [{}]",
            grid.population(),
            grid.turns(),
            grid.rule(),
            status.interval_ms,
            if status.running { "running" } else { "paused" }
        )?;
        self.out.flush()?;

        self.frames += 1;
        Ok(())
    }
}

fn push_cell(line: &mut String, cell: Cell, colors: bool) {
    if !cell.is_alive() {
        line.push(DEAD_GLYPH);
        return;
    }
    match AGE_BACKGROUNDS[age_bucket(cell.age())] {
        Some(code) if colors => {
            line.push_str("\x1b[");
            line.push_str(&code.to_string());
            line.push('m');
            line.push(LIVE_GLYPH);
            line.push_str(RESET);
        }
        _ => line.push(LIVE_GLYPH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAUSED: Status = Status {
        running: false,
        interval_ms: 10,
    };

    fn render(grid: &Grid, status: Status) -> String {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.draw(grid, status).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_age_bucket() {
        assert_eq!(age_bucket(0), 0);
        assert_eq!(age_bucket(3), 3);
        assert_eq!(age_bucket(6), 6);
        assert_eq!(age_bucket(u64::MAX), 6);
    }

    #[test]
    fn test_plain_frame() {
        let grid = Grid::from_cells(4, 2, &[(0, 0), (3, 1)]);
        let text = render(&grid, PAUSED);
        assert_eq!(
            text,
            "o   \n   o\nPopulation: 2  Turns: 0  Rule: B3/S23  Speed: 10ms  [paused]\n"
        );
    }

    #[test]
    fn test_aged_cells_are_colored() {
        // A block: every cell survives and ages once per generation.
        let mut grid = Grid::from_cells(4, 4, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        let fresh = render(&grid, PAUSED);
        assert!(!fresh.contains("\x1b["));

        grid.next();
        grid.next();
        let aged = render(&grid, PAUSED);
        assert!(aged.contains("\x1b[43mo\x1b[0m"));

        grid.set_colors(false);
        let plain = render(&grid, PAUSED);
        assert!(!plain.contains("\x1b["));
    }

    #[test]
    fn test_terminal_mode_homes_cursor() {
        let grid = Grid::empty(2, 1);
        let mut renderer = TextRenderer::terminal(Vec::new());
        renderer.draw(&grid, PAUSED).unwrap();
        renderer
            .draw(&grid, Status { running: true, interval_ms: 5 })
            .unwrap();
        assert_eq!(renderer.frames(), 2);

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.starts_with("\x1b[2J\x1b[H"));
        assert_eq!(text.matches(CURSOR_HOME).count(), 2);
        assert!(text.ends_with("[running]\n"));
    }
}
