//! # Patterns
//!
//! Pattern data for the preset seed modes. The engine never hard-codes
//! coordinates: patterns arrive as RLE or plaintext strings, usually from a
//! TOML library file:
//!
//! ```toml
//! [[pattern]]
//! name = "Glider"
//! category = "spaceships"
//! rle = "bo$2bo$3o!"
//! ```
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  ┌──┐  ┌───┐  ┌─┐            │   patterns are placed left to right,
//! │  └──┘  └───┘  │ │            │   wrapping to a new shelf when the
//! │               └─┘            │   row is full, with a GUTTER-wide
//! │  ┌─────┐                     │   border of dead cells around each
//! │  └─────┘                     │
//! └──────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LifeError, LifeResult};
use crate::seed::SeedMode;

/// Largest accepted pattern extent along either axis.
pub const MAX_PATTERN_EXTENT: usize = 4096;

/// Dead cells kept between placed patterns and around the grid border.
pub const GUTTER: usize = 2;

/// A named set of live cells, normalized so its bounding box starts at (0, 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    name: String,
    cells: Vec<(usize, usize)>,
    width: usize,
    height: usize,
}

impl Pattern {
    /// Builds a pattern from live-cell coordinates `(x, y)`.
    ///
    /// Coordinates are shifted so the bounding box starts at the origin.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no live cells or the pattern exceeds
    /// [`MAX_PATTERN_EXTENT`].
    pub fn from_cells(name: &str, cells: &[(usize, usize)]) -> LifeResult<Self> {
        let (Some(min_x), Some(min_y)) = (
            cells.iter().map(|&(x, _)| x).min(),
            cells.iter().map(|&(_, y)| y).min(),
        ) else {
            return Err(LifeError::InvalidPattern {
                name: name.to_string(),
                reason: "no live cells".to_string(),
            });
        };

        let mut normalized: Vec<(usize, usize)> =
            cells.iter().map(|&(x, y)| (x - min_x, y - min_y)).collect();
        normalized.sort_unstable_by_key(|&(x, y)| (y, x));
        normalized.dedup();

        // Saturation keeps a coordinate at usize::MAX over the extent limit.
        let width = normalized.iter().map(|&(x, _)| x.saturating_add(1)).max().unwrap_or(0);
        let height = normalized.iter().map(|&(_, y)| y.saturating_add(1)).max().unwrap_or(0);
        if width > MAX_PATTERN_EXTENT || height > MAX_PATTERN_EXTENT {
            return Err(LifeError::PatternTooLarge {
                name: name.to_string(),
                width,
                height,
            });
        }

        Ok(Self {
            name: name.to_string(),
            cells: normalized,
            width,
            height,
        })
    }

    /// Decodes run-length encoded pattern data.
    ///
    /// `b` is a dead cell, `o` a live cell, `$` ends a row and `!` ends the
    /// pattern. Each tag may be preceded by a run count. Lines starting with
    /// `#` and the `x = .., y = ..` header line are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown tags, dangling run counts, empty patterns
    /// or patterns larger than [`MAX_PATTERN_EXTENT`].
    pub fn from_rle(name: &str, rle: &str) -> LifeResult<Self> {
        let invalid = |reason: String| LifeError::InvalidPattern {
            name: name.to_string(),
            reason,
        };
        let too_large = || LifeError::PatternTooLarge {
            name: name.to_string(),
            width: MAX_PATTERN_EXTENT + 1,
            height: MAX_PATTERN_EXTENT + 1,
        };

        let body = rle
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#') && !line.starts_with('x'));

        let mut cells = Vec::new();
        let (mut x, mut y) = (0usize, 0usize);
        let mut run: Option<usize> = None;

        'decode: for line in body {
            for c in line.chars() {
                if c.is_whitespace() {
                    continue;
                }
                if let Some(digit) = c.to_digit(10) {
                    let next = run
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit as usize))
                        .ok_or_else(too_large)?;
                    run = Some(next);
                    continue;
                }

                let count = run.take().unwrap_or(1);
                match c {
                    'b' | '.' => x = x.checked_add(count).ok_or_else(too_large)?,
                    'o' => {
                        let end = x.checked_add(count).ok_or_else(too_large)?;
                        if end > MAX_PATTERN_EXTENT {
                            return Err(too_large());
                        }
                        cells.extend((x..end).map(|cx| (cx, y)));
                        x = end;
                    }
                    '$' => {
                        y = y.checked_add(count).ok_or_else(too_large)?;
                        x = 0;
                    }
                    '!' => break 'decode,
                    other => return Err(invalid(format!("unexpected tag {other:?}"))),
                }
            }
        }

        if run.is_some() {
            return Err(invalid("run count without a tag".to_string()));
        }
        Self::from_cells(name, &cells)
    }

    /// Decodes plaintext pattern data.
    ///
    /// `O`, `o` or `*` is a live cell; `.` or a space is dead. Lines starting
    /// with `!` are comments.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown characters or empty patterns.
    pub fn from_plaintext(name: &str, text: &str) -> LifeResult<Self> {
        let mut cells = Vec::new();
        let rows = text
            .lines()
            .filter(|line| !line.trim_start().starts_with('!'))
            .enumerate();
        for (y, line) in rows {
            for (x, c) in line.chars().enumerate() {
                match c {
                    'O' | 'o' | '*' => cells.push((x, y)),
                    '.' | ' ' | '\t' => (),
                    other => {
                        return Err(LifeError::InvalidPattern {
                            name: name.to_string(),
                            reason: format!("unexpected character {other:?}"),
                        })
                    }
                }
            }
        }
        Self::from_cells(name, &cells)
    }

    /// Returns the pattern name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the live cells, relative to the pattern origin.
    #[must_use]
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Returns the bounding box width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the bounding box height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.len()
    }
}

/// One `[[pattern]]` table in a library file.
#[derive(Debug, Deserialize)]
struct PatternEntry {
    name: String,
    category: SeedMode,
    #[serde(default)]
    rle: Option<String>,
    #[serde(default)]
    plaintext: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    pattern: Vec<PatternEntry>,
}

/// Patterns grouped by preset seed mode.
#[derive(Clone, Debug, Default)]
pub struct PatternLibrary {
    categories: HashMap<SeedMode, Vec<Pattern>>,
}

impl PatternLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern to a category.
    pub fn insert(&mut self, mode: SeedMode, pattern: Pattern) {
        self.categories.entry(mode).or_default().push(pattern);
    }

    /// Returns the patterns for a seed mode, in insertion order.
    #[must_use]
    pub fn patterns(&self, mode: SeedMode) -> &[Pattern] {
        self.categories
            .get(&mode)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the total number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Returns true if the library holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a TOML pattern library.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an entry has neither or
    /// both of `rle` and `plaintext`, or any pattern fails to decode.
    pub fn from_toml_str(source: &str) -> LifeResult<Self> {
        let file: LibraryFile =
            toml::from_str(source).map_err(|e| LifeError::InvalidConfig(e.to_string()))?;

        let mut library = Self::new();
        for entry in file.pattern {
            let pattern = match (&entry.rle, &entry.plaintext) {
                (Some(rle), None) => Pattern::from_rle(&entry.name, rle)?,
                (None, Some(text)) => Pattern::from_plaintext(&entry.name, text)?,
                _ => {
                    return Err(LifeError::InvalidPattern {
                        name: entry.name,
                        reason: "exactly one of `rle` or `plaintext` is required".to_string(),
                    })
                }
            };
            if entry.category == SeedMode::Random {
                tracing::warn!("Pattern {} listed under `random`, ignoring", pattern.name());
                continue;
            }
            library.insert(entry.category, pattern);
        }
        Ok(library)
    }

    /// Loads a TOML pattern library from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> LifeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LifeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Computes where each pattern of `mode` goes on a `width x height` grid.
    ///
    /// Returns `(x, y, pattern)` placements. Patterns that do not fit in the
    /// remaining space are skipped.
    #[must_use]
    pub fn layout(
        &self,
        mode: SeedMode,
        width: usize,
        height: usize,
    ) -> Vec<(usize, usize, &Pattern)> {
        let mut placements = Vec::new();
        let (mut x, mut y) = (GUTTER, GUTTER);
        let mut shelf_height = 0;

        for pattern in self.patterns(mode) {
            if x + pattern.width() + GUTTER > width && x > GUTTER {
                x = GUTTER;
                y += shelf_height + GUTTER;
                shelf_height = 0;
            }
            if x + pattern.width() + GUTTER > width || y + pattern.height() + GUTTER > height {
                tracing::warn!(
                    "Pattern {} ({}x{}) does not fit on a {}x{} grid, skipping",
                    pattern.name(),
                    pattern.width(),
                    pattern.height(),
                    width,
                    height
                );
                continue;
            }
            placements.push((x, y, pattern));
            x += pattern.width() + GUTTER;
            shelf_height = shelf_height.max(pattern.height());
        }
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER_RLE: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!";

    #[test]
    fn test_rle_glider() {
        let glider = Pattern::from_rle("Glider", GLIDER_RLE).unwrap();
        assert_eq!(glider.width(), 3);
        assert_eq!(glider.height(), 3);
        assert_eq!(glider.cells(), &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_rle_row_runs_and_whitespace() {
        // Blinker split over lines, a blank row between two blocks of cells.
        let p = Pattern::from_rle("gap", "3o\n2$\n3o!").unwrap();
        assert_eq!(p.height(), 3);
        assert_eq!(p.population(), 6);
        assert!(p.cells().contains(&(2, 2)));
    }

    #[test]
    fn test_rle_rejects_bad_input() {
        assert!(Pattern::from_rle("bad", "3q!").is_err());
        assert!(Pattern::from_rle("dangling", "3o2").is_err());
        assert!(Pattern::from_rle("empty", "3b!").is_err());
        assert!(matches!(
            Pattern::from_rle("huge", "5000o!"),
            Err(LifeError::PatternTooLarge { .. })
        ));
    }

    #[test]
    fn test_plaintext_matches_rle() {
        let text = "!Name: Glider\n.O.\n..O\nOOO";
        let a = Pattern::from_plaintext("Glider", text).unwrap();
        let b = Pattern::from_rle("Glider", GLIDER_RLE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_cells_normalizes() {
        let cells = [(11, 5), (10, 5), (10, 6), (11, 6), (10, 5)];
        let p = Pattern::from_cells("block", &cells).unwrap();
        assert_eq!(p.cells(), &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!((p.width(), p.height()), (2, 2));
    }

    #[test]
    fn test_from_cells_rejects_extreme_coordinates() {
        let err = Pattern::from_cells("x", &[(0, 0), (usize::MAX, 0)]).unwrap_err();
        assert!(matches!(
            err,
            LifeError::PatternTooLarge { width: usize::MAX, height: 1, .. }
        ));
        let err = Pattern::from_cells("y", &[(3, 0), (3, usize::MAX)]).unwrap_err();
        assert!(matches!(err, LifeError::PatternTooLarge { width: 1, .. }));
    }

    #[test]
    fn test_library_from_toml() {
        let library = PatternLibrary::from_toml_str(
            r#"
            [[pattern]]
            name = "Block"
            category = "still_life"
            rle = "2o$2o!"

            [[pattern]]
            name = "Blinker"
            category = "oscillators"
            plaintext = "OOO"
            "#,
        )
        .unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.patterns(SeedMode::StillLife)[0].name(), "Block");
        assert_eq!(library.patterns(SeedMode::Oscillators)[0].population(), 3);
        assert!(library.patterns(SeedMode::Spaceships).is_empty());
    }

    #[test]
    fn test_library_requires_one_encoding() {
        let result = PatternLibrary::from_toml_str(
            r#"
            [[pattern]]
            name = "Nothing"
            category = "still_life"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_layout_wraps_and_skips() {
        let mut library = PatternLibrary::new();
        let block = Pattern::from_rle("Block", "2o$2o!").unwrap();
        for _ in 0..3 {
            library.insert(SeedMode::StillLife, block.clone());
        }
        library.insert(SeedMode::StillLife, Pattern::from_rle("Wide", "20o!").unwrap());

        // Two blocks per shelf on a 10-wide grid: 2 + 2 + 2 + 2 + 2 = 10.
        let placements = library.layout(SeedMode::StillLife, 10, 12);
        let origins: Vec<_> = placements.iter().map(|&(x, y, _)| (x, y)).collect();
        assert_eq!(origins, vec![(2, 2), (6, 2), (2, 6)]);
    }
}
