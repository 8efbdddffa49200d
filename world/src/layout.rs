//! Parsing of the textual cave map into a static layout.

use std::str::FromStr;

use beverage_bandits_core::{CellCoord, Team};
use thiserror::Error;

/// Largest number of cells a board may contain so distances fit in `u16`.
const MAX_CELLS: usize = u16::MAX as usize;

/// Static terrain of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Impassable rock, drawn as `#`.
    Wall,
    /// Open cavern floor, drawn as `.` or as a unit's starting symbol.
    Floor,
}

/// Starting position of a unit declared by the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    /// Cell the unit starts on.
    pub cell: CellCoord,
    /// Team the unit fights for.
    pub team: Team,
}

/// Rectangular cave map with the unit starting positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
    spawns: Vec<Spawn>,
}

impl Layout {
    /// Number of columns in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Terrain at the provided cell, or `None` outside the map.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        self.cells.get(row * width + column).copied()
    }

    /// Terrain of every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Unit starting positions in reading order.
    #[must_use]
    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            let _ = lines.pop();
        }

        let Some(first) = lines.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let height = lines.len();
        if width.saturating_mul(height) > MAX_CELLS {
            return Err(LayoutError::TooLarge {
                columns: width,
                rows: height,
            });
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut spawns = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    '#' => Cell::Wall,
                    '.' => Cell::Floor,
                    other => {
                        let team = Team::from_symbol(other).ok_or(LayoutError::UnknownSymbol {
                            symbol: other,
                            column,
                            row,
                        })?;
                        spawns.push(Spawn {
                            cell: CellCoord::new(column as u32, row as u32),
                            team,
                        });
                        Cell::Floor
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            columns: width as u32,
            rows: height as u32,
            cells,
            spawns,
        })
    }
}

/// Configuration errors detected while reading a map.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The map did not contain a single non-empty row.
    #[error("map contains no rows")]
    Empty,
    /// A row's length differs from the first row's length.
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// A character other than `#`, `.`, `G` or `E` appeared in the map.
    #[error("unknown map symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// The map holds more cells than distances can address.
    #[error("map of {columns}x{rows} cells exceeds the supported board area")]
    TooLarge {
        /// Column count of the map.
        columns: usize,
        /// Row count of the map.
        rows: usize,
    },
}
