#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Beverage Bandits adapters.

use anyhow::Result as AnyResult;
use beverage_bandits_core::{
    CellCoord, Health, Occupant, OccupancyView, Team, UnitId, UnitView,
};
use std::{error::Error, fmt, io::Write};

/// Symbol drawn for wall cells.
pub const WALL_SYMBOL: char = '#';
/// Symbol drawn for open floor.
pub const FLOOR_SYMBOL: char = '.';

/// Separator placed between a board row and its health annotations.
const ANNOTATION_GAP: &str = "   ";

/// Health annotation for a single unit drawn on a board row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitLabel {
    /// Team the unit fights for.
    pub team: Team,
    /// Hit points the unit has left.
    pub health: Health,
}

impl fmt::Display for UnitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.team.symbol(), self.health.get())
    }
}

/// One rendered row of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRow {
    /// Cell symbols from left to right.
    pub cells: String,
    /// Units standing on the row, in column order.
    pub labels: Vec<UnitLabel>,
}

impl fmt::Display for FrameRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cells)?;
        for (index, label) in self.labels.iter().enumerate() {
            let separator = if index == 0 { ANNOTATION_GAP } else { ", " };
            write!(f, "{separator}{label}")?;
        }
        Ok(())
    }
}

/// Immutable textual snapshot of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardFrame {
    /// Rows from top to bottom.
    pub rows: Vec<FrameRow>,
}

impl BoardFrame {
    /// Captures the board described by the occupancy grid and live units.
    pub fn capture(
        occupancy: OccupancyView<'_>,
        units: &UnitView,
    ) -> Result<Self, RenderingError> {
        let (columns, rows) = occupancy.dimensions();
        let mut frame_rows = Vec::with_capacity(rows as usize);

        for row in 0..rows {
            let mut cells = String::with_capacity(columns as usize);
            let mut labels = Vec::new();
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let symbol = match occupancy.occupant(cell) {
                    Some(Occupant::Wall) | None => WALL_SYMBOL,
                    Some(Occupant::Empty) => FLOOR_SYMBOL,
                    Some(Occupant::Unit(id)) => {
                        let unit = units
                            .get(id)
                            .ok_or(RenderingError::UnknownUnit { unit: id, cell })?;
                        labels.push(UnitLabel {
                            team: unit.team,
                            health: unit.health,
                        });
                        unit.team.symbol()
                    }
                };
                cells.push(symbol);
            }
            frame_rows.push(FrameRow { cells, labels });
        }

        Ok(Self { rows: frame_rows })
    }

    /// Board rows without health annotations.
    #[must_use]
    pub fn plain(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.cells.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for BoardFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Renders the board with per-row health annotations.
pub fn render_board(
    occupancy: OccupancyView<'_>,
    units: &UnitView,
) -> Result<String, RenderingError> {
    Ok(BoardFrame::capture(occupancy, units)?.to_string())
}

/// Rendering backend capable of presenting Beverage Bandits boards.
pub trait RenderingBackend {
    /// Presents a frame, optionally preceded by a heading line.
    fn present(&mut self, heading: Option<&str>, frame: &BoardFrame) -> AnyResult<()>;
}

/// Backend writing frames as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    output: W,
    frames: usize,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to the provided sink.
    #[must_use]
    pub fn new(output: W) -> Self {
        Self { output, frames: 0 }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the underlying sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, heading: Option<&str>, frame: &BoardFrame) -> AnyResult<()> {
        if self.frames > 0 {
            writeln!(self.output)?;
        }
        if let Some(heading) = heading {
            writeln!(self.output, "{heading}")?;
        }
        writeln!(self.output, "{frame}")?;
        self.output.flush()?;
        self.frames += 1;
        Ok(())
    }
}

/// Errors that can occur when capturing frames.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The occupancy grid references a unit missing from the unit view.
    UnknownUnit {
        /// Identifier stored in the occupancy grid.
        unit: UnitId,
        /// Cell holding the identifier.
        cell: CellCoord,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnit { unit, cell } => write!(
                f,
                "cell ({}, {}) holds unit {} which is not alive",
                cell.column(),
                cell.row(),
                unit.get()
            ),
        }
    }
}

impl Error for RenderingError {}
