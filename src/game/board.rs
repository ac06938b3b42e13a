//! Board grid and positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Cell, Color};

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, counted from the top.
    pub row: u16,
    /// Column, counted from the left.
    pub column: u16,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: u16, column: u16) -> Self {
        Self { row, column }
    }

    /// Moore neighbourhood (the up to 8 surrounding cells), clipped to a
    /// square board of side `size`.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid positions in indices 0..count.
    #[must_use]
    #[inline]
    pub fn neighbors(&self, size: u16) -> ([Position; 8], u8) {
        let mut result = [Position::new(0, 0); 8];
        let mut count = 0u8;

        let row_lo = self.row.saturating_sub(1);
        let row_hi = self.row.saturating_add(1).min(size.saturating_sub(1));
        let col_lo = self.column.saturating_sub(1);
        let col_hi = self.column.saturating_add(1).min(size.saturating_sub(1));

        for row in row_lo..=row_hi {
            for column in col_lo..=col_hi {
                if row == self.row && column == self.column {
                    continue;
                }
                result[usize::from(count)] = Position::new(row, column);
                count += 1;
            }
        }

        (result, count)
    }

    /// Chebyshev (king-move) distance to another position.
    #[must_use]
    pub fn distance(&self, other: Position) -> u16 {
        self.row.abs_diff(other.row).max(self.column.abs_diff(other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The authoritative square board.
///
/// Owned by a single match and mutated in place; players only ever see it
/// through [`project_view`](crate::game::project_view).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Side length.
    size: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Create a board filled with empty cells.
    ///
    /// Returns `None` if `size` is zero.
    #[must_use]
    pub fn new(size: u16) -> Option<Self> {
        if size == 0 {
            return None;
        }

        let len = usize::from(size) * usize::from(size);
        Some(Self {
            size,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable cells in row-major order, for index-based passes.
    #[must_use]
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Check if a position is on the board.
    #[must_use]
    pub const fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.column < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(usize::from(pos.row) * usize::from(self.size) + usize::from(pos.column))
        } else {
            None
        }
    }

    /// Position of a row-major index.
    #[must_use]
    pub fn position_of(&self, idx: usize) -> Position {
        let size = usize::from(self.size);
        #[allow(clippy::cast_possible_truncation)]
        Position::new((idx / size) as u16, (idx % size) as u16)
    }

    /// Cell at `pos`.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    /// Replace the cell at `pos`.
    ///
    /// Returns `false` if the position is out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Iterate over all positions and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.position_of(idx), cell))
    }

    /// Iterate over rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.size))
    }

    /// Positions of all cells owned by `color`.
    pub fn owned_by(&self, color: Color) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(move |(_, cell)| cell.belongs_to(color))
            .map(|(pos, _)| pos)
    }

    /// Position of the crown of `color`, if it still stands.
    #[must_use]
    pub fn crown_of(&self, color: Color) -> Option<Position> {
        self.iter()
            .find(|(_, cell)| matches!(cell, Cell::Crown { color: c, .. } if *c == color))
            .map(|(pos, _)| pos)
    }
}

/// Debug dump: one character per cell.
///
/// `.` empty, `^` mountain, `o` empty castle, `n` neutral castle, `*` crown,
/// and the owner's initial for armies (lowercase) and held castles (uppercase).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Mountain => '^',
                    Cell::EmptyCastle => 'o',
                    Cell::OccupiedCastle { color: None, .. } => 'n',
                    Cell::OccupiedCastle {
                        color: Some(color), ..
                    } => initial(*color).to_ascii_uppercase(),
                    Cell::Army { color, .. } => initial(*color),
                    Cell::Crown { .. } => '*',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn initial(color: Color) -> char {
    match color {
        Color::Blue => 'b',
        Color::Green => 'g',
        Color::Red => 'r',
        Color::Yellow => 'y',
    }
}
