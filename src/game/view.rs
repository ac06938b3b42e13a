//! Fog-of-war projection and army tallies.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::game::{Board, Cell, Color, Position};

/// A cell as seen by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCell {
    /// The true cell.
    Visible(Cell),
    /// Hidden by fog of war.
    Unknown,
}

impl ViewCell {
    /// The true cell, if visible.
    #[must_use]
    pub const fn cell(&self) -> Option<&Cell> {
        match self {
            ViewCell::Visible(cell) => Some(cell),
            ViewCell::Unknown => None,
        }
    }

    /// Whether the cell is hidden.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, ViewCell::Unknown)
    }
}

// Visible cells serialise exactly like `Cell`; hidden ones as
// `{"type":"unknown"}`.
impl Serialize for ViewCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ViewCell::Visible(cell) => cell.serialize(serializer),
            ViewCell::Unknown => {
                let mut state = serializer.serialize_struct("Unknown", 1)?;
                state.serialize_field("type", "unknown")?;
                state.end()
            }
        }
    }
}

/// A player's view of the board: same shape, fogged cells replaced by
/// [`ViewCell::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    size: u16,
    cells: Vec<ViewCell>,
}

impl BoardView {
    /// Side length.
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Cell at `pos` as seen by the viewer.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&ViewCell> {
        if pos.row < self.size && pos.column < self.size {
            self.cells
                .get(usize::from(pos.row) * usize::from(self.size) + usize::from(pos.column))
        } else {
            None
        }
    }

    /// Rows of the view, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[ViewCell]> {
        self.cells.chunks(usize::from(self.size).max(1))
    }

    /// Iterate over all positions and view cells.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &ViewCell)> {
        let size = usize::from(self.size).max(1);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let pos = Position::new((idx / size) as u16, (idx % size) as u16);
            (pos, cell)
        })
    }

    /// Number of cells hidden by fog.
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_unknown()).count()
    }
}

impl Serialize for BoardView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<&[ViewCell]> = self.rows().collect();
        let mut state = serializer.serialize_struct("BoardView", 2)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

/// Soldier totals per registered colour.
pub type ArmyTotals = BTreeMap<Color, u64>;

/// Whether `color` can see the cell at `pos`.
///
/// Own cells and mountains are always visible; anything else only when one
/// of its Moore neighbours belongs to `color`.
#[must_use]
pub fn can_see(board: &Board, color: Color, pos: Position) -> bool {
    let Some(cell) = board.get(pos) else {
        return false;
    };
    if cell.belongs_to(color) || *cell == Cell::Mountain {
        return true;
    }

    let (neighbors, count) = pos.neighbors(board.size());
    neighbors[..usize::from(count)]
        .iter()
        .any(|adj| board.get(*adj).is_some_and(|c| c.belongs_to(color)))
}

/// Project the board as seen by `color`.
#[must_use]
pub fn project_view(board: &Board, color: Color) -> BoardView {
    let cells = board
        .iter()
        .map(|(pos, cell)| {
            if can_see(board, color, pos) {
                ViewCell::Visible(*cell)
            } else {
                ViewCell::Unknown
            }
        })
        .collect();

    BoardView {
        size: board.size(),
        cells,
    }
}

/// Sum soldiers on occupied cells per colour.
///
/// Every colour in `colors` appears in the result, at zero if it holds
/// nothing; cells of other colours are ignored.
#[must_use]
pub fn army_totals<I>(colors: I, board: &Board) -> ArmyTotals
where
    I: IntoIterator<Item = Color>,
{
    let mut totals: ArmyTotals = colors.into_iter().map(|color| (color, 0)).collect();

    for cell in board.cells() {
        if let (Some(owner), Some(soldiers)) = (cell.owner(), cell.soldiers())
            && let Some(total) = totals.get_mut(&owner)
        {
            *total = total.saturating_add(u64::from(soldiers));
        }
    }

    totals
}
