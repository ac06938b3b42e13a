//! Cell variants and the classification predicates built on them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player colour.
///
/// The derived ordering follows [`PALETTE`], so maps keyed by colour iterate
/// in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// First colour handed out.
    Blue,
    /// Second colour handed out.
    Green,
    /// Third colour handed out.
    Red,
    /// Fourth colour handed out.
    Yellow,
}

/// Colours in assignment order. Its length is the player limit of a match.
pub const PALETTE: [Color; 4] = [Color::Blue, Color::Green, Color::Red, Color::Yellow];

impl Color {
    /// Lowercase name, as used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Red => "red",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A single board cell.
///
/// Cells are plain values: every state change replaces the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Cell {
    /// Open ground.
    Empty,
    /// Impassable, visible to everyone.
    Mountain,
    /// Soldiers in the field. Grows only on army-growth ticks.
    Army {
        /// Owner.
        color: Color,
        /// Garrison size.
        soldiers: u32,
    },
    /// A castle nobody holds. Does not grow.
    EmptyCastle,
    /// A garrisoned castle; `color` is `None` for a neutral garrison.
    OccupiedCastle {
        /// Owner, if any.
        color: Option<Color>,
        /// Garrison size.
        soldiers: u32,
    },
    /// A player's capital.
    Crown {
        /// Owner.
        color: Color,
        /// Garrison size.
        soldiers: u32,
    },
}

impl Cell {
    /// Army cell.
    #[must_use]
    pub const fn army(color: Color, soldiers: u32) -> Self {
        Cell::Army { color, soldiers }
    }

    /// Crown cell.
    #[must_use]
    pub const fn crown(color: Color, soldiers: u32) -> Self {
        Cell::Crown { color, soldiers }
    }

    /// Castle held by `color`.
    #[must_use]
    pub const fn castle(color: Color, soldiers: u32) -> Self {
        Cell::OccupiedCastle {
            color: Some(color),
            soldiers,
        }
    }

    /// Castle with a neutral garrison.
    #[must_use]
    pub const fn neutral_castle(soldiers: u32) -> Self {
        Cell::OccupiedCastle {
            color: None,
            soldiers,
        }
    }

    /// Owner of the cell, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<Color> {
        match *self {
            Cell::Army { color, .. } | Cell::Crown { color, .. } => Some(color),
            Cell::OccupiedCastle { color, .. } => color,
            Cell::Empty | Cell::Mountain | Cell::EmptyCastle => None,
        }
    }

    /// Garrison size, for cells that carry soldiers.
    #[must_use]
    pub const fn soldiers(&self) -> Option<u32> {
        match *self {
            Cell::Army { soldiers, .. }
            | Cell::Crown { soldiers, .. }
            | Cell::OccupiedCastle { soldiers, .. } => Some(soldiers),
            Cell::Empty | Cell::Mountain | Cell::EmptyCastle => None,
        }
    }

    /// Empty ground or an empty castle: nothing to fight.
    #[must_use]
    pub const fn is_vacant(&self) -> bool {
        matches!(self, Cell::Empty | Cell::EmptyCastle)
    }

    /// Held by a player: an army, a crown, or a castle with an owner.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.owner().is_some()
    }

    /// Any legal move destination, i.e. everything except mountains.
    #[must_use]
    pub const fn is_occupable(&self) -> bool {
        !matches!(self, Cell::Mountain)
    }

    /// Occupied and owned by `color`.
    #[must_use]
    pub fn belongs_to(&self, color: Color) -> bool {
        self.owner() == Some(color)
    }

    /// Same kind of cell with a new owner and garrison.
    ///
    /// Vacant cells become the matching occupied kind (`Empty` turns into an
    /// army, `EmptyCastle` into an occupied castle). Returns `None` for a
    /// mountain.
    #[must_use]
    pub const fn garrisoned(&self, color: Color, soldiers: u32) -> Option<Self> {
        match self {
            Cell::Empty | Cell::Army { .. } => Some(Cell::army(color, soldiers)),
            Cell::EmptyCastle | Cell::OccupiedCastle { .. } => Some(Cell::castle(color, soldiers)),
            Cell::Crown { .. } => Some(Cell::crown(color, soldiers)),
            Cell::Mountain => None,
        }
    }

    /// Same cell with a different garrison size. Cells without soldiers are
    /// returned unchanged.
    #[must_use]
    pub const fn with_soldiers(&self, soldiers: u32) -> Self {
        match *self {
            Cell::Army { color, .. } => Cell::Army { color, soldiers },
            Cell::Crown { color, .. } => Cell::Crown { color, soldiers },
            Cell::OccupiedCastle { color, .. } => Cell::OccupiedCastle { color, soldiers },
            other => other,
        }
    }
}
