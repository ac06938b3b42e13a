//! Built-in bot used by the `play` command.

use std::cmp::Reverse;

use crowns::game::{BoardView, ViewCell};
use crowns::{Cell, Color, Move, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Greedy expansion bot.
///
/// Each update it takes its strongest visible cell and pushes into a
/// neighbour it can capture, falling back to any passable neighbour.
#[derive(Debug)]
pub(super) struct ExpansionBot {
    color: Color,
    rng: StdRng,
}

impl ExpansionBot {
    pub(super) fn new(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(super) const fn color(&self) -> Color {
        self.color
    }

    /// Pick a move for this view, if any cell can move.
    pub(super) fn choose(&mut self, view: &BoardView) -> Option<Move> {
        let (from, soldiers) = view
            .iter()
            .filter_map(|(pos, cell)| match cell {
                ViewCell::Visible(cell) if cell.belongs_to(self.color) => {
                    cell.soldiers().map(|s| (pos, s))
                }
                _ => None,
            })
            .filter(|&(_, soldiers)| soldiers > 1)
            .max_by_key(|&(pos, soldiers)| (soldiers, Reverse(pos)))?;

        let (neighbors, count) = from.neighbors(view.size());
        let passable: Vec<(Position, Cell)> = neighbors[..usize::from(count)]
            .iter()
            .filter_map(|&pos| match view.get(pos) {
                Some(ViewCell::Visible(cell)) if cell.is_occupable() => Some((pos, *cell)),
                _ => None,
            })
            .collect();

        let capturable: Vec<Position> = passable
            .iter()
            .filter(|(_, cell)| !cell.belongs_to(self.color) && can_take(cell, soldiers))
            .map(|(pos, _)| *pos)
            .collect();

        let to = match capturable.choose(&mut self.rng) {
            Some(&pos) => pos,
            None => passable.choose(&mut self.rng).map(|(pos, _)| *pos)?,
        };
        Some(Move::new(from, to))
    }
}

/// Whether `soldiers` moving in would take `cell`.
fn can_take(cell: &Cell, soldiers: u32) -> bool {
    cell.is_vacant() || cell.soldiers().is_some_and(|defenders| defenders < soldiers - 1)
}
