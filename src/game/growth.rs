//! Soldier growth.

use crate::game::{Board, Cell};

/// Grow every garrison for one growth tick.
///
/// Crowns and owned castles gain one soldier on every call. Armies gain one
/// soldier only when `grow_armies` is set. Neutral castles never grow.
pub fn grow_all(board: &mut Board, grow_armies: bool) {
    for cell in board.cells_mut() {
        match cell {
            Cell::Crown { soldiers, .. }
            | Cell::OccupiedCastle {
                color: Some(_),
                soldiers,
            } => *soldiers = soldiers.saturating_add(1),
            Cell::Army { soldiers, .. } if grow_armies => *soldiers = soldiers.saturating_add(1),
            _ => {}
        }
    }
}
