//! Move application and combat arithmetic.
//!
//! A move sends every soldier but one from the source cell to the
//! destination. Friendly soldiers at the destination add up, anything else
//! fights: the larger side keeps the cell with the difference.

use crate::game::{Board, Cell, Color, Position};

/// Result of applying one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Destination cell after the move.
    pub destination: Cell,
    /// Whether the destination changed hands from another owner (or from a
    /// neutral garrison) to the mover.
    pub captured: bool,
}

/// Soldiers the destination opposes to the mover.
///
/// Negative for a friendly garrison, which joins instead of fighting.
fn challenge(to_cell: &Cell, color: Color) -> i64 {
    match to_cell.soldiers() {
        None => 0,
        Some(soldiers) if to_cell.belongs_to(color) => -i64::from(soldiers),
        Some(soldiers) => i64::from(soldiers),
    }
}

fn clamp_soldiers(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Apply a move by `color` from `from` to `to`.
///
/// `from_cell` and `to_cell` are the cells the move was validated against;
/// no validation happens here. The source keeps its kind, becomes owned by
/// `color`, and is left with exactly one soldier. The destination:
///
/// - `Empty` becomes an army of the mover with the moving soldiers.
/// - `EmptyCastle` becomes a castle of the mover with the moving soldiers.
/// - Armies, crowns and occupied castles keep their kind; the mover takes
///   them if it ends with more soldiers than the defenders, and the survivors
///   of the larger side stay.
pub fn apply_move(
    board: &mut Board,
    from: (Position, Cell),
    to: (Position, Cell),
    color: Color,
) -> MoveOutcome {
    let (from_pos, from_cell) = from;
    let (to_pos, to_cell) = to;

    let moving = i64::from(from_cell.soldiers().unwrap_or(0)) - 1;
    let delta = moving - challenge(&to_cell, color);

    let destination = if to_cell.is_vacant() || delta > 0 {
        to_cell.garrisoned(color, clamp_soldiers(delta.unsigned_abs()))
    } else {
        Some(to_cell.with_soldiers(clamp_soldiers(delta.unsigned_abs())))
    }
    .unwrap_or(to_cell);

    let captured = destination.belongs_to(color) && !to_cell.belongs_to(color);

    board.set(to_pos, destination);
    if let Some(source) = from_cell.garrisoned(color, 1) {
        board.set(from_pos, source);
    }

    MoveOutcome {
        destination,
        captured,
    }
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Combat never produces a garrison larger than both sides combined.
    #[kani::proof]
    fn prove_delta_bounded() {
        let attacking: u32 = kani::any();
        let defending: u32 = kani::any();
        kani::assume(attacking > 1);

        let moving = i64::from(attacking) - 1;
        let enemy = moving - i64::from(defending);
        let friendly = moving + i64::from(defending);

        assert!(enemy.unsigned_abs() <= u64::from(attacking.max(defending)));
        assert!(friendly.unsigned_abs() <= u64::from(attacking) + u64::from(defending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(from_cell: Cell, to_cell: Cell) -> (Board, Position, Position) {
        let mut board = Board::new(5).unwrap();
        let from = Position::new(2, 2);
        let to = Position::new(2, 3);
        board.set(from, from_cell);
        board.set(to, to_cell);
        (board, from, to)
    }

    fn run(from_cell: Cell, to_cell: Cell, color: Color) -> (Board, MoveOutcome) {
        let (mut board, from, to) = setup(from_cell, to_cell);
        let outcome = apply_move(&mut board, (from, from_cell), (to, to_cell), color);
        (board, outcome)
    }

    #[test]
    fn test_attacker_wins() {
        let (board, outcome) = run(
            Cell::army(Color::Blue, 30),
            Cell::army(Color::Red, 10),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::army(Color::Blue, 19));
        assert!(outcome.captured);
        assert_eq!(board.get(Position::new(2, 2)), Some(&Cell::army(Color::Blue, 1)));
        assert_eq!(board.get(Position::new(2, 3)), Some(&Cell::army(Color::Blue, 19)));
    }

    #[test]
    fn test_reinforcement() {
        let (_, outcome) = run(
            Cell::army(Color::Green, 10),
            Cell::army(Color::Green, 5),
            Color::Green,
        );
        assert_eq!(outcome.destination, Cell::army(Color::Green, 14));
        assert!(!outcome.captured);
    }

    #[test]
    fn test_defender_holds() {
        let (board, outcome) = run(
            Cell::army(Color::Blue, 5),
            Cell::army(Color::Red, 20),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::army(Color::Red, 16));
        assert!(!outcome.captured);
        assert_eq!(board.get(Position::new(2, 2)), Some(&Cell::army(Color::Blue, 1)));
    }

    #[test]
    fn test_tie_leaves_defender_empty_handed() {
        let (_, outcome) = run(
            Cell::army(Color::Blue, 11),
            Cell::army(Color::Red, 10),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::army(Color::Red, 0));
    }

    #[test]
    fn test_move_into_empty() {
        let (_, outcome) = run(Cell::army(Color::Blue, 7), Cell::Empty, Color::Blue);
        assert_eq!(outcome.destination, Cell::army(Color::Blue, 6));
        assert!(outcome.captured);
    }

    #[test]
    fn test_move_into_empty_castle() {
        let (_, outcome) = run(Cell::army(Color::Blue, 7), Cell::EmptyCastle, Color::Blue);
        assert_eq!(outcome.destination, Cell::castle(Color::Blue, 6));
    }

    #[test]
    fn test_neutral_castle_siege() {
        let (_, outcome) = run(
            Cell::army(Color::Blue, 20),
            Cell::neutral_castle(25),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::neutral_castle(6));

        let (_, outcome) = run(
            Cell::army(Color::Blue, 40),
            Cell::neutral_castle(25),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::castle(Color::Blue, 14));
        assert!(outcome.captured);
    }

    #[test]
    fn test_crown_keeps_identity() {
        let (_, outcome) = run(
            Cell::army(Color::Blue, 50),
            Cell::crown(Color::Red, 12),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::crown(Color::Blue, 37));
    }

    #[test]
    fn test_source_keeps_kind() {
        let (board, _) = run(Cell::crown(Color::Yellow, 9), Cell::Empty, Color::Yellow);
        assert_eq!(board.get(Position::new(2, 2)), Some(&Cell::crown(Color::Yellow, 1)));

        let (board, _) = run(Cell::castle(Color::Yellow, 9), Cell::Empty, Color::Yellow);
        assert_eq!(board.get(Position::new(2, 2)), Some(&Cell::castle(Color::Yellow, 1)));
    }

    #[test]
    fn test_huge_reinforcement_saturates() {
        let (_, outcome) = run(
            Cell::army(Color::Blue, u32::MAX),
            Cell::army(Color::Blue, u32::MAX),
            Color::Blue,
        );
        assert_eq!(outcome.destination, Cell::army(Color::Blue, u32::MAX));
    }
}
