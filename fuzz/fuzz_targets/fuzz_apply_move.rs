#![no_main]

use arbitrary::Arbitrary;
use crowns::game::{PALETTE, apply_move};
use crowns::{Board, Cell, Position};
use libfuzzer_sys::fuzz_target;

/// A destination cell chosen by the fuzzer.
#[derive(Arbitrary, Debug)]
enum FuzzCell {
    Empty,
    EmptyCastle,
    Army { color: u8, soldiers: u32 },
    Castle { color: Option<u8>, soldiers: u32 },
    Crown { color: u8, soldiers: u32 },
}

/// Structured input for move fuzzing.
#[derive(Arbitrary, Debug)]
struct MoveInput {
    /// Mover colour index.
    color: u8,
    /// Soldiers on the source (at least 2 after clamping).
    soldiers: u32,
    /// Destination before the move.
    target: FuzzCell,
}

fuzz_target!(|input: MoveInput| {
    let pick = |i: u8| PALETTE[usize::from(i) % PALETTE.len()];
    let color = pick(input.color);
    let from_cell = Cell::army(color, input.soldiers.max(2));
    let to_cell = match input.target {
        FuzzCell::Empty => Cell::Empty,
        FuzzCell::EmptyCastle => Cell::EmptyCastle,
        FuzzCell::Army { color, soldiers } => Cell::army(pick(color), soldiers),
        FuzzCell::Castle { color: Some(color), soldiers } => Cell::castle(pick(color), soldiers),
        FuzzCell::Castle { color: None, soldiers } => Cell::neutral_castle(soldiers),
        FuzzCell::Crown { color, soldiers } => Cell::crown(pick(color), soldiers),
    };

    let Some(mut board) = Board::new(2) else {
        return;
    };
    let from = Position::new(0, 0);
    let to = Position::new(0, 1);
    board.set(from, from_cell);
    board.set(to, to_cell);

    // Must not panic, even at u32::MAX.
    let outcome = apply_move(&mut board, (from, from_cell), (to, to_cell), color);

    assert_eq!(board.get(from), Some(&Cell::army(color, 1)));
    assert_eq!(board.get(to), Some(&outcome.destination));
    if to_cell.belongs_to(color) || to_cell.is_vacant() {
        assert!(outcome.destination.belongs_to(color));
    }
    if outcome.captured {
        assert!(!to_cell.belongs_to(color));
    }
});
