#![no_main]

//! Match fuzzer.
//!
//! Registers players, starts a seeded match and feeds arbitrary moves
//! between ticks. Rejected moves are fine; panics and broken board shape
//! are not.

use arbitrary::Arbitrary;
use crowns::game::BoardParams;
use crowns::{MatchConfig, MatchState, Move, Position, ViewUpdate};
use libfuzzer_sys::fuzz_target;

/// One fuzzer-generated submission.
#[derive(Arbitrary, Debug)]
struct FuzzMove {
    player: u8,
    from: (u8, u8),
    to: (u8, u8),
}

/// Structured input for match fuzzing.
#[derive(Arbitrary, Debug)]
struct TickInput {
    seed: u64,
    size: u8,
    players: u8,
    /// Moves submitted per tick.
    rounds: Vec<Vec<FuzzMove>>,
}

fuzz_target!(|input: TickInput| {
    let size = u16::from(input.size % 16) + 1;
    let config = MatchConfig {
        board: BoardParams {
            size,
            mountains: u32::from(size),
            castles: u32::from(size / 2),
            ..BoardParams::default()
        },
        seed: Some(input.seed),
        ..MatchConfig::default()
    };

    let mut state = MatchState::new(config);
    let players = usize::from(input.players % 4) + 1;
    let mut colors = Vec::with_capacity(players);
    for i in 0..players {
        match state.register_player(format!("p{i}"), Box::new(|_update: ViewUpdate| {})) {
            Ok(color) => colors.push(color),
            Err(_) => return,
        }
    }
    if state.begin().is_err() {
        return;
    }

    for round in input.rounds.into_iter().take(64) {
        for mv in round.into_iter().take(8) {
            let color = colors[usize::from(mv.player) % colors.len()];
            let from = Position::new(u16::from(mv.from.0), u16::from(mv.from.1));
            let to = Position::new(u16::from(mv.to.0), u16::from(mv.to.1));
            let _ = state.submit_move(color, Move::new(from, to));
        }
        let Some(summary) = state.tick() else {
            return;
        };
        assert!(summary.moves_applied + summary.queues_dropped <= colors.len());

        let Some(board) = state.board() else {
            return;
        };
        assert_eq!(board.cells().len(), usize::from(size) * usize::from(size));
    }
});
