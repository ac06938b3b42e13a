//! Match lifecycle tests through the public API.
//!
//! Timed tests use a short tick period and only assert lower bounds on tick
//! counts, so a slow machine cannot make them flaky.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, unbounded};
use crowns::game::{BoardParams, PALETTE};
use crowns::{
    Cell, Color, GameError, Match, MatchConfig, MatchState, Move, Position, ViewCell, ViewSink,
    ViewUpdate,
};

fn fast_config(seed: u64) -> MatchConfig {
    MatchConfig {
        tick_period_ms: 5,
        seed: Some(seed),
        ..MatchConfig::default()
    }
}

fn silent() -> Box<dyn ViewSink> {
    Box::new(|_update: ViewUpdate| {})
}

/// Wait until `pred` holds or the deadline passes.
fn wait_for(timeout: Duration, mut pred: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    pred()
}

fn drain(rx: &Receiver<ViewUpdate>) -> Vec<ViewUpdate> {
    rx.try_iter().collect()
}

#[test]
fn test_full_lifecycle() {
    let game = Match::new(fast_config(1));
    let (tx_a, rx_a) = unbounded();
    let (tx_b, _rx_b) = unbounded();
    assert_eq!(game.register_player("a", tx_a), Ok(Color::Blue));
    assert_eq!(game.register_player("b", tx_b), Ok(Color::Green));

    game.start().unwrap();
    assert!(game.is_running());
    assert_eq!(game.start(), Err(GameError::AlreadyStarted));

    // Initial view arrives before the first tick.
    let first = rx_a.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(first.view.size(), 25);
    assert_eq!(first.army_totals.len(), 2);

    assert!(wait_for(Duration::from_secs(5), || {
        game.with_state(MatchState::tick_count) >= 4
    }));
    assert!(drain(&rx_a).len() >= 3);

    game.end();
    assert!(!game.is_running());
    assert!(game.with_state(|s| s.players().is_empty()));

    let ticks = game.with_state(MatchState::tick_count);
    thread::sleep(Duration::from_millis(30));
    assert_eq!(game.with_state(MatchState::tick_count), ticks);
}

#[test]
fn test_end_is_idempotent() {
    let game = Match::new(fast_config(2));
    game.end();

    game.register_player("a", |_update: ViewUpdate| {}).unwrap();
    game.start().unwrap();
    game.end();
    game.end();
    assert!(!game.is_running());
}

#[test]
fn test_restart_after_end() {
    let game = Match::new(fast_config(3));
    game.register_player("a", |_update: ViewUpdate| {}).unwrap();
    game.start().unwrap();
    game.end();

    assert_eq!(game.start(), Err(GameError::NoPlayers));
    game.register_player("b", |_update: ViewUpdate| {}).unwrap();
    game.start().unwrap();
    assert!(game.is_running());
    game.end();
}

#[test]
fn test_fifth_player_rejected_without_mutation() {
    let game = Match::new(fast_config(4));
    for (i, color) in PALETTE.iter().enumerate() {
        assert_eq!(
            game.register_player(format!("p{i}"), |_update: ViewUpdate| {}),
            Ok(*color)
        );
    }
    assert_eq!(
        game.register_player("p4", |_update: ViewUpdate| {}),
        Err(GameError::MaxPlayersReached)
    );
    assert_eq!(game.with_state(|s| s.players().len()), 4);
}

#[test]
fn test_register_during_match_rejected() {
    let game = Match::new(fast_config(5));
    game.register_player("a", |_update: ViewUpdate| {}).unwrap();
    game.start().unwrap();
    assert_eq!(
        game.register_player("late", |_update: ViewUpdate| {}),
        Err(GameError::AlreadyStarted)
    );
    game.end();
}

#[test]
fn test_remove_player_keeps_match_running() {
    let game = Match::new(fast_config(6));
    let color = game.register_player("a", |_update: ViewUpdate| {}).unwrap();
    game.start().unwrap();
    assert!(game.remove_player(color));
    assert!(game.is_running());
    assert!(game.snapshot_for(color).is_none());
    game.end();
}

#[test]
fn test_timed_moves_expand_territory() {
    let game = Match::new(fast_config(7));
    let (tx, rx) = unbounded();
    let color = game.register_player("a", tx).unwrap();
    game.start().unwrap();

    let crown = game
        .with_state(|s| s.board().and_then(|b| b.crown_of(color)))
        .unwrap();
    drop(rx);

    // Wait for the crown to hold enough soldiers to split.
    assert!(wait_for(Duration::from_secs(5), || {
        game.with_state(|s| s.board().and_then(|b| b.get(crown)).and_then(Cell::soldiers))
            .is_some_and(|soldiers| soldiers >= 3)
    }));

    let (neighbors, count) = crown.neighbors(25);
    let target = game.with_state(|s| {
        let board = s.board().unwrap();
        neighbors[..usize::from(count)]
            .iter()
            .copied()
            .find(|pos| board.get(*pos).is_some_and(Cell::is_vacant))
    });
    let Some(target) = target else {
        game.end();
        return;
    };

    game.submit_move(color, Move::new(crown, target)).unwrap();
    assert!(wait_for(Duration::from_secs(5), || {
        game.with_state(|s| {
            s.board()
                .and_then(|b| b.get(target))
                .is_some_and(|c| c.belongs_to(color))
        })
    }));
    game.end();
}

#[test]
fn test_queue_discarded_on_invalid_head() {
    let config = MatchConfig {
        seed: Some(8),
        growth_interval: 0,
        ..MatchConfig::default()
    };
    let mut state = MatchState::new(config);
    let color = state.register_player("a", silent()).unwrap();
    state.begin().unwrap();
    let crown = state.board().unwrap().crown_of(color).unwrap();

    // The crown holds no soldiers yet, so the head fails at resolve time.
    let (neighbors, count) = crown.neighbors(25);
    let open: Vec<Position> = neighbors[..usize::from(count)]
        .iter()
        .copied()
        .filter(|pos| state.board().unwrap().get(*pos).is_some_and(Cell::is_occupable))
        .collect();
    let first = open.first().copied().unwrap_or(crown);
    state.submit_move(color, Move::new(crown, first)).unwrap();
    state.submit_move(color, Move::new(first, crown)).unwrap();
    state.submit_move(color, Move::new(crown, first)).unwrap();
    assert_eq!(state.player(color).unwrap().pending_moves().count(), 3);

    let summary = state.tick().unwrap();
    assert_eq!(summary.moves_applied, 0);
    assert_eq!(summary.queues_dropped, 1);
    assert_eq!(state.player(color).unwrap().pending_moves().count(), 0);
}

#[test]
fn test_fog_hides_other_crowns() {
    let mut state = MatchState::new(fast_config(9));
    let (tx, rx) = unbounded();
    let blue = state.register_player("a", Box::new(tx)).unwrap();
    let green = state.register_player("b", silent()).unwrap();
    state.begin().unwrap();

    let update = rx.try_recv().unwrap();
    let board = state.board().unwrap();
    let own = board.crown_of(blue).unwrap();
    let other = board.crown_of(green).unwrap();

    assert!(matches!(update.view.get(own), Some(ViewCell::Visible(Cell::Crown { .. }))));
    assert_eq!(update.view.get(other), Some(&ViewCell::Unknown));
    assert_eq!(update.army_totals.get(&green), Some(&0));
}

#[test]
fn test_seeded_matches_are_reproducible() {
    let boards: Vec<_> = (0..2)
        .map(|_| {
            let mut state = MatchState::new(fast_config(10));
            state.register_player("a", silent()).unwrap();
            state.register_player("b", silent()).unwrap();
            state.begin().unwrap();
            for _ in 0..40 {
                state.tick().unwrap();
            }
            state.board().cloned().unwrap()
        })
        .collect();
    assert_eq!(boards[0], boards[1]);
}

#[test]
fn test_generation_failure_keeps_match_idle() {
    let config = MatchConfig {
        board: BoardParams {
            size: 1,
            mountains: 0,
            castles: 0,
            ..BoardParams::default()
        },
        ..fast_config(11)
    };
    let game = Match::new(config);
    game.register_player("a", |_update: ViewUpdate| {}).unwrap();
    game.register_player("b", |_update: ViewUpdate| {}).unwrap();
    assert_eq!(
        game.start(),
        Err(GameError::BoardGenerationFailed(Color::Green))
    );
    assert!(!game.is_running());
}
