// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Crowns: a real-time, tick-driven conquest game engine.
//!
//! Up to four players share a square board. Each holds a crown that spawns
//! soldiers; players queue moves that push soldiers across the board to
//! take empty ground, castles and each other's cells. Every tick the engine
//! resolves one queued move per player, grows soldiers on a fixed cadence
//! and pushes each player a fog-of-war view of the board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Transport (CLI bots, sockets)     │
//! ├─────────────────────────────────────┤
//! │   Match controller + ticker thread  │
//! ├─────────────────────────────────────┤
//! │   Board engine (rules, no I/O)      │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod game;

pub use config::MatchConfig;
pub use controller::{Match, MatchState, TickSummary};
pub use error::{GameError, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{Board, BoardView, Cell, Color, Move, Position, ViewCell, ViewSink, ViewUpdate};
