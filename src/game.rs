//! Board engine for the conquest game.
//!
//! Implements the rules that run inside a match:
//! - Cells (empty ground, mountains, armies, castles, crowns)
//! - Board generation with obstacles and crown placement
//! - Move application and combat
//! - Periodic soldier growth
//! - Fog-of-war projection and army totals
//! - Players with their move queues

mod board;
mod cell;
mod combat;
mod growth;
mod mapgen;
mod player;
mod view;

pub use board::{Board, Position};
pub use cell::{Cell, Color, PALETTE};
pub use combat::{MoveOutcome, apply_move};
pub use growth::grow_all;
pub use mapgen::{BoardParams, generate_board};
pub use player::{Move, Player, ViewSink, ViewUpdate, assign_color, new_player};
pub use view::{ArmyTotals, BoardView, ViewCell, army_totals, can_see, project_view};
