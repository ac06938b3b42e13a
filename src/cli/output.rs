//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use crowns::game::ArmyTotals;
use crowns::{Board, Cell, Color};
use serde::Serialize;

/// JSON-serializable board.
#[derive(Debug, Serialize)]
pub(super) struct JsonBoard {
    /// Side length.
    pub(super) size: u16,
    /// Cells, row by row.
    pub(super) rows: Vec<Vec<Cell>>,
}

impl JsonBoard {
    /// Create from a board.
    pub(super) fn from_board(board: &Board) -> Self {
        Self {
            size: board.size(),
            rows: board.rows().map(<[Cell]>::to_vec).collect(),
        }
    }
}

/// JSON-serializable generated board.
#[derive(Debug, Serialize)]
pub(super) struct JsonGenerated {
    /// Random seed used.
    pub(super) seed: u64,
    /// Crown position per colour.
    pub(super) crowns: Vec<JsonCrown>,
    /// The board.
    pub(super) board: JsonBoard,
}

/// JSON-serializable crown location.
#[derive(Debug, Serialize)]
pub(super) struct JsonCrown {
    /// Owner.
    pub(super) color: Color,
    /// Row of the crown.
    pub(super) row: u16,
    /// Column of the crown.
    pub(super) column: u16,
}

/// Final standing of one player.
#[derive(Debug, Clone, Serialize)]
pub(super) struct Standing {
    /// Player colour.
    pub(super) color: Color,
    /// Display name.
    pub(super) name: String,
    /// Soldiers on the board at the end.
    pub(super) soldiers: u64,
    /// Whether the player still holds their crown.
    pub(super) crowned: bool,
}

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Ticks played.
    pub(super) ticks: u32,
    /// Per-player results, strongest first.
    pub(super) players: Vec<Standing>,
    /// Final board.
    pub(super) board: JsonBoard,
}

/// Collect standings from the final board, strongest first.
pub(super) fn standings(board: &Board, names: &[(Color, String)], totals: &ArmyTotals) -> Vec<Standing> {
    let mut standings: Vec<Standing> = names
        .iter()
        .map(|(color, name)| Standing {
            color: *color,
            name: name.clone(),
            soldiers: totals.get(color).copied().unwrap_or(0),
            crowned: board.crown_of(*color).is_some(),
        })
        .collect();
    standings.sort_by(|a, b| b.soldiers.cmp(&a.soldiers).then(a.color.cmp(&b.color)));
    standings
}

/// Format a match result as human-readable text.
pub(super) fn format_text(seed: u64, ticks: u32, standings: &[Standing], board: &Board) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {seed})");
    let _ = writeln!(output, "  Ticks: {ticks}\n");

    for (rank, standing) in standings.iter().enumerate() {
        let _ = write!(
            output,
            "  {}. {:<8} {:>6} soldiers ({})",
            rank + 1,
            standing.color,
            standing.soldiers,
            standing.name
        );
        if !standing.crowned {
            output.push_str(" [crown lost]");
        }
        output.push('\n');
    }

    output.push('\n');
    let _ = write!(output, "{board}");
    output
}
