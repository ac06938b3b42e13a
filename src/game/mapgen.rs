//! Randomised board generation.
//!
//! Obstacles are placed in a single row-major scan whose placement chance
//! ramps up with the scan position and down with the quota already spent, so
//! quotas are rarely exhausted early while the top of the board stays open.
//! Crowns are then placed on the board edges, one edge per palette slot.

// Probability maths mixes integer counters with floats
#![allow(clippy::cast_precision_loss)]

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::{Board, Cell, Color, Position};

/// Peak placement probability, reached on the last cell with a full quota.
const PLACEMENT_SCALE: f64 = 0.25;

/// Board generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    /// Side length of the square board.
    pub size: u16,
    /// Mountain quota.
    pub mountains: u32,
    /// Neutral castle quota.
    pub castles: u32,
    /// Smallest neutral castle garrison.
    pub garrison_min: u32,
    /// Largest neutral castle garrison.
    pub garrison_max: u32,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            size: 25,
            mountains: 25,
            castles: 10,
            garrison_min: 20,
            garrison_max: 50,
        }
    }
}

/// Remaining and total count of one obstacle kind.
#[derive(Debug, Clone, Copy)]
struct Quota {
    left: u32,
    total: u32,
}

impl Quota {
    const fn new(total: u32) -> Self {
        Self { left: total, total }
    }

    /// Roll for a placement at scan progress `progress` (in `(0, 1]`).
    fn roll<R: Rng>(&mut self, rng: &mut R, progress: f64) -> bool {
        if self.left == 0 {
            return false;
        }
        let chance = f64::from(self.left) / f64::from(self.total) * progress * PLACEMENT_SCALE;
        if rng.random::<f64>() < chance {
            self.left -= 1;
            true
        } else {
            false
        }
    }
}

/// Generate a board with obstacles and one crown per colour.
///
/// Colours are placed in order; the `i`-th colour scans edge `i mod 4`:
/// top row left to right, bottom row right to left, right column top to
/// bottom, left column bottom to top. The first empty cell on that scan
/// becomes the colour's crown with no soldiers.
///
/// # Errors
///
/// - [`GameError::NoPlayers`] if `colors` is empty.
/// - [`GameError::InvalidBoardSize`] if the size is zero.
/// - [`GameError::BoardGenerationFailed`] if a colour finds no empty cell on
///   its edge, or appears twice. Nothing of the partial board is returned.
pub fn generate_board<R: Rng>(
    rng: &mut R,
    params: &BoardParams,
    colors: &[Color],
) -> GameResult<Board> {
    if colors.is_empty() {
        return Err(GameError::NoPlayers);
    }

    let mut board = Board::new(params.size).ok_or(GameError::InvalidBoardSize(params.size))?;

    place_obstacles(&mut board, rng, params);

    place_crowns(&mut board, colors)?;

    Ok(board)
}

/// Scatter mountains and neutral castles, mountains taking priority.
fn place_obstacles<R: Rng>(board: &mut Board, rng: &mut R, params: &BoardParams) {
    let mut mountains = Quota::new(params.mountains);
    let mut castles = Quota::new(params.castles);
    let garrison = params.garrison_min.min(params.garrison_max)..=params.garrison_max;

    let total = board.cells().len() as f64;
    for (idx, cell) in board.cells_mut().iter_mut().enumerate() {
        let progress = (idx + 1) as f64 / total;
        if mountains.roll(rng, progress) {
            *cell = Cell::Mountain;
        } else if castles.roll(rng, progress) {
            *cell = Cell::neutral_castle(rng.random_range(garrison.clone()));
        }
    }
}

/// Put one crown per colour on its start edge.
fn place_crowns(board: &mut Board, colors: &[Color]) -> GameResult<()> {
    for (player_index, &color) in colors.iter().enumerate() {
        if colors[..player_index].contains(&color) {
            return Err(GameError::BoardGenerationFailed(color));
        }
        let start = start_scan(player_index, board.size())
            .into_iter()
            .find(|&pos| board.get(pos) == Some(&Cell::Empty))
            .ok_or(GameError::BoardGenerationFailed(color))?;
        board.set(start, Cell::crown(color, 0));
    }
    Ok(())
}

/// Cells scanned for the start of the player at `player_index`.
fn start_scan(player_index: usize, size: u16) -> Vec<Position> {
    let last = size - 1;
    match player_index % 4 {
        0 => (0..size).map(|column| Position::new(0, column)).collect(),
        1 => (0..size).rev().map(|column| Position::new(last, column)).collect(),
        2 => (0..size).map(|row| Position::new(row, last)).collect(),
        _ => (0..size).rev().map(|row| Position::new(row, 0)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PALETTE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn crowns(board: &Board) -> Vec<(Position, Color)> {
        board
            .iter()
            .filter_map(|(pos, cell)| match cell {
                Cell::Crown { color, .. } => Some((pos, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_generation_determinism() {
        let params = BoardParams::default();
        let board1 = generate_board(&mut StdRng::seed_from_u64(42), &params, &PALETTE).unwrap();
        let board2 = generate_board(&mut StdRng::seed_from_u64(42), &params, &PALETTE).unwrap();
        assert_eq!(board1, board2);
    }

    #[test]
    fn test_one_crown_per_color() {
        let params = BoardParams::default();
        for seed in 0..50 {
            let board =
                generate_board(&mut StdRng::seed_from_u64(seed), &params, &PALETTE).unwrap();
            let found = crowns(&board);
            assert_eq!(found.len(), 4, "seed {seed}");
            for color in PALETTE {
                assert_eq!(found.iter().filter(|(_, c)| *c == color).count(), 1);
            }
        }
    }

    #[test]
    fn test_quotas_respected() {
        let params = BoardParams::default();
        for seed in 0..50 {
            let board =
                generate_board(&mut StdRng::seed_from_u64(seed), &params, &PALETTE[..2]).unwrap();
            let mountains = board.cells().iter().filter(|c| **c == Cell::Mountain).count();
            let castles: Vec<u32> = board
                .cells()
                .iter()
                .filter_map(|c| match c {
                    Cell::OccupiedCastle { color: None, soldiers } => Some(*soldiers),
                    _ => None,
                })
                .collect();
            assert!(mountains <= 25);
            assert!(castles.len() <= 10);
            assert!(castles.iter().all(|s| (20..=50).contains(s)));
        }
    }

    #[test]
    fn test_start_edges() {
        let params = BoardParams {
            mountains: 0,
            castles: 0,
            ..BoardParams::default()
        };
        let board = generate_board(&mut StdRng::seed_from_u64(1), &params, &PALETTE).unwrap();
        assert_eq!(board.crown_of(Color::Blue), Some(Position::new(0, 0)));
        assert_eq!(board.crown_of(Color::Green), Some(Position::new(24, 24)));
        assert_eq!(board.crown_of(Color::Red), Some(Position::new(0, 24)));
        assert_eq!(board.crown_of(Color::Yellow), Some(Position::new(24, 0)));
    }

    #[test]
    fn test_start_skips_taken_cells() {
        // On a 1x1 board every edge scan is the same single cell.
        let params = BoardParams {
            size: 1,
            mountains: 0,
            castles: 0,
            ..BoardParams::default()
        };
        let board = generate_board(&mut StdRng::seed_from_u64(1), &params, &PALETTE[..1]).unwrap();
        assert_eq!(board.crown_of(Color::Blue), Some(Position::new(0, 0)));

        let result = generate_board(&mut StdRng::seed_from_u64(1), &params, &PALETTE[..2]);
        assert_eq!(result, Err(GameError::BoardGenerationFailed(Color::Green)));
    }

    #[test]
    fn test_blocked_edge_fails() {
        let mut board = Board::new(3).unwrap();
        for column in 0..3 {
            board.set(Position::new(0, column), Cell::Mountain);
        }
        let result = place_crowns(&mut board, &[Color::Blue]);
        assert_eq!(result, Err(GameError::BoardGenerationFailed(Color::Blue)));

        // Later slots are unaffected by the blocked top row.
        let mut board = Board::new(3).unwrap();
        board.set(Position::new(2, 2), Cell::Mountain);
        board.set(Position::new(0, 0), Cell::EmptyCastle);
        place_crowns(&mut board, &[Color::Blue, Color::Green]).unwrap();
        assert_eq!(board.crown_of(Color::Blue), Some(Position::new(0, 1)));
        assert_eq!(board.crown_of(Color::Green), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_invalid_inputs() {
        let params = BoardParams {
            size: 0,
            ..BoardParams::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_board(&mut rng, &params, &PALETTE),
            Err(GameError::InvalidBoardSize(0))
        );
        assert_eq!(
            generate_board(&mut rng, &BoardParams::default(), &[]),
            Err(GameError::NoPlayers)
        );
        assert_eq!(
            generate_board(&mut rng, &BoardParams::default(), &[Color::Red, Color::Red]),
            Err(GameError::BoardGenerationFailed(Color::Red))
        );
    }
}
