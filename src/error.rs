//! Error types for the match engine.

use std::fmt;

use crate::game::{Color, Position};

/// Errors returned by engine operations.
///
/// Every error is returned from the operation that detects it; nothing is
/// retried automatically and none of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The match is already running.
    AlreadyStarted,
    /// The match cannot start without registered players.
    NoPlayers,
    /// Every palette colour is taken.
    MaxPlayersReached,
    /// No player with this colour is registered.
    UnknownPlayer(Color),
    /// A move endpoint lies outside the board (or there is no board yet).
    PositionOutOfBoard(Position),
    /// The source cell of a move does not belong to the moving player.
    CellNotOwnedByPlayer(Position),
    /// The destination cell of a move cannot be occupied.
    DestinationNotOccupable(Position),
    /// The source cell holds a single soldier and cannot be vacated.
    InsufficientSoldiers(Position),
    /// No empty start cell could be found for this colour.
    BoardGenerationFailed(Color),
    /// A board cannot have this size.
    InvalidBoardSize(u16),
    /// The tick thread could not be started.
    SchedulerUnavailable(String),
    /// The match configuration is unreadable or inconsistent.
    Config(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::AlreadyStarted => write!(f, "game has already started"),
            GameError::NoPlayers => write!(f, "game cannot start without any player"),
            GameError::MaxPlayersReached => write!(f, "maximum number of players reached"),
            GameError::UnknownPlayer(color) => write!(f, "no {color} player in this game"),
            GameError::PositionOutOfBoard(pos) => write!(f, "position {pos} is out of the board"),
            GameError::CellNotOwnedByPlayer(pos) => {
                write!(f, "cell {pos} does not belong to the player")
            }
            GameError::DestinationNotOccupable(pos) => {
                write!(f, "cell {pos} cannot be occupied")
            }
            GameError::InsufficientSoldiers(pos) => {
                write!(f, "not enough soldiers at {pos} to move")
            }
            GameError::BoardGenerationFailed(color) => {
                write!(f, "could not find an empty cell for player {color}")
            }
            GameError::InvalidBoardSize(size) => write!(f, "invalid board size: {size}"),
            GameError::SchedulerUnavailable(reason) => {
                write!(f, "could not start the tick scheduler: {reason}")
            }
            GameError::Config(reason) => write!(f, "invalid match configuration: {reason}"),
        }
    }
}

impl std::error::Error for GameError {}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
