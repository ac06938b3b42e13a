//! Player registry: colours, move queues and view delivery.

use std::collections::VecDeque;
use std::fmt;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::{ArmyTotals, BoardView, Color, PALETTE, Position};

/// A move request: send soldiers from one cell to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Source cell.
    pub from: Position,
    /// Destination cell.
    pub to: Position,
}

impl Move {
    /// Create a new move.
    #[must_use]
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

/// What a player receives every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewUpdate {
    /// The board as this player sees it.
    pub view: BoardView,
    /// Soldier totals of every registered player.
    pub army_totals: ArmyTotals,
}

/// Receiver of per-tick view updates.
///
/// Called while the match is locked: implementations must not call back
/// into the match. Hand the update off (e.g. over a channel) instead.
pub trait ViewSink: Send {
    /// Deliver one update.
    fn on_view_update(&self, update: ViewUpdate);
}

impl<F> ViewSink for F
where
    F: Fn(ViewUpdate) + Send,
{
    fn on_view_update(&self, update: ViewUpdate) {
        self(update);
    }
}

/// Updates are dropped once the receiving side hangs up; detecting the
/// disconnect is left to the transport.
impl ViewSink for Sender<ViewUpdate> {
    fn on_view_update(&self, update: ViewUpdate) {
        let _ = self.send(update);
    }
}

/// A registered player.
pub struct Player {
    /// Unique colour within the match.
    pub color: Color,
    /// Display name.
    pub name: String,
    /// Pending moves, oldest first.
    moves: VecDeque<Move>,
    /// Where views are pushed.
    sink: Box<dyn ViewSink>,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("color", &self.color)
            .field("name", &self.name)
            .field("moves", &self.moves)
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Create a player with an empty move queue.
    #[must_use]
    pub fn new(color: Color, name: impl Into<String>, sink: Box<dyn ViewSink>) -> Self {
        Self {
            color,
            name: name.into(),
            moves: VecDeque::new(),
            sink,
        }
    }

    /// Append a move to the queue.
    pub fn queue_move(&mut self, mv: Move) {
        self.moves.push_back(mv);
    }

    /// Oldest pending move.
    #[must_use]
    pub fn next_move(&self) -> Option<&Move> {
        self.moves.front()
    }

    /// Drop the oldest pending move.
    pub fn pop_move(&mut self) -> Option<Move> {
        self.moves.pop_front()
    }

    /// Drop every pending move. Returns how many were dropped.
    pub fn clear_moves(&mut self) -> usize {
        let dropped = self.moves.len();
        self.moves.clear();
        dropped
    }

    /// Pending moves, oldest first.
    pub fn pending_moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    /// Whether a pending move ends at `pos`.
    #[must_use]
    pub fn has_queued_destination(&self, pos: Position) -> bool {
        self.moves.iter().any(|mv| mv.to == pos)
    }

    /// Push a view update to this player.
    pub fn push_view(&self, update: ViewUpdate) {
        self.sink.on_view_update(update);
    }
}

/// First palette colour not in `taken`.
///
/// # Errors
///
/// Returns [`GameError::MaxPlayersReached`] if every colour is taken.
pub fn assign_color(taken: &[Color]) -> GameResult<Color> {
    PALETTE
        .into_iter()
        .find(|color| !taken.contains(color))
        .ok_or(GameError::MaxPlayersReached)
}

/// Create a player with the first free colour.
///
/// # Errors
///
/// Returns [`GameError::MaxPlayersReached`] if every colour is taken.
pub fn new_player(
    taken: &[Color],
    name: impl Into<String>,
    sink: Box<dyn ViewSink>,
) -> GameResult<Player> {
    let color = assign_color(taken)?;
    Ok(Player::new(color, name, sink))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> Box<dyn ViewSink> {
        Box::new(|_update: ViewUpdate| {})
    }

    #[test]
    fn test_assign_color_order() {
        assert_eq!(assign_color(&[]), Ok(Color::Blue));
        assert_eq!(assign_color(&[Color::Blue]), Ok(Color::Green));
        assert_eq!(assign_color(&[Color::Green, Color::Red]), Ok(Color::Blue));
        assert_eq!(
            assign_color(&[Color::Blue, Color::Green, Color::Yellow]),
            Ok(Color::Red)
        );
    }

    #[test]
    fn test_assign_color_exhausted() {
        assert_eq!(assign_color(&PALETTE), Err(GameError::MaxPlayersReached));
    }

    #[test]
    fn test_new_player_has_empty_queue() {
        let player = new_player(&[Color::Blue], "alice", silent()).unwrap();
        assert_eq!(player.color, Color::Green);
        assert_eq!(player.name, "alice");
        assert!(player.next_move().is_none());
    }

    #[test]
    fn test_queue_fifo() {
        let mut player = Player::new(Color::Red, "bob", silent());
        let first = Move::new(Position::new(0, 0), Position::new(0, 1));
        let second = Move::new(Position::new(0, 1), Position::new(0, 2));
        player.queue_move(first);
        player.queue_move(second);

        assert_eq!(player.next_move(), Some(&first));
        assert!(player.has_queued_destination(Position::new(0, 2)));
        assert!(!player.has_queued_destination(Position::new(0, 0)));
        assert_eq!(player.pop_move(), Some(first));
        assert_eq!(player.next_move(), Some(&second));
        assert_eq!(player.clear_moves(), 1);
        assert!(player.next_move().is_none());
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let player = Player::new(Color::Blue, "carol", Box::new(tx));
        let board = crate::game::Board::new(2).unwrap();
        player.push_view(ViewUpdate {
            view: crate::game::project_view(&board, Color::Blue),
            army_totals: ArmyTotals::new(),
        });
        let update = rx.try_recv().unwrap();
        assert_eq!(update.view.size(), 2);
    }

    #[test]
    fn test_channel_sink_ignores_hangup() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let player = Player::new(Color::Blue, "dave", Box::new(tx));
        let board = crate::game::Board::new(1).unwrap();
        player.push_view(ViewUpdate {
            view: crate::game::project_view(&board, Color::Blue),
            army_totals: ArmyTotals::new(),
        });
    }
}
