//! Match controller: lifecycle, tick scheduling and move validation.
//!
//! [`MatchState`] holds every rule and is driven by plain method calls, which
//! keeps it deterministic and testable without timers. [`Match`] wraps it in
//! a lock and owns the ticker thread that calls [`MatchState::tick`] on a
//! fixed period.
//!
//! ```text
//! Idle ──start()──▶ Running ──end()──▶ Idle
//!  ▲  register_player        tick: resolve moves → grow → push views
//!  └── players cleared on end()
//! ```

mod ticker;

use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::config::MatchConfig;
use crate::error::{GameError, GameResult};
use crate::game::{
    Board, Cell, Color, Move, Player, ViewSink, ViewUpdate, apply_move, army_totals,
    generate_board, grow_all, new_player, project_view,
};

use ticker::Ticker;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number, starting at 1 after `start`.
    pub tick: u32,
    /// Queued moves applied this tick.
    pub moves_applied: usize,
    /// Players whose queue was discarded this tick.
    pub queues_dropped: usize,
    /// Whether crowns and castles grew.
    pub grew: bool,
    /// Whether armies grew as well.
    pub armies_grew: bool,
}

/// Check a move when it is submitted.
///
/// The source must belong to the player now, or be the destination of one of
/// the player's queued moves, so paths can be queued ahead of resolution. The
/// destination must be occupable.
///
/// # Errors
///
/// [`GameError::PositionOutOfBoard`], [`GameError::CellNotOwnedByPlayer`] or
/// [`GameError::DestinationNotOccupable`].
pub fn validate_submission(board: &Board, player: &Player, mv: Move) -> GameResult<()> {
    let from_cell = board
        .get(mv.from)
        .ok_or(GameError::PositionOutOfBoard(mv.from))?;
    if !from_cell.belongs_to(player.color) && !player.has_queued_destination(mv.from) {
        return Err(GameError::CellNotOwnedByPlayer(mv.from));
    }

    let to_cell = board.get(mv.to).ok_or(GameError::PositionOutOfBoard(mv.to))?;
    if !to_cell.is_occupable() {
        return Err(GameError::DestinationNotOccupable(mv.to));
    }

    Ok(())
}

/// Check a move right before applying it.
///
/// Returns the source and destination cells the move will be applied to.
///
/// # Errors
///
/// [`GameError::PositionOutOfBoard`], [`GameError::CellNotOwnedByPlayer`],
/// [`GameError::DestinationNotOccupable`] or
/// [`GameError::InsufficientSoldiers`] when the source holds one soldier or
/// fewer.
pub fn validate_move_now(board: &Board, color: Color, mv: Move) -> GameResult<(Cell, Cell)> {
    let from_cell = *board
        .get(mv.from)
        .ok_or(GameError::PositionOutOfBoard(mv.from))?;
    if !from_cell.belongs_to(color) {
        return Err(GameError::CellNotOwnedByPlayer(mv.from));
    }

    let to_cell = *board.get(mv.to).ok_or(GameError::PositionOutOfBoard(mv.to))?;
    if !to_cell.is_occupable() {
        return Err(GameError::DestinationNotOccupable(mv.to));
    }

    if from_cell.soldiers().unwrap_or(0) <= 1 {
        return Err(GameError::InsufficientSoldiers(mv.from));
    }

    Ok((from_cell, to_cell))
}

/// Complete state of one match.
#[derive(Debug)]
pub struct MatchState {
    config: MatchConfig,
    /// Board of the current (or last) match.
    board: Option<Board>,
    /// Registered players, in registration order.
    players: Vec<Player>,
    running: bool,
    tick: u32,
    rng: StdRng,
}

impl MatchState {
    /// Create an idle match with no players.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            board: None,
            players: Vec::new(),
            running: false,
            tick: 0,
            rng,
        }
    }

    /// The match configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Whether the match is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks since the last start.
    #[must_use]
    pub const fn tick_count(&self) -> u32 {
        self.tick
    }

    /// The authoritative board of the current or last match.
    #[must_use]
    pub const fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Registered players.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player with `color`.
    #[must_use]
    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| p.color == color)
    }

    fn colors(&self) -> Vec<Color> {
        self.players.iter().map(|p| p.color).collect()
    }

    /// Register a player under the first free colour.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyStarted`] while running,
    /// [`GameError::MaxPlayersReached`] when every colour is taken.
    pub fn register_player(
        &mut self,
        name: impl Into<String>,
        sink: Box<dyn ViewSink>,
    ) -> GameResult<Color> {
        if self.running {
            return Err(GameError::AlreadyStarted);
        }
        let player = new_player(&self.colors(), name, sink)?;
        let color = player.color;
        info!(%color, name = %player.name, "player registered");
        self.players.push(player);
        Ok(color)
    }

    /// Remove the player with `color`. Returns whether one was removed.
    ///
    /// The match keeps running even when the last player leaves; ending it
    /// is up to the caller.
    pub fn remove_player(&mut self, color: Color) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.color != color);
        let removed = self.players.len() != before;
        if removed {
            info!(%color, remaining = self.players.len(), "player removed");
        }
        removed
    }

    /// Generate a board, push the first views and mark the match running.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyStarted`], [`GameError::NoPlayers`], or any
    /// board generation error. On error the match stays idle.
    pub fn begin(&mut self) -> GameResult<()> {
        if self.running {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }

        let colors = self.colors();
        let board = generate_board(&mut self.rng, &self.config.board, &colors).inspect_err(
            |err| warn!(%err, "board generation failed"),
        )?;

        for player in &mut self.players {
            player.clear_moves();
        }
        self.board = Some(board);
        self.tick = 0;
        self.running = true;
        info!(players = colors.len(), "match started");
        self.broadcast();
        Ok(())
    }

    /// Stop running without touching the players.
    fn suspend(&mut self) {
        self.running = false;
    }

    /// Stop running and clear the players. The last board stays readable.
    pub fn halt(&mut self) {
        if self.running {
            info!(ticks = self.tick, "match ended");
        }
        self.running = false;
        self.players.clear();
    }

    /// Submit-time check of a move by `color`.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownPlayer`], [`GameError::PositionOutOfBoard`] when
    /// the match is not running, or any [`validate_submission`] error.
    pub fn check_move_is_valid(&self, color: Color, mv: Move) -> GameResult<()> {
        let player = self.player(color).ok_or(GameError::UnknownPlayer(color))?;
        let board = self.live_board().ok_or(GameError::PositionOutOfBoard(mv.from))?;
        validate_submission(board, player, mv)
    }

    /// Resolve-time check of a move by `color`.
    ///
    /// # Errors
    ///
    /// [`GameError::PositionOutOfBoard`] when the match is not running, or
    /// any [`validate_move_now`] error.
    pub fn check_move_is_valid_now(&self, color: Color, mv: Move) -> GameResult<(Cell, Cell)> {
        let board = self.live_board().ok_or(GameError::PositionOutOfBoard(mv.from))?;
        validate_move_now(board, color, mv)
    }

    fn live_board(&self) -> Option<&Board> {
        self.board.as_ref().filter(|_| self.running)
    }

    /// Validate and queue a move for `color`.
    ///
    /// # Errors
    ///
    /// Any [`MatchState::check_move_is_valid`] error; the queue is unchanged.
    pub fn submit_move(&mut self, color: Color, mv: Move) -> GameResult<()> {
        self.check_move_is_valid(color, mv)?;
        if let Some(player) = self.players.iter_mut().find(|p| p.color == color) {
            player.queue_move(mv);
        }
        Ok(())
    }

    /// Apply the head of every player's queue.
    ///
    /// A head that no longer validates discards the player's whole queue,
    /// since later moves were planned from it. Returns the number of moves
    /// applied and of queues discarded.
    pub fn resolve_next_moves(&mut self) -> (usize, usize) {
        let Some(board) = self.board.as_mut() else {
            return (0, 0);
        };

        let mut applied = 0;
        let mut dropped = 0;
        for player in &mut self.players {
            let Some(&mv) = player.next_move() else {
                continue;
            };
            match validate_move_now(board, player.color, mv) {
                Ok((from_cell, to_cell)) => {
                    let outcome =
                        apply_move(board, (mv.from, from_cell), (mv.to, to_cell), player.color);
                    player.pop_move();
                    applied += 1;
                    debug!(
                        color = %player.color,
                        from = %mv.from,
                        to = %mv.to,
                        captured = outcome.captured,
                        "move applied"
                    );
                }
                Err(reason) => {
                    let count = player.clear_moves();
                    dropped += 1;
                    debug!(color = %player.color, %reason, count, "move queue discarded");
                }
            }
        }

        (applied, dropped)
    }

    /// Run one tick: resolve moves, grow on cadence, push views.
    ///
    /// Returns `None` when the match is not running.
    pub fn tick(&mut self) -> Option<TickSummary> {
        if !self.running {
            return None;
        }

        self.tick = self.tick.saturating_add(1);
        let (moves_applied, queues_dropped) = self.resolve_next_moves();

        let grew = self.config.is_growth_tick(self.tick);
        let armies_grew = grew && self.config.is_army_growth_tick(self.tick);
        if grew && let Some(board) = self.board.as_mut() {
            grow_all(board, armies_grew);
        }

        self.broadcast();

        let summary = TickSummary {
            tick: self.tick,
            moves_applied,
            queues_dropped,
            grew,
            armies_grew,
        };
        trace!(?summary, "tick");
        Some(summary)
    }

    /// The update `color` would receive right now.
    #[must_use]
    pub fn snapshot_for(&self, color: Color) -> Option<ViewUpdate> {
        let board = self.board.as_ref()?;
        self.player(color)?;
        Some(ViewUpdate {
            view: project_view(board, color),
            army_totals: army_totals(self.colors(), board),
        })
    }

    /// Push a fresh view and the army totals to every player.
    pub fn broadcast(&self) {
        let Some(board) = self.board.as_ref() else {
            return;
        };
        let totals = army_totals(self.colors(), board);
        for player in &self.players {
            player.push_view(ViewUpdate {
                view: project_view(board, player.color),
                army_totals: totals.clone(),
            });
        }
    }
}

/// A match shared between the transport and its ticker thread.
///
/// All methods take `&self`; wrap the match in an `Arc` to share it.
#[derive(Debug)]
pub struct Match {
    state: Arc<Mutex<MatchState>>,
    ticker: Mutex<Option<Ticker>>,
}

impl Match {
    /// Create an idle match.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(MatchState::new(config))),
            ticker: Mutex::new(None),
        }
    }

    /// Register a player; see [`MatchState::register_player`].
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyStarted`] or [`GameError::MaxPlayersReached`].
    pub fn register_player(
        &self,
        name: impl Into<String>,
        sink: impl ViewSink + 'static,
    ) -> GameResult<Color> {
        self.state.lock().register_player(name, Box::new(sink))
    }

    /// Remove a player; see [`MatchState::remove_player`].
    pub fn remove_player(&self, color: Color) -> bool {
        self.state.lock().remove_player(color)
    }

    /// Generate the board, push the first views and start ticking.
    ///
    /// # Errors
    ///
    /// Any [`MatchState::begin`] error, or
    /// [`GameError::SchedulerUnavailable`] if the ticker thread cannot be
    /// spawned. The match stays idle on error.
    pub fn start(&self) -> GameResult<()> {
        let mut ticker = self.ticker.lock();
        let period = {
            let mut state = self.state.lock();
            state.begin()?;
            state.config().tick_period()
        };

        match Ticker::spawn(Arc::clone(&self.state), period) {
            Ok(spawned) => {
                *ticker = Some(spawned);
                Ok(())
            }
            Err(err) => {
                self.state.lock().suspend();
                Err(GameError::SchedulerUnavailable(err.to_string()))
            }
        }
    }

    /// Stop ticking and clear the players. Safe to call at any time, any
    /// number of times; a tick in progress completes first.
    pub fn end(&self) {
        if let Some(ticker) = self.ticker.lock().take() {
            ticker.stop();
        }
        self.state.lock().halt();
    }

    /// Validate and queue a move; see [`MatchState::submit_move`].
    ///
    /// # Errors
    ///
    /// Any [`MatchState::check_move_is_valid`] error.
    pub fn submit_move(&self, color: Color, mv: Move) -> GameResult<()> {
        self.state.lock().submit_move(color, mv)
    }

    /// Whether the match is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().is_running()
    }

    /// The update `color` would receive right now.
    #[must_use]
    pub fn snapshot_for(&self, color: Color) -> Option<ViewUpdate> {
        self.state.lock().snapshot_for(color)
    }

    /// Run `f` with the state locked.
    pub fn with_state<T>(&self, f: impl FnOnce(&MatchState) -> T) -> T {
        f(&*self.state.lock())
    }
}

impl Drop for Match {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().take() {
            ticker.stop();
        }
    }
}
