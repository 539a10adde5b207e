use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    ConfigError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, RotationDirection},
        shape::PieceKind,
    },
};

use super::{
    command::Command,
    config::EngineConfig,
    game_stats::GameStats,
    piece_bag::{PieceBag, PieceSeed},
    snapshot::GameSnapshot,
};

/// Column offsets tried, in order, when a rotation is blocked.
///
/// This is a fixed horizontal kick list that ignores piece kind and rotation
/// state; it is not the Super Rotation System kick table.
const KICK_OFFSETS: [i32; 4] = [1, -1, 2, -2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Running,
    Paused,
    GameOver,
}

/// A single game: board, falling piece, queue, score and gravity timer.
///
/// Every command is synchronous and completes in bounded time. Movement,
/// rotation and drop commands only act while the session is
/// [`SessionState::Running`]; [`restart`](Self::restart) works in any state.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameSession, PieceSeed};
///
/// let mut session = GameSession::with_seed(PieceSeed::from(7));
/// let start = session.current_piece().anchor();
///
/// // gravity moves the piece one row per interval (800ms at level 1)
/// session.tick(Duration::from_millis(799));
/// assert_eq!(session.current_piece().anchor(), start);
/// session.tick(Duration::from_millis(1));
/// assert_eq!(session.current_piece().anchor().row, start.row + 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: EngineConfig,
    board: Board,
    current: Piece,
    next: PieceKind,
    bag: PieceBag,
    stats: GameStats,
    drop_timer: Duration,
    state: SessionState,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a standard 20x10 game with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(EngineConfig::default(), PieceBag::new())
    }

    /// Starts a standard 20x10 game with a fixed piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_parts(EngineConfig::default(), PieceBag::with_seed(seed))
    }

    pub fn with_config(config: EngineConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, PieceBag::with_seed(seed)))
    }

    /// Starts a game on a pre-filled board, taking its dimensions as the
    /// configuration.
    ///
    /// The first piece is spawned against the given cells, so a board with a
    /// blocked spawn area yields a session that is already over.
    pub fn with_board(board: Board, seed: PieceSeed) -> Result<Self, ConfigError> {
        let config = EngineConfig {
            rows: board.height(),
            cols: board.width(),
        };
        config.validate()?;
        let mut session = Self::from_parts(config, PieceBag::with_seed(seed));
        session.board = board;
        session.check_spawn();
        Ok(session)
    }

    fn from_parts(config: EngineConfig, mut bag: PieceBag) -> Self {
        let current = Piece::spawn(bag.next_kind(), config.cols);
        let next = bag.next_kind();
        let mut session = Self {
            config,
            board: Board::new(config.rows, config.cols),
            current,
            next,
            bag,
            stats: GameStats::new(),
            drop_timer: Duration::ZERO,
            state: SessionState::Running,
        };
        session.check_spawn();
        session
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.stats.lines_cleared()
    }

    /// Current gravity interval, derived from the level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.stats.drop_interval()
    }

    /// Time accumulated towards the next gravity step.
    #[must_use]
    pub fn drop_timer(&self) -> Duration {
        self.drop_timer
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// The current piece moved straight down as far as it can go.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        let mut ghost = self.current;
        loop {
            let below = ghost.translated(1, 0);
            if !self.board.is_valid(&below.occupied_cells()) {
                return ghost;
            }
            ghost = below;
        }
    }

    /// Read-only view of everything a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.rows().map(row_text).collect(),
            current: self.current,
            ghost: self.ghost_piece(),
            next: self.next,
            stats: self.stats.clone(),
            state: self.state,
        }
    }

    /// Replaces the current piece if it fits the board.
    pub fn set_current_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.is_valid(&piece.occupied_cells()) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        Ok(())
    }

    /// Dispatches a [`Command`] to the matching method.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => {
                self.move_by(0, -1);
            }
            Command::MoveRight => {
                self.move_by(0, 1);
            }
            Command::SoftDrop => {
                self.soft_drop();
            }
            Command::RotateClockwise => self.rotate(RotationDirection::Clockwise),
            Command::RotateCounterClockwise => self.rotate(RotationDirection::CounterClockwise),
            Command::HardDrop => self.hard_drop(),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
        }
    }

    /// Moves the current piece by `(dr, dc)` if the target cells are free.
    ///
    /// Returns whether the piece moved.
    pub fn move_by(&mut self, dr: i32, dc: i32) -> bool {
        self.state.is_running() && self.try_move(dr, dc)
    }

    /// Rotates the current piece one step, kicking it sideways if needed.
    ///
    /// The plain rotation is tried first, then the same rotation shifted by
    /// each of +1, -1, +2 and -2 columns. The first placement that fits is
    /// taken; if none fits the piece is left as it was.
    pub fn rotate(&mut self, direction: RotationDirection) {
        if !self.state.is_running() {
            return;
        }
        let rotated = self.current.rotated_cells(direction);
        let kick = std::iter::once(0)
            .chain(KICK_OFFSETS)
            .find(|&dc| self.board.is_valid(&rotated.map(|pos| pos.offset(0, dc))));
        if let Some(dc) = kick {
            self.current.commit_rotation(direction);
            self.current.translate(0, dc);
        }
    }

    /// Moves the current piece down one row for 1 point.
    ///
    /// Returns whether the piece moved.
    pub fn soft_drop(&mut self) -> bool {
        if !self.move_by(1, 0) {
            return false;
        }
        self.stats.add_drop_points(1);
        true
    }

    /// Drops the current piece to the floor for 2 points per row and locks it.
    pub fn hard_drop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let mut rows = 0;
        while self.try_move(1, 0) {
            rows += 1;
        }
        self.stats.add_drop_points(rows * 2);
        self.lock_and_clear();
    }

    /// Advances the gravity timer by `elapsed`.
    ///
    /// Once the timer reaches the drop interval it is reset to zero and the
    /// piece moves down one row, or locks if it cannot. At most one gravity
    /// step happens per call.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.state.is_running() {
            return;
        }
        self.drop_timer = self.drop_timer.saturating_add(elapsed);
        if self.drop_timer < self.drop_interval() {
            return;
        }
        self.drop_timer = Duration::ZERO;
        if !self.try_move(1, 0) {
            self.lock_and_clear();
        }
    }

    /// Switches between running and paused. Has no effect after game over.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Running => SessionState::Paused,
            SessionState::Paused => SessionState::Running,
            SessionState::GameOver => SessionState::GameOver,
        };
        debug!(state = ?self.state, "pause toggled");
    }

    /// Starts a fresh game in place, from any state.
    pub fn restart(&mut self) {
        self.reset();
    }

    /// Reinitializes every field of the session without reallocating it.
    ///
    /// The board is emptied, the bag starts a new set of seven, statistics and
    /// the gravity timer go back to zero, and a new current and next piece are
    /// drawn. The piece generator is not reseeded.
    pub fn reset(&mut self) {
        info!(
            score = self.stats.score(),
            lines = self.stats.lines_cleared(),
            "restarting game"
        );
        self.board.clear();
        self.bag.reset();
        self.stats = GameStats::new();
        self.drop_timer = Duration::ZERO;
        self.state = SessionState::Running;
        self.current = Piece::spawn(self.bag.next_kind(), self.config.cols);
        self.next = self.bag.next_kind();
        self.check_spawn();
    }

    fn try_move(&mut self, dr: i32, dc: i32) -> bool {
        let moved = self.current.translated(dr, dc);
        if !self.board.is_valid(&moved.occupied_cells()) {
            return false;
        }
        self.current = moved;
        true
    }

    fn lock_and_clear(&mut self) {
        let kind = self.current.kind();
        self.board.lock(&self.current.occupied_cells(), kind);
        let cleared = self.board.clear_full_lines();
        let (points, level_up) = self.stats.complete_piece_drop(cleared);
        debug!(?kind, cleared, points, score = self.stats.score(), "piece locked");
        if level_up {
            debug!(
                level = self.stats.level(),
                interval_ms = self.drop_interval().as_millis(),
                "level up"
            );
        }
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        self.current = Piece::spawn(self.next, self.config.cols);
        self.next = self.bag.next_kind();
        self.check_spawn();
    }

    fn check_spawn(&mut self) {
        if self.board.is_valid(&self.current.occupied_cells()) {
            return;
        }
        self.state = SessionState::GameOver;
        info!(
            score = self.stats.score(),
            lines = self.stats.lines_cleared(),
            level = self.stats.level(),
            pieces = self.stats.completed_pieces(),
            "game over"
        );
    }
}

fn row_text(row: &[crate::Cell]) -> String {
    row.iter().map(|cell| cell.as_char()).collect()
}
