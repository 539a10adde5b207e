//! Deterministic falling-block game engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - static shapes, pieces and the board grid
//! - [`engine`] - the 7-bag randomizer, scoring, and the [`GameSession`]
//!   state machine that drivers talk to
//!
//! Rendering, input polling and frame pacing live outside this crate. A driver
//! feeds [`Command`]s and elapsed time into a [`GameSession`] and reads back a
//! [`GameSnapshot`] after every call.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{GameSession, PieceSeed};
//!
//! let mut session = GameSession::with_seed(PieceSeed::from(42));
//! session.move_by(0, -1);
//! session.hard_drop();
//! session.tick(Duration::from_millis(16));
//!
//! assert_eq!(session.level(), 1);
//! assert!(session.score() > 0);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Fewest rows that hold a vertical I piece.
pub const MIN_BOARD_ROWS: usize = 4;
/// Fewest columns where a horizontal I piece spawned at `cols / 2 - 1` stays
/// inside the grid.
pub const MIN_BOARD_COLS: usize = 5;
/// Largest supported board dimension.
pub const MAX_BOARD_DIMENSION: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting current piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board needs {}..={} rows, got {rows}",
        MIN_BOARD_ROWS,
        MAX_BOARD_DIMENSION
    )]
    InvalidRows { rows: usize },
    #[display(
        "board needs {}..={} columns, got {cols}",
        MIN_BOARD_COLS,
        MAX_BOARD_DIMENSION
    )]
    InvalidColumns { cols: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex characters, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid seed: {text:?} is not hexadecimal")]
    InvalidHex { text: String },
}
