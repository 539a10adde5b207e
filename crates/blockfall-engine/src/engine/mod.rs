//! Game rules and session state.
//!
//! This module builds the rules of play on top of the [`core`](crate::core)
//! data structures:
//!
//! - [`GameSession`] - the state machine a driver talks to
//! - [`GameStats`] - score, lines, level and the gravity curve
//! - [`PieceBag`] - seeded 7-bag piece generation
//! - [`Command`] and [`AutoRepeat`] - discrete input and held-key repeat
//! - [`EngineConfig`] - board dimensions
//! - [`GameSnapshot`] - read-only view for rendering
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`], optionally with a [`PieceSeed`]
//! 2. Apply player commands and advance gravity with [`GameSession::tick`]
//! 3. A piece that cannot fall further locks, full rows clear, the next
//!    piece spawns
//! 4. A spawn that collides ends the game; [`GameSession::restart`] begins a
//!    new one

pub use self::{
    command::*, config::*, game_session::*, game_stats::*, piece_bag::*, snapshot::*,
};

mod command;
mod config;
mod game_session;
mod game_stats;
mod piece_bag;
mod snapshot;
