use serde::Serialize;

use crate::{
    core::{piece::Piece, shape::PieceKind},
    engine::{game_session::SessionState, game_stats::GameStats},
};

/// Owned, read-only view of a [`GameSession`](super::GameSession).
///
/// Produced by [`GameSession::snapshot`](super::GameSession::snapshot) after
/// any command. Board rows are listed top to bottom with `.` for empty cells
/// and the piece letter for occupied ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Vec<String>,
    pub current: Piece,
    pub ghost: Piece,
    pub next: PieceKind,
    pub stats: GameStats,
    pub state: SessionState,
}

impl GameSnapshot {
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Board text with the current piece drawn in lowercase and its ghost as
    /// `+`, for debugging output.
    #[must_use]
    pub fn render(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .board
            .iter()
            .map(|row| row.chars().collect())
            .collect();
        let mut paint = |piece: &Piece, ch: char| {
            for pos in piece.occupied_cells() {
                let (Ok(row), Ok(col)) = (usize::try_from(pos.row), usize::try_from(pos.col))
                else {
                    continue;
                };
                if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = ch;
                }
            }
        };
        if !self.is_game_over() {
            paint(&self.ghost, '+');
            paint(&self.current, self.current.kind().as_char().to_ascii_lowercase());
        }
        rows.iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
