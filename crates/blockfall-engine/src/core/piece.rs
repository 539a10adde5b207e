use serde::{Deserialize, Serialize};

use super::shape::{PieceKind, Shape};

/// Absolute cell position on the board.
///
/// Row 0 is the top of the board and rows grow downward. Positions may lie
/// outside the grid (for example a negative row above the visible area); the
/// board decides what that means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, dr: i32, dc: i32) -> Self {
        Self::new(self.row + dr, self.col + dc)
    }
}

/// Direction of a single rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Signed step applied to a rotation index.
    #[must_use]
    pub const fn steps(self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }
}

/// A falling tetromino: kind, rotation state and anchor position.
///
/// The anchor is the origin that the shape offsets of the current rotation
/// are added to. `Piece` is a small `Copy` value; the board never holds one.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, Position, RotationDirection};
///
/// let mut piece = Piece::spawn(PieceKind::I, 10);
/// assert_eq!(piece.anchor(), Position::new(0, 4));
///
/// let preview = piece.rotated_cells(RotationDirection::Clockwise);
/// piece.commit_rotation(RotationDirection::Clockwise);
/// assert_eq!(piece.occupied_cells(), preview);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    kind: PieceKind,
    rotation: usize,
    anchor: Position,
}

impl Piece {
    /// Creates a piece at `anchor` in its spawn orientation.
    #[must_use]
    pub const fn new(kind: PieceKind, anchor: Position) -> Self {
        Self {
            kind,
            rotation: 0,
            anchor,
        }
    }

    /// Creates a piece at the spawn position of a board `cols` wide: top row,
    /// horizontally centered.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn spawn(kind: PieceKind, cols: usize) -> Self {
        Self::new(kind, Position::new(0, (cols / 2) as i32 - 1))
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Current rotation index, always in `0..kind().rotation_count()`.
    #[must_use]
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    /// Absolute positions of the four blocks of this piece.
    #[must_use]
    pub fn occupied_cells(&self) -> [Position; 4] {
        self.cells_for(self.rotation)
    }

    /// Cells this piece would occupy after one rotation step, without
    /// changing the piece.
    #[must_use]
    pub fn rotated_cells(&self, direction: RotationDirection) -> [Position; 4] {
        self.cells_for(self.rotation_after(direction.steps()))
    }

    /// Advances the rotation index by one step in `direction`.
    pub fn commit_rotation(&mut self, direction: RotationDirection) {
        self.rotate_by(direction.steps());
    }

    /// Advances the rotation index by an arbitrary signed number of steps.
    ///
    /// The index wraps modulo the rotation count of the kind, so negative
    /// steps land in range as well.
    pub fn rotate_by(&mut self, steps: i32) {
        self.rotation = self.rotation_after(steps);
    }

    /// Moves the anchor by `(dr, dc)`.
    pub fn translate(&mut self, dr: i32, dc: i32) {
        self.anchor = self.anchor.offset(dr, dc);
    }

    /// Returns a copy of this piece moved by `(dr, dc)`.
    #[must_use]
    pub fn translated(&self, dr: i32, dc: i32) -> Self {
        let mut piece = *self;
        piece.translate(dr, dc);
        piece
    }

    fn shape(&self, rotation: usize) -> Shape {
        self.kind.rotations()[rotation]
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn rotation_after(&self, steps: i32) -> usize {
        let count = self.kind.rotation_count() as i32;
        (self.rotation as i32 + steps).rem_euclid(count) as usize
    }

    fn cells_for(&self, rotation: usize) -> [Position; 4] {
        self.shape(rotation)
            .map(|(dr, dc)| self.anchor.offset(dr, dc))
    }
}
