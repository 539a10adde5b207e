use serde::{Deserialize, Serialize};

/// Offset of a single block relative to a piece anchor, as `(row, col)`.
pub type Offset = (i32, i32);

/// One rotation state of a tetromino: four block offsets.
pub type Shape = [Offset; 4];

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every kind, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the ordered rotation states of this kind.
    ///
    /// The number of states follows the symmetry of the shape: one for O, two
    /// for I, S and Z, four for T, J and L. Index 0 is the spawn orientation
    /// and each following index is one clockwise step.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::O.rotations().len(), 1);
    /// assert_eq!(PieceKind::I.rotations().len(), 2);
    /// assert_eq!(PieceKind::T.rotations().len(), 4);
    /// ```
    #[must_use]
    pub const fn rotations(self) -> &'static [Shape] {
        match self {
            PieceKind::I => &I_SHAPES,
            PieceKind::O => &O_SHAPES,
            PieceKind::T => &T_SHAPES,
            PieceKind::S => &S_SHAPES,
            PieceKind::Z => &Z_SHAPES,
            PieceKind::J => &J_SHAPES,
            PieceKind::L => &L_SHAPES,
        }
    }

    /// Number of distinct rotation states of this kind.
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

const I_SHAPES: [Shape; 2] = [
    [(0, 0), (0, 1), (0, 2), (0, 3)],
    [(0, 0), (1, 0), (2, 0), (3, 0)],
];

const O_SHAPES: [Shape; 1] = [[(0, 0), (0, 1), (1, 0), (1, 1)]];

const T_SHAPES: [Shape; 4] = [
    [(0, 0), (0, 1), (0, 2), (1, 1)],
    [(0, 0), (1, 0), (2, 0), (1, 1)],
    [(1, 0), (1, 1), (1, 2), (0, 1)],
    [(0, 0), (1, 0), (2, 0), (1, -1)],
];

const S_SHAPES: [Shape; 2] = [
    [(0, 1), (0, 2), (1, 0), (1, 1)],
    [(0, 0), (1, 0), (1, 1), (2, 1)],
];

const Z_SHAPES: [Shape; 2] = [
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    [(0, 1), (1, 0), (1, 1), (2, 0)],
];

const J_SHAPES: [Shape; 4] = [
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(0, 0), (0, 1), (1, 0), (2, 0)],
    [(0, 0), (0, 1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (2, 0), (2, -1)],
];

const L_SHAPES: [Shape; 4] = [
    [(0, 2), (1, 0), (1, 1), (1, 2)],
    [(0, 0), (1, 0), (2, 0), (2, 1)],
    [(0, 0), (0, 1), (0, 2), (1, 0)],
    [(0, 0), (0, 1), (1, 1), (2, 1)],
];
