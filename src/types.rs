//! Core types shared across the engine
//!
//! Pure data types with no dependencies on the rest of the crate.

/// Default board dimensions
pub const DEFAULT_BOARD_WIDTH: i32 = 10;
pub const DEFAULT_BOARD_HEIGHT: i32 = 20;

/// Default timing: gravity interval at level 1, and the per-level speedup factor.
pub const DEFAULT_DROP_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_SPEED_MULTIPLIER: f64 = 0.85;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds, in canonical order (one bag's worth).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Stable color index used in encoded grids (1..=7; 0 is empty).
    pub fn color_index(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// A single board cell.
///
/// The board only ever stores `Empty` and `Filled`; `Shadow` marks ghost-piece
/// cells in rendered grids (see `GameSnapshot::render_grid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
    Shadow,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Encoded value: 0 empty, 1..=7 piece colors, 8 shadow marker.
    pub fn as_u8(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.color_index(),
            Cell::Shadow => 8,
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// Player actions accepted by `GameSession::dispatch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveDown,
    SoftDrop,
    RotateCw,
    RotateCcw,
    HardDrop,
}

impl GameAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::SoftDrop => "softDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::HardDrop => "hardDrop",
        }
    }
}

/// Line-clear classification by simultaneous row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClearKind {
    Single,
    Double,
    Triple,
    Tetris,
}

impl ClearKind {
    /// Maps a cleared-row count to its classification (1..=4).
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ClearKind::Single),
            2 => Some(ClearKind::Double),
            3 => Some(ClearKind::Triple),
            4 => Some(ClearKind::Tetris),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearKind::Single => "single",
            ClearKind::Double => "double",
            ClearKind::Triple => "triple",
            ClearKind::Tetris => "tetris",
        }
    }
}
