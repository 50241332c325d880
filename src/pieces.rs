//! Piece catalog - tetromino shapes and rotation states
//!
//! Each kind has four precomputed rotation states expressed as offsets from
//! the piece anchor. Rotation here is purely geometric; wall-kick resolution
//! lives in the collision module.

use crate::types::{PieceKind, Rotation};

/// Offset of a single filled cell relative to the piece anchor
pub type CellOffset = (i32, i32);

/// Shape of a piece - 4 cell offsets from the anchor
pub type PieceShape = [CellOffset; 4];

/// Get the shape (cell offsets) for a piece kind and rotation
pub fn shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => i_shape(rotation),
        PieceKind::O => o_shape(rotation),
        PieceKind::T => t_shape(rotation),
        PieceKind::S => s_shape(rotation),
        PieceKind::Z => z_shape(rotation),
        PieceKind::J => j_shape(rotation),
        PieceKind::L => l_shape(rotation),
    }
}

fn i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece is rotationally symmetric
fn o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Spawn anchor for a new piece: horizontally centered over the 4-wide shape
/// box. The anchor y starts at 0; pieces may later occupy y < 0 via kicks.
pub fn spawn_position(board_width: i32) -> (i32, i32) {
    ((board_width - 4) / 2, 0)
}

/// Active falling piece: kind, rotation state, and anchor position. The
/// anchor y may be negative while the piece is above the visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a new piece at the spawn anchor for the given board width.
    pub fn spawn(kind: PieceKind, board_width: i32) -> Self {
        let (x, y) = spawn_position(board_width);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Shape offsets for the current rotation state.
    pub fn shape(&self) -> PieceShape {
        shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four filled cells.
    pub fn cells(&self) -> [(i32, i32); 4] {
        let shape = self.shape();
        [
            (self.x + shape[0].0, self.y + shape[0].1),
            (self.x + shape[1].0, self.y + shape[1].1),
            (self.x + shape[2].0, self.y + shape[2].1),
            (self.x + shape[3].0, self.y + shape[3].1),
        ]
    }

    /// The piece after a naive 90-degree rotation at the same anchor.
    /// No kick resolution happens here.
    pub fn rotated(&self, clockwise: bool) -> Piece {
        let rotation = if clockwise {
            self.rotation.cw()
        } else {
            self.rotation.ccw()
        };
        Piece { rotation, ..*self }
    }

    /// The piece translated by (dx, dy).
    pub fn offset(&self, dx: i32, dy: i32) -> Piece {
        Piece {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}
