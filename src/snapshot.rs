//! Immutable state snapshots handed to observers
//!
//! Snapshots are full copies: listeners and external collaborators never
//! hold a reference into live session state.

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, Rotation};

/// Copy of the active piece within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl From<Piece> for PieceSnapshot {
    fn from(piece: Piece) -> Self {
        Self {
            kind: piece.kind,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
        }
    }
}

/// Immutable copy of the aggregate game state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    /// Locked cells only, row 0 first. The active piece and its ghost are
    /// overlaid by `render_grid`.
    pub board: Vec<Vec<Cell>>,
    pub current: Option<PieceSnapshot>,
    /// Resting anchor y if the piece were hard-dropped now.
    pub ghost_y: Option<i32>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_game_over: bool,
    pub elapsed_ms: u64,
    pub pieces_dropped: u32,
}

impl GameSnapshot {
    /// The board with the ghost piece (as `Shadow`) and active piece
    /// overlaid - what a renderer draws. Cells above row 0 are clipped.
    pub fn render_grid(&self) -> Vec<Vec<Cell>> {
        let mut grid = self.board.clone();
        let height = grid.len() as i32;
        let width = grid.first().map(|row| row.len()).unwrap_or(0) as i32;

        let Some(current) = self.current else {
            return grid;
        };
        let piece = Piece {
            kind: current.kind,
            rotation: current.rotation,
            x: current.x,
            y: current.y,
        };

        if let Some(ghost_y) = self.ghost_y {
            if ghost_y != current.y {
                let ghost = Piece { y: ghost_y, ..piece };
                for (x, y) in ghost.cells() {
                    if x >= 0 && x < width && y >= 0 && y < height {
                        grid[y as usize][x as usize] = Cell::Shadow;
                    }
                }
            }
        }

        for (x, y) in piece.cells() {
            if x >= 0 && x < width && y >= 0 && y < height {
                grid[y as usize][x as usize] = Cell::Filled(current.kind);
            }
        }

        grid
    }

    /// Encoded grid (0 empty, 1..=7 colors, 8 shadow), ghost and piece
    /// included.
    pub fn render_grid_u8(&self) -> Vec<Vec<u8>> {
        self.render_grid()
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_u8()).collect())
            .collect()
    }
}

/// End-of-game result shape consumed by external collaborators
/// (persistence, ranking, UI). Produced at game over; consumption is out of
/// the engine's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSummary {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub duration_seconds: u64,
    pub pieces_dropped: u32,
}
