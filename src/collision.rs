//! Collision resolver - validity checks for moves, rotations, and drops
//!
//! Stateless over `(&Board, &Piece)`: callers pass values in and get derived
//! results back. A failed move is an ordinary negative result with its causes
//! flagged, never an error. Wall kicks use a fixed, priority-ordered offset
//! list rather than a per-piece kick table.

use crate::board::Board;
use crate::pieces::Piece;

/// Kick offsets tried in order when a naive rotation collides:
/// no-kick, left, right, up, up-left, up-right.
pub const KICK_OFFSETS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

/// Outcome of a move check. Causes are non-exclusive: a single bad move can
/// hit a wall and an existing block at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveCheck {
    pub can_move: bool,
    pub hit_wall: bool,
    pub hit_floor: bool,
    pub hit_piece: bool,
}

/// Validity checks for piece movement and rotation against a board.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    kicks_enabled: bool,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CollisionResolver {
    pub fn new(kicks_enabled: bool) -> Self {
        Self { kicks_enabled }
    }

    pub fn kicks_enabled(&self) -> bool {
        self.kicks_enabled
    }

    /// Whether every cell of `piece` is at an open position.
    pub fn fits(&self, board: &Board, piece: &Piece) -> bool {
        piece.cells().iter().all(|&(x, y)| board.cell_open(x, y))
    }

    /// Test a translation of the piece by (dx, dy), flagging every violation
    /// the target position would cause.
    pub fn check_move(&self, board: &Board, piece: &Piece, dx: i32, dy: i32) -> MoveCheck {
        let mut check = MoveCheck {
            can_move: true,
            ..MoveCheck::default()
        };

        for &(cx, cy) in piece.cells().iter() {
            let x = cx + dx;
            let y = cy + dy;
            if x < 0 || x >= board.width() {
                check.hit_wall = true;
            }
            if y >= board.height() {
                check.hit_floor = true;
            }
            if y >= 0 && y < board.height() && x >= 0 && x < board.width() {
                if let Some(cell) = board.get(x, y) {
                    if cell.is_filled() {
                        check.hit_piece = true;
                    }
                }
            }
        }

        check.can_move = !(check.hit_wall || check.hit_floor || check.hit_piece);
        check
    }

    /// Test the naive rotated shape at the current anchor, without kicks.
    pub fn check_rotation(&self, board: &Board, piece: &Piece, clockwise: bool) -> bool {
        self.fits(board, &piece.rotated(clockwise))
    }

    /// Search the fixed kick list for an offset at which the rotated shape is
    /// valid. Returns the first working offset, or `None` if every candidate
    /// collides. The list starts with (0, 0), so this also covers the
    /// no-kick case.
    pub fn try_wall_kick(
        &self,
        board: &Board,
        piece: &Piece,
        clockwise: bool,
    ) -> Option<(i32, i32)> {
        let rotated = piece.rotated(clockwise);
        KICK_OFFSETS
            .iter()
            .copied()
            .find(|&(dx, dy)| self.fits(board, &rotated.offset(dx, dy)))
    }

    /// Resolve a rotation into the resulting piece: the naive rotation when
    /// it fits, otherwise the first valid kick candidate (when kicks are
    /// enabled). `None` means the rotation fails outright.
    pub fn resolve_rotation(&self, board: &Board, piece: &Piece, clockwise: bool) -> Option<Piece> {
        let rotated = piece.rotated(clockwise);
        if self.fits(board, &rotated) {
            return Some(rotated);
        }
        if !self.kicks_enabled {
            return None;
        }
        self.try_wall_kick(board, piece, clockwise)
            .map(|(dx, dy)| rotated.offset(dx, dy))
    }

    /// Maximal y at which the piece remains valid: the ghost position and
    /// the hard-drop target.
    pub fn drop_position(&self, board: &Board, piece: &Piece) -> i32 {
        let mut distance = 0;
        while self.fits(board, &piece.offset(0, distance + 1)) {
            distance += 1;
        }
        piece.y + distance
    }

    /// Game over: the piece is invalid at its own spawn anchor - it cannot
    /// even appear.
    pub fn is_game_over(&self, board: &Board, piece: &Piece) -> bool {
        !self.fits(board, piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, PieceKind, Rotation};

    fn resolver() -> CollisionResolver {
        CollisionResolver::new(true)
    }

    #[test]
    fn test_check_move_open_board() {
        let board = Board::new(10, 20);
        let piece = Piece::spawn(PieceKind::T, 10);

        let check = resolver().check_move(&board, &piece, 0, 1);
        assert!(check.can_move);
        assert!(!check.hit_wall && !check.hit_floor && !check.hit_piece);
    }

    #[test]
    fn test_move_into_left_wall_flags_wall() {
        let board = Board::new(10, 20);
        // T North occupies x offsets 0..=2; anchor x = 0 is flush left.
        let piece = Piece {
            kind: PieceKind::T,
            rotation: Rotation::North,
            x: 0,
            y: 5,
        };

        let check = resolver().check_move(&board, &piece, -1, 0);
        assert!(!check.can_move);
        assert!(check.hit_wall);
        assert!(!check.hit_floor);
        assert!(!check.hit_piece);
    }

    #[test]
    fn test_move_into_floor_flags_floor() {
        let board = Board::new(10, 20);
        // T North's lowest cells sit at dy = 1; anchor y = 18 rests on the floor.
        let piece = Piece {
            kind: PieceKind::T,
            rotation: Rotation::North,
            x: 3,
            y: 18,
        };

        let check = resolver().check_move(&board, &piece, 0, 1);
        assert!(!check.can_move);
        assert!(check.hit_floor);
        assert!(!check.hit_wall);
    }

    #[test]
    fn test_move_into_block_flags_piece() {
        let mut board = Board::new(10, 20);
        let piece = Piece {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 3,
            y: 10,
        };
        // O occupies (4..=5, 10..=11); block the cell below.
        board.set(4, 12, Cell::Filled(PieceKind::I));

        let check = resolver().check_move(&board, &piece, 0, 1);
        assert!(!check.can_move);
        assert!(check.hit_piece);
        assert!(!check.hit_wall && !check.hit_floor);
    }

    #[test]
    fn test_multiple_causes_flagged_together() {
        let mut board = Board::new(10, 20);
        // I North at the left edge, with a filled cell in the target row.
        let piece = Piece {
            kind: PieceKind::I,
            rotation: Rotation::North,
            x: 0,
            y: 5,
        };
        board.set(2, 6, Cell::Filled(PieceKind::J));

        let check = resolver().check_move(&board, &piece, -1, 1);
        assert!(!check.can_move);
        assert!(check.hit_wall);
        assert!(check.hit_piece);
    }

    #[test]
    fn test_naive_rotation_check() {
        let board = Board::new(10, 20);
        let piece = Piece::spawn(PieceKind::T, 10);
        assert!(resolver().check_rotation(&board, &piece, true));
    }

    #[test]
    fn test_wall_kick_right_off_left_wall() {
        let board = Board::new(10, 20);
        // T East flush against the left wall: cells at x = 0 (column) and one
        // at x = 1. Rotating to South needs x = -1, so the naive rotation
        // fails and the right kick (+1, 0) must resolve it.
        let piece = Piece {
            kind: PieceKind::T,
            rotation: Rotation::East,
            x: -1,
            y: 5,
        };
        let r = resolver();
        assert!(r.fits(&board, &piece));
        assert!(!r.check_rotation(&board, &piece, true));

        let kick = r.try_wall_kick(&board, &piece, true);
        assert_eq!(kick, Some((1, 0)));

        let resolved = r.resolve_rotation(&board, &piece, true).unwrap();
        assert_eq!(resolved.rotation, Rotation::South);
        assert_eq!(resolved.x, 0);
    }

    #[test]
    fn test_kick_fails_when_fully_enclosed() {
        let mut board = Board::new(10, 20);
        let piece = Piece {
            kind: PieceKind::T,
            rotation: Rotation::North,
            x: 3,
            y: 17,
        };
        // Fill everything except the piece's own four cells; every kick
        // candidate then needs at least one occupied cell.
        let own: Vec<(i32, i32)> = piece.cells().to_vec();
        for y in 0..20 {
            for x in 0..10 {
                if !own.contains(&(x, y)) {
                    board.set(x, y, Cell::Filled(PieceKind::I));
                }
            }
        }

        let r = resolver();
        assert!(r.fits(&board, &piece));
        assert_eq!(r.try_wall_kick(&board, &piece, true), None);
        assert!(r.resolve_rotation(&board, &piece, true).is_none());
    }

    #[test]
    fn test_kicks_disabled_skips_search() {
        let board = Board::new(10, 20);
        let piece = Piece {
            kind: PieceKind::T,
            rotation: Rotation::East,
            x: -1,
            y: 5,
        };
        let r = CollisionResolver::new(false);
        // Same setup as the kick test, but with kicks off the rotation fails.
        assert!(r.resolve_rotation(&board, &piece, true).is_none());
    }

    #[test]
    fn test_drop_position_empty_board() {
        let board = Board::new(10, 20);
        let piece = Piece::spawn(PieceKind::I, 10);
        // I North's filled row is dy = 1; it rests when y + 1 == 19.
        assert_eq!(resolver().drop_position(&board, &piece), 18);
    }

    #[test]
    fn test_drop_position_onto_stack() {
        let mut board = Board::new(10, 20);
        for x in 0..10 {
            board.set(x, 19, Cell::Filled(PieceKind::L));
        }
        let piece = Piece::spawn(PieceKind::I, 10);
        assert_eq!(resolver().drop_position(&board, &piece), 17);
    }

    #[test]
    fn test_game_over_at_blocked_spawn() {
        let mut board = Board::new(10, 20);
        let piece = Piece::spawn(PieceKind::T, 10);
        for &(x, y) in piece.cells().iter() {
            board.set(x, y, Cell::Filled(PieceKind::Z));
        }
        let r = resolver();
        assert!(r.is_game_over(&board, &piece));

        let empty = Board::new(10, 20);
        assert!(!r.is_game_over(&empty, &piece));
    }
}
