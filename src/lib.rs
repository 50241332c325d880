//! Deterministic falling-block game engine - pure, embeddable, and testable
//!
//! This crate contains the complete rules of a falling-block game with **zero
//! dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences (replays, AI)
//! - **Testable**: Every rule is exercised by unit tests against plain state
//! - **Portable**: Runs in any environment (terminal, GUI, headless, server)
//! - **Host-driven**: No threads or timers inside; the host owns the clock
//!
//! # Module Structure
//!
//! - [`board`]: Rectangular cell grid with row scanning and shift-down clearing
//! - [`pieces`]: The seven tetromino shapes and their rotation tables
//! - [`rng`]: Seedable 7-bag randomizer for fair piece distribution
//! - [`collision`]: Placement validity, move diagnostics, and wall kicks
//! - [`clear`]: Atomic multi-row clearing with combo tracking
//! - [`scoring`]: Pure score arithmetic driven by a configurable table
//! - [`snapshot`]: Immutable render-ready views of the game state
//! - [`session`]: The state machine tying everything together
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: All seven piece kinds appear before any repeats
//! - **Wall Kicks**: A blocked rotation retries from a fixed offset list
//! - **Atomic Clears**: Simultaneous full rows clear together and classify as
//!   Single through Tetris
//! - **Combos and Bonuses**: Consecutive clearing locks, perfect clears, and
//!   drop distance all feed a level-scaled score
//! - **Cooperative Timing**: Gravity runs through host-scheduled ticks guarded
//!   by cancellation tokens
//!
//! # Example
//!
//! ```
//! use blockfall::{GameAction, GameConfig, GameSession};
//!
//! let mut game = GameSession::with_seed(GameConfig::default(), 12345).unwrap();
//! game.start();
//!
//! game.dispatch(GameAction::MoveRight);
//! game.dispatch(GameAction::HardDrop);
//!
//! let snapshot = game.snapshot();
//! assert!(snapshot.is_playing);
//! assert_eq!(snapshot.pieces_dropped, 1);
//! assert!(snapshot.score > 0); // hard drop awards distance points
//! ```

pub mod board;
pub mod clear;
pub mod collision;
pub mod config;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod types;

pub use board::Board;
pub use clear::{ClearOutcome, LineClearEngine, TSpinHook};
pub use collision::{CollisionResolver, MoveCheck, KICK_OFFSETS};
pub use config::GameConfig;
pub use pieces::Piece;
pub use rng::{SevenBag, SimpleRng};
pub use scoring::ScoreTable;
pub use session::{GameSession, TickToken};
pub use snapshot::{GameSnapshot, GameSummary, PieceSnapshot};
pub use types::{Cell, ClearKind, GameAction, PieceKind, Rotation};
