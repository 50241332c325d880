//! Line-clear engine - full-row detection, combo tracking, classification
//!
//! All full rows are determined before any row is removed, so indices never
//! drift mid-clear. The engine owns the combo streak for its session and a
//! pluggable T-spin hook; the baseline hook always resolves false - full
//! corner-fill geometry is an extension point, not something to invent here.

use crate::board::Board;
use crate::types::ClearKind;

/// Pluggable T-spin detector. Input: was the last successful action before
/// the lock a rotation. The baseline engine registers no hook, which always
/// resolves to false.
pub type TSpinHook = Box<dyn Fn(bool) -> bool>;

/// Result of one lock's clear pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    /// Cleared row indices, top to bottom (pre-clear coordinates).
    pub rows: Vec<i32>,
    /// Classification by count; `None` for a zero-clear lock and for
    /// prepared-board clears beyond four rows.
    pub kind: Option<ClearKind>,
    /// Board left entirely empty after the clear.
    pub perfect_clear: bool,
    /// T-spin per the registered hook (false without one).
    pub t_spin: bool,
    /// Combo streak after this lock (0 when the lock cleared nothing).
    pub combo: u32,
}

impl ClearOutcome {
    pub fn lines_cleared(&self) -> usize {
        self.rows.len()
    }
}

/// Detects and clears full rows, tracking the combo streak across locks.
pub struct LineClearEngine {
    combo: u32,
    t_spin_hook: Option<TSpinHook>,
}

impl Default for LineClearEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClearEngine {
    pub fn new() -> Self {
        Self {
            combo: 0,
            t_spin_hook: None,
        }
    }

    /// Install a T-spin detector. Without one, every lock resolves t_spin to
    /// false.
    pub fn with_t_spin_hook(hook: TSpinHook) -> Self {
        Self {
            combo: 0,
            t_spin_hook: Some(hook),
        }
    }

    /// Current consecutive-clear streak.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Reset streak state (session restart).
    pub fn reset(&mut self) {
        self.combo = 0;
    }

    /// Scan for full rows and clear them in one atomic pass.
    ///
    /// A lock that clears nothing resets the combo streak to 0; a clearing
    /// lock increments it. Perfect clear is detected after the rows are
    /// removed.
    pub fn check_and_clear(
        &mut self,
        board: &mut Board,
        last_action_was_rotation: bool,
    ) -> ClearOutcome {
        let rows = board.full_rows();

        if rows.is_empty() {
            self.combo = 0;
            return ClearOutcome::default();
        }

        // Clearing top to bottom keeps the not-yet-cleared indices below
        // valid: removing a row only shifts rows above it.
        for &y in rows.iter() {
            board.clear_row(y);
        }
        self.combo += 1;

        let t_spin = self
            .t_spin_hook
            .as_ref()
            .map(|hook| hook(last_action_was_rotation))
            .unwrap_or(false);

        ClearOutcome {
            kind: ClearKind::from_count(rows.len()),
            perfect_clear: board.is_empty(),
            t_spin,
            combo: self.combo,
            rows,
        }
    }
}
