//! Scoring - pure score and level computation
//!
//! Every function here is deterministic and side-effect-free: identical
//! inputs always produce identical outputs. The session applies the results;
//! nothing in this module touches live state.
//!
//! Levels are 1-based: `level = total_lines / 10 + 1`.

/// Scoring table. Defaults follow the classic values; sessions may override
/// any of them via `GameConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTable {
    /// Base points by simultaneous lines cleared; index 0 unused.
    pub line_base: [u32; 5],
    /// T-spin base points by lines cleared (0..=3).
    pub t_spin_base: [u32; 4],
    /// Per-combo step and cap, both multiplied by level.
    pub combo_step: u32,
    pub combo_cap: u32,
    pub soft_drop_per_cell: u32,
    pub hard_drop_per_cell: u32,
    pub perfect_clear_base: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            line_base: [0, 40, 100, 300, 1200],
            t_spin_base: [400, 800, 1200, 1600],
            combo_step: 50,
            combo_cap: 1000,
            soft_drop_per_cell: 1,
            hard_drop_per_cell: 2,
            perfect_clear_base: 2000,
        }
    }
}

/// Points for a line clear at the given level:
/// base + floor(base * level * 0.1) + speed bonus.
/// The speed bonus `lines * 10 * floor((level - 4) / 2)` applies from
/// level 5 upward.
pub fn line_score(table: &ScoreTable, lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    let base = table.line_base[lines];
    let level_bonus = base * level / 10;
    let speed_bonus = if level >= 5 {
        lines as u32 * 10 * ((level - 4) / 2)
    } else {
        0
    };
    base + level_bonus + speed_bonus
}

/// Level derived from cumulative lines: one level per 10 lines, starting at 1.
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / 10 + 1
}

/// Result of folding a line clear into score/line/level totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineScoreUpdate {
    pub score_delta: u32,
    pub total_lines: u32,
    pub level: u32,
    /// The level increased; the drop timer must be rescheduled.
    pub leveled_up: bool,
}

/// Compute the new totals after clearing `lines` rows. The score delta uses
/// the pre-clear level; the level is recomputed from the new line total.
pub fn apply_line_score(
    table: &ScoreTable,
    lines: usize,
    total_lines: u32,
    level: u32,
) -> LineScoreUpdate {
    let score_delta = line_score(table, lines, level);
    let total_lines = total_lines + lines as u32;
    let new_level = level_for_lines(total_lines);
    LineScoreUpdate {
        score_delta,
        total_lines,
        level: new_level,
        leveled_up: new_level > level,
    }
}

/// +1 point per cell descended by an explicit down-move.
pub fn soft_drop_score(table: &ScoreTable, cells: u32) -> u32 {
    cells * table.soft_drop_per_cell
}

/// +2 points per cell of hard-drop distance.
pub fn hard_drop_score(table: &ScoreTable, cells: u32) -> u32 {
    cells * table.hard_drop_per_cell
}

/// Combo bonus: min(combo * 50 * level, 1000 * level).
pub fn combo_bonus(table: &ScoreTable, combo: u32, level: u32) -> u32 {
    (combo * table.combo_step * level).min(table.combo_cap * level)
}

/// T-spin bonus by lines cleared, scaled by level.
pub fn t_spin_bonus(table: &ScoreTable, lines: usize, level: u32) -> u32 {
    table.t_spin_base[lines.min(3)] * level
}

/// Perfect-clear bonus: 2000 * level.
pub fn perfect_clear_bonus(table: &ScoreTable, level: u32) -> u32 {
    table.perfect_clear_base * level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ScoreTable {
        ScoreTable::default()
    }

    #[test]
    fn test_line_score_base_table() {
        // Level 1: base + 10% level bonus.
        assert_eq!(line_score(&table(), 1, 1), 44);
        assert_eq!(line_score(&table(), 2, 1), 110);
        assert_eq!(line_score(&table(), 3, 1), 330);
        assert_eq!(line_score(&table(), 4, 1), 1320);
    }

    #[test]
    fn test_line_score_level_bonus() {
        // 40 base + floor(40 * 10 * 0.1) = 80; level 10 has a speed bonus of
        // 1 * 10 * floor(6 / 2) = 30 on top.
        let t = table();
        let base_plus_level = 40 + 40 * 10 / 10;
        assert_eq!(base_plus_level, 80);
        assert_eq!(line_score(&t, 1, 10), 80 + 30);
    }

    #[test]
    fn test_speed_bonus_threshold() {
        let t = table();
        // Below level 5: no speed bonus.
        assert_eq!(line_score(&t, 1, 4), 40 + 16);
        // Level 5: floor((5 - 4) / 2) = 0, still nothing.
        assert_eq!(line_score(&t, 1, 5), 40 + 20);
        // Level 6: floor(2 / 2) = 1 -> lines * 10.
        assert_eq!(line_score(&t, 1, 6), 40 + 24 + 10);
        assert_eq!(line_score(&t, 4, 6), 1200 + 720 + 40);
    }

    #[test]
    fn test_line_score_out_of_range() {
        assert_eq!(line_score(&table(), 0, 3), 0);
        assert_eq!(line_score(&table(), 5, 3), 0);
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
        assert_eq!(level_for_lines(100), 11);
    }

    #[test]
    fn test_apply_line_score_levels_up() {
        let t = table();
        let update = apply_line_score(&t, 2, 9, 1);
        assert_eq!(update.total_lines, 11);
        assert_eq!(update.level, 2);
        assert!(update.leveled_up);
        // Delta was computed at the pre-clear level.
        assert_eq!(update.score_delta, line_score(&t, 2, 1));

        let update = apply_line_score(&t, 1, 3, 1);
        assert_eq!(update.level, 1);
        assert!(!update.leveled_up);
    }

    #[test]
    fn test_drop_scores() {
        let t = table();
        assert_eq!(soft_drop_score(&t, 10), 10);
        assert_eq!(hard_drop_score(&t, 10), 20);
        assert_eq!(soft_drop_score(&t, 0), 0);
    }

    #[test]
    fn test_combo_bonus_and_cap() {
        let t = table();
        assert_eq!(combo_bonus(&t, 1, 1), 50);
        assert_eq!(combo_bonus(&t, 3, 2), 300);
        // 50 * 25 = 1250 would exceed the cap of 1000 per level.
        assert_eq!(combo_bonus(&t, 25, 1), 1000);
        assert_eq!(combo_bonus(&t, 25, 3), 3000);
    }

    #[test]
    fn test_t_spin_bonus_table() {
        let t = table();
        assert_eq!(t_spin_bonus(&t, 0, 1), 400);
        assert_eq!(t_spin_bonus(&t, 1, 1), 800);
        assert_eq!(t_spin_bonus(&t, 2, 2), 2400);
        assert_eq!(t_spin_bonus(&t, 3, 1), 1600);
    }

    #[test]
    fn test_perfect_clear_bonus() {
        let t = table();
        assert_eq!(perfect_clear_bonus(&t, 1), 2000);
        assert_eq!(perfect_clear_bonus(&t, 5), 10000);
    }

    #[test]
    fn test_determinism() {
        let t = table();
        for level in 1..20 {
            for lines in 1..=4 {
                assert_eq!(line_score(&t, lines, level), line_score(&t, lines, level));
            }
        }
    }

    #[test]
    fn test_table_overrides() {
        let mut t = table();
        t.line_base = [0, 100, 300, 500, 800];
        t.hard_drop_per_cell = 0;
        assert_eq!(line_score(&t, 1, 1), 110);
        assert_eq!(hard_drop_score(&t, 20), 0);
    }
}
