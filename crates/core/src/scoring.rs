//! Scoring module - line-clear points, levels and gravity speed
//!
//! Everything here is a pure function of the lines-cleared history:
//! - points for `n` simultaneous lines = `LINE_SCORES[n - 1] * level`
//! - `level = lines / 10 + 1`
//! - tick interval = `max(100, 1000 - (level - 1) * 100)` ms

use crate::types::{
    BASE_TICK_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_TICK_MS, STARTING_LEVEL, TICK_STEP_MS,
};

/// Points for clearing `lines` rows at once at `level`.
///
/// Counts beyond the table are scored as the largest entry.
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let idx = (lines as usize).min(LINE_SCORES.len()) - 1;
    LINE_SCORES[idx].saturating_mul(level)
}

/// Level for a total number of cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + STARTING_LEVEL
}

/// Gravity interval for a level (in milliseconds)
pub fn tick_interval_ms(level: u32) -> u32 {
    let reduction = level
        .saturating_sub(STARTING_LEVEL)
        .saturating_mul(TICK_STEP_MS);
    BASE_TICK_MS.saturating_sub(reduction).max(MIN_TICK_MS)
}

/// Outcome of recording one lock's line clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub lines_cleared: u32,
    pub points: u32,
    pub level: u32,
    pub level_changed: bool,
}

/// Running score, line and level counters for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    score: u32,
    lines: u32,
    level: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: STARTING_LEVEL,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tick_interval_ms(&self) -> u32 {
        tick_interval_ms(self.level)
    }

    /// Record `cleared` lines from a single lock.
    ///
    /// Points use the level in effect before the clear.
    pub fn apply_clear(&mut self, cleared: u32) -> ScoreResult {
        if cleared == 0 {
            return ScoreResult {
                level: self.level,
                ..ScoreResult::default()
            };
        }

        let points = line_clear_points(cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared);

        let previous = self.level;
        self.level = level_for_lines(self.lines);

        ScoreResult {
            lines_cleared: cleared,
            points,
            level: self.level,
            level_changed: self.level != previous,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_level_one() {
        assert_eq!(line_clear_points(0, 1), 0);
        assert_eq!(line_clear_points(1, 1), 40);
        assert_eq!(line_clear_points(2, 1), 100);
        assert_eq!(line_clear_points(3, 1), 300);
        assert_eq!(line_clear_points(4, 1), 1200);
    }

    #[test]
    fn test_line_scores_scale_with_level() {
        assert_eq!(line_clear_points(1, 2), 80);
        assert_eq!(line_clear_points(4, 2), 2400);
        assert_eq!(line_clear_points(3, 5), 1500);
    }

    #[test]
    fn test_out_of_table_clear_is_guarded() {
        assert_eq!(line_clear_points(5, 1), 1200);
        assert_eq!(line_clear_points(20, 3), 3600);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(29), 3);
    }

    #[test]
    fn test_tick_intervals() {
        assert_eq!(tick_interval_ms(1), 1000);
        assert_eq!(tick_interval_ms(2), 900);
        assert_eq!(tick_interval_ms(3), 800);
        assert_eq!(tick_interval_ms(10), 100);
        assert_eq!(tick_interval_ms(25), 100);
        assert_eq!(tick_interval_ms(0), 1000);
    }

    #[test]
    fn test_apply_clear_uses_level_before_clear() {
        let mut state = ScoreState::new();
        for _ in 0..9 {
            state.apply_clear(1);
        }
        assert_eq!(state.level(), 1);
        assert_eq!(state.score(), 9 * 40);

        // Tenth line levels up, but is still scored at level 1.
        let result = state.apply_clear(1);
        assert_eq!(result.points, 40);
        assert!(result.level_changed);
        assert_eq!(state.level(), 2);
        assert_eq!(state.tick_interval_ms(), 900);

        let result = state.apply_clear(1);
        assert_eq!(result.points, 80);
        assert!(!result.level_changed);
    }

    #[test]
    fn test_apply_zero_lines_is_noop() {
        let mut state = ScoreState::new();
        let result = state.apply_clear(0);
        assert_eq!(result.points, 0);
        assert_eq!(result.level, 1);
        assert_eq!(state, ScoreState::new());
    }
}
