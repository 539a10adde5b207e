use std::time::Duration;

use serde::Serialize;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
///
/// The value is multiplied by the level at the time of the clear. Larger
/// clears, only possible on a pre-filled board, score nothing.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level.
const LINES_PER_LEVEL: usize = 10;

const BASE_DROP_INTERVAL: Duration = Duration::from_millis(800);
const DROP_INTERVAL_STEP: Duration = Duration::from_millis(70);
const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// Gravity interval at `level`: 800ms, 70ms faster per level, never below 100ms.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::drop_interval;
///
/// assert_eq!(drop_interval(1), Duration::from_millis(800));
/// assert_eq!(drop_interval(3), Duration::from_millis(660));
/// assert_eq!(drop_interval(50), Duration::from_millis(100));
/// ```
#[must_use]
pub fn drop_interval(level: usize) -> Duration {
    let steps = u32::try_from(level.saturating_sub(1)).unwrap_or(u32::MAX);
    BASE_DROP_INTERVAL
        .saturating_sub(DROP_INTERVAL_STEP.saturating_mul(steps))
        .max(MIN_DROP_INTERVAL)
}

/// Game statistics tracking score, lines cleared, level and piece count.
///
/// # Scoring
///
/// - Line clears: `SCORE_TABLE[lines] * level`, using the level before the
///   clear is counted
/// - Soft drop: 1 point per row
/// - Hard drop: 2 points per row
///
/// There are no combo, back-to-back or T-spin bonuses.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4); // four lines at level 1
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.lines_cleared(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    lines_cleared: usize,
    level: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Fresh statistics: score 0, no lines, level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            level: 1,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level, `lines_cleared / 10 + 1`.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    /// Total number of pieces that have been locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Histogram of locks by lines cleared: `[0]` counts locks that cleared
    /// nothing, `[4]` counts four-line clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Gravity interval for the current level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        drop_interval(self.level)
    }

    /// Adds points earned by soft or hard dropping.
    pub const fn add_drop_points(&mut self, points: usize) {
        self.score += points;
    }

    /// Records a locked piece that cleared `cleared_lines` rows.
    ///
    /// Returns the points awarded for the clear and whether the level went up.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> (usize, bool) {
        let points = SCORE_TABLE
            .get(cleared_lines)
            .copied()
            .unwrap_or(0)
            * self.level;
        self.score += points;
        self.completed_pieces += 1;
        self.lines_cleared += cleared_lines;
        if let Some(counter) = self.line_cleared_counter.get_mut(cleared_lines) {
            *counter += 1;
        }

        let previous_level = self.level;
        self.level = self.lines_cleared / LINES_PER_LEVEL + 1;
        (points, self.level > previous_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table_scales_with_level() {
        for (lines, base) in [(1, 100), (2, 300), (3, 500), (4, 800)] {
            for level in 1..=5 {
                let mut stats = GameStats::new();
                stats.level = level;
                let (points, _) = stats.complete_piece_drop(lines);
                assert_eq!(points, base * level);
                assert_eq!(stats.score(), base * level);
            }
        }
    }

    #[test]
    fn test_level_three_double_scores_nine_hundred() {
        let mut stats = GameStats::new();
        stats.lines_cleared = 20;
        stats.level = 3;
        let (points, _) = stats.complete_piece_drop(2);
        assert_eq!(points, 900);
    }

    #[test]
    fn test_level_from_lines() {
        let mut stats = GameStats::new();
        for _ in 0..5 {
            stats.complete_piece_drop(4);
        }
        stats.complete_piece_drop(3);
        assert_eq!(stats.lines_cleared(), 23);
        assert_eq!(stats.level(), 3);
        assert_eq!(stats.drop_interval(), Duration::from_millis(660));
    }

    #[test]
    fn test_level_up_is_reported_once() {
        let mut stats = GameStats::new();
        assert!(!stats.complete_piece_drop(4).1);
        assert!(!stats.complete_piece_drop(4).1);
        assert!(stats.complete_piece_drop(2).1);
        assert!(!stats.complete_piece_drop(1).1);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_empty_lock_counts_piece_only() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(0), (0, false));
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_clear_beyond_table_scores_nothing() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(6), (0, false));
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.lines_cleared(), 6);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_drop_points_accumulate() {
        let mut stats = GameStats::new();
        stats.add_drop_points(1);
        stats.add_drop_points(36);
        assert_eq!(stats.score(), 37);
    }

    #[test]
    fn test_drop_interval_curve() {
        assert_eq!(drop_interval(0), Duration::from_millis(800));
        assert_eq!(drop_interval(2), Duration::from_millis(730));
        assert_eq!(drop_interval(11), Duration::from_millis(100));
        assert_eq!(drop_interval(12), Duration::from_millis(100));
        assert_eq!(drop_interval(usize::MAX), Duration::from_millis(100));
    }
}
