// Practice statistics - timing grades and the running stats reducer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timing verdict for one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Perfect,
    Good,
    Early,
    Late,
    Miss,
}

impl Grade {
    /// Grade a timing offset (negative = early)
    pub fn from_delta_ms(delta_ms: f64, thresholds: &GradeThresholds) -> Self {
        let distance = delta_ms.abs();
        if distance <= thresholds.perfect_ms {
            Grade::Perfect
        } else if distance <= thresholds.good_ms {
            Grade::Good
        } else if distance <= thresholds.early_late_ms {
            if delta_ms < 0.0 { Grade::Early } else { Grade::Late }
        } else {
            Grade::Miss
        }
    }

    /// Perfect and good hits keep the streak alive
    pub fn is_on_time(&self) -> bool {
        matches!(self, Grade::Perfect | Grade::Good)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Perfect => "perfect",
            Grade::Good => "good",
            Grade::Early => "early",
            Grade::Late => "late",
            Grade::Miss => "miss",
        };
        f.write_str(label)
    }
}

/// Upper bounds of |delta| in milliseconds for each grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeThresholds {
    pub perfect_ms: f64,
    pub good_ms: f64,
    /// Beyond this a matched hit is a miss
    pub early_late_ms: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            perfect_ms: 25.0,
            good_ms: 50.0,
            early_late_ms: 100.0,
        }
    }
}

/// Running counters of a practice session
///
/// Values are never mutated in place: [`apply`](PracticeStats::apply)
/// returns the next snapshot, so a session can be replayed from its grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStats {
    pub total_hits: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub early_count: u32,
    pub late_count: u32,
    pub miss_count: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Share of perfect and good hits, rounded to a whole percent
    pub accuracy_percent: u32,
}

impl PracticeStats {
    /// Fresh zero-valued stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one grade into the stats
    #[must_use]
    pub fn apply(self, grade: Grade) -> Self {
        let mut next = Self {
            total_hits: self.total_hits + 1,
            ..self
        };

        match grade {
            Grade::Perfect => next.perfect_count += 1,
            Grade::Good => next.good_count += 1,
            Grade::Early => next.early_count += 1,
            Grade::Late => next.late_count += 1,
            Grade::Miss => next.miss_count += 1,
        }

        next.current_streak = if grade.is_on_time() {
            next.current_streak + 1
        } else {
            0
        };
        next.best_streak = next.best_streak.max(next.current_streak);
        next.accuracy_percent = next.accuracy();
        next
    }

    /// Replay a sequence of grades from zero
    pub fn from_grades(grades: impl IntoIterator<Item = Grade>) -> Self {
        grades.into_iter().fold(Self::new(), Self::apply)
    }

    fn accuracy(&self) -> u32 {
        if self.total_hits == 0 {
            return 0;
        }
        let on_time = (self.perfect_count + self.good_count) as f64;
        (100.0 * on_time / self.total_hits as f64).round() as u32
    }

    /// Count for one grade
    pub fn count(&self, grade: Grade) -> u32 {
        match grade {
            Grade::Perfect => self.perfect_count,
            Grade::Good => self.good_count,
            Grade::Early => self.early_count,
            Grade::Late => self.late_count,
            Grade::Miss => self.miss_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_table() {
        let thresholds = GradeThresholds::default();
        assert_eq!(Grade::from_delta_ms(0.0, &thresholds), Grade::Perfect);
        assert_eq!(Grade::from_delta_ms(25.0, &thresholds), Grade::Perfect);
        assert_eq!(Grade::from_delta_ms(30.0, &thresholds), Grade::Good);
        assert_eq!(Grade::from_delta_ms(-50.0, &thresholds), Grade::Good);
        assert_eq!(Grade::from_delta_ms(60.0, &thresholds), Grade::Late);
        assert_eq!(Grade::from_delta_ms(-60.0, &thresholds), Grade::Early);
        assert_eq!(Grade::from_delta_ms(100.0, &thresholds), Grade::Late);
        assert_eq!(Grade::from_delta_ms(150.0, &thresholds), Grade::Miss);
        assert_eq!(Grade::from_delta_ms(-150.0, &thresholds), Grade::Miss);
    }

    #[test]
    fn test_stats_sequence() {
        use Grade::*;
        let stats = PracticeStats::from_grades([Perfect, Perfect, Late, Perfect]);

        assert_eq!(stats.total_hits, 4);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.accuracy_percent, 75);
        assert_eq!(stats.count(Perfect), 3);
        assert_eq!(stats.count(Late), 1);
    }

    #[test]
    fn test_apply_is_pure() {
        let before = PracticeStats::new();
        let after = before.apply(Grade::Good);

        assert_eq!(before, PracticeStats::default());
        assert_eq!(after.total_hits, 1);
        assert_eq!(after.accuracy_percent, 100);
    }

    #[test]
    fn test_accuracy_rounding() {
        use Grade::*;
        // 2 of 3 on time: 66.67 -> 67
        assert_eq!(PracticeStats::from_grades([Perfect, Miss, Good]).accuracy_percent, 67);
        assert_eq!(PracticeStats::new().accuracy_percent, 0);
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = PracticeStats::from_grades([Grade::Early]);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalHits"], 1);
        assert_eq!(json["earlyCount"], 1);
        assert_eq!(json["accuracyPercent"], 0);
        assert_eq!(serde_json::to_value(Grade::Perfect).unwrap(), "perfect");
    }
}
