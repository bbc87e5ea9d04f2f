// Hit analyzer - Grades a pad hit against the expected events near "now"

use super::stats::{Grade, GradeThresholds};
use crate::pads::PadId;
use crate::sequencer::scheduler::{ExpectedEvent, PatternScheduler};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Outcome of one pad hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitResult {
    pub pad_id: PadId,
    /// Absolute transport time of the matched event, 0 when unmatched
    pub expected_time: f64,
    /// Transport time of the hit
    pub actual_time: f64,
    pub grade: Grade,
    /// Hit minus expected time (negative = early), 0 when unmatched
    pub delta_ms: f64,
}

impl HitResult {
    /// A hit with no expected event nearby
    pub fn unmatched(pad_id: PadId, actual_time: f64) -> Self {
        Self {
            pad_id,
            expected_time: 0.0,
            actual_time,
            grade: Grade::Miss,
            delta_ms: 0.0,
        }
    }

    /// Whether the hit was matched to an expected event
    pub fn is_matched(&self) -> bool {
        !(self.grade == Grade::Miss && self.delta_ms == 0.0 && self.expected_time == 0.0)
    }
}

/// Grading parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Half-width of the search window around the hit, in seconds
    pub window_seconds: f64,
    pub thresholds: GradeThresholds,
    /// Consumed events remembered before trimming
    pub consumed_capacity: usize,
    /// Most recent consumed events kept after a trim
    pub consumed_keep: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            window_seconds: 0.2,
            thresholds: GradeThresholds::default(),
            consumed_capacity: 200,
            consumed_keep: 100,
        }
    }
}

/// Identity of an expected event: pad and time rounded to 0.1 ms
type ConsumedKey = (PadId, i64);

fn consumed_key(event: &ExpectedEvent) -> ConsumedKey {
    (event.pad_id, (event.time * 10_000.0).round() as i64)
}

/// Matches hits to expected events, each expected event at most once
pub struct HitAnalyzer {
    settings: AnalyzerSettings,
    consumed: HashSet<ConsumedKey>,
    /// Insertion order of `consumed`, oldest first
    consumed_order: VecDeque<ConsumedKey>,
}

impl HitAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Self {
        Self {
            settings,
            consumed: HashSet::new(),
            consumed_order: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Grade a hit on `pad_id` at transport time `now`
    ///
    /// Picks the closest not-yet-consumed expected event for the pad within
    /// the window and consumes it. Without a candidate the hit is an
    /// unmatched miss.
    pub fn analyze(&mut self, pad_id: PadId, now: f64, scheduler: &PatternScheduler) -> HitResult {
        let window = self.settings.window_seconds;
        let closest = scheduler
            .expected_events_in_window(now - window, now + window)
            .into_iter()
            .filter(|event| event.pad_id == pad_id)
            .filter(|event| !self.consumed.contains(&consumed_key(event)))
            .fold(None, |best: Option<ExpectedEvent>, event| match best {
                Some(best) if (now - best.time).abs() <= (now - event.time).abs() => Some(best),
                _ => Some(event),
            });

        let Some(event) = closest else {
            debug!("pad {} at {:.4}s: no expected event", pad_id, now);
            return HitResult::unmatched(pad_id, now);
        };

        self.consume(consumed_key(&event));

        let delta_ms = (now - event.time) * 1000.0;
        let grade = Grade::from_delta_ms(delta_ms, &self.settings.thresholds);
        debug!("pad {} at {:.4}s: {} ({:+.1} ms)", pad_id, now, grade, delta_ms);

        HitResult {
            pad_id,
            expected_time: event.time,
            actual_time: now,
            grade,
            delta_ms,
        }
    }

    fn consume(&mut self, key: ConsumedKey) {
        if !self.consumed.insert(key) {
            return;
        }
        self.consumed_order.push_back(key);

        if self.consumed_order.len() > self.settings.consumed_capacity {
            let excess = self.consumed_order.len() - self.settings.consumed_keep;
            for old in self.consumed_order.drain(..excess) {
                self.consumed.remove(&old);
            }
        }
    }

    /// Number of expected events currently remembered as consumed
    pub fn consumed_count(&self) -> usize {
        self.consumed_order.len()
    }

    /// Forget every consumed event
    pub fn reset(&mut self) {
        self.consumed.clear();
        self.consumed_order.clear();
    }
}

impl Default for HitAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerSettings::default())
    }
}
