// Practice session - what the UI shows while the player practices

use super::analyzer::HitResult;
use super::stats::PracticeStats;
use std::collections::VecDeque;

/// Hits kept in the history by default
pub const DEFAULT_HISTORY_LEN: usize = 50;

/// Practice state: running flag, stats, last hit and recent history
#[derive(Debug, Clone)]
pub struct PracticeSession {
    practicing: bool,
    stats: PracticeStats,
    last_hit: Option<HitResult>,
    history: VecDeque<HitResult>,
    history_len: usize,
}

impl PracticeSession {
    pub fn new(history_len: usize) -> Self {
        Self {
            practicing: false,
            stats: PracticeStats::new(),
            last_hit: None,
            history: VecDeque::with_capacity(history_len),
            history_len,
        }
    }

    /// Begin practicing with fresh stats
    pub fn start(&mut self) {
        self.reset();
        self.practicing = true;
    }

    /// Stop practicing, keeping the results on screen
    pub fn stop(&mut self) {
        self.practicing = false;
    }

    /// Clear stats and history without changing the practicing flag
    pub fn reset(&mut self) {
        self.stats = PracticeStats::new();
        self.last_hit = None;
        self.history.clear();
    }

    /// Fold a graded hit into the session
    pub fn record(&mut self, result: HitResult) {
        self.stats = self.stats.apply(result.grade);
        self.last_hit = Some(result);

        if self.history_len == 0 {
            return;
        }
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(result);
    }

    pub fn is_practicing(&self) -> bool {
        self.practicing
    }

    pub fn stats(&self) -> PracticeStats {
        self.stats
    }

    pub fn last_hit(&self) -> Option<&HitResult> {
        self.last_hit.as_ref()
    }

    /// Recent hits, oldest first
    pub fn history(&self) -> impl Iterator<Item = &HitResult> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for PracticeSession {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}
