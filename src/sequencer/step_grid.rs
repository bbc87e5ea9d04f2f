// Step grid - Pad x step on/off matrix used by the pattern editor
// Stored as one flat arena sized once per (bars, time signature)

use super::pattern::{MAX_LENGTH_IN_BARS, Pattern, PatternEvent, PatternId};
use super::timeline::{SymbolicTime, Tempo, TimeSignature};
use super::SequencerError;
use crate::pads::{ACTIVE_PAD_IDS, PadId};

/// Rectangular on/off matrix, one row per pad, one column per 16th step
///
/// Rows follow `pad_ids` order. Structural changes (bar count, time
/// signature) allocate a new arena instead of resizing in place.
#[derive(Debug, Clone, PartialEq)]
pub struct StepGrid {
    pad_ids: Vec<PadId>,
    bars: u32,
    time_signature: TimeSignature,
    cells: Box<[bool]>,
}

impl StepGrid {
    /// Create an empty grid
    /// `bars` is clamped to the pattern length range.
    pub fn new(pad_ids: &[PadId], bars: u32, time_signature: TimeSignature) -> Self {
        let bars = bars.clamp(1, MAX_LENGTH_IN_BARS);
        let total_steps = (bars * time_signature.steps_per_bar()) as usize;

        Self {
            pad_ids: pad_ids.to_vec(),
            bars,
            time_signature,
            cells: vec![false; pad_ids.len() * total_steps].into_boxed_slice(),
        }
    }

    /// Empty 4/4 grid over the sample-backed pads
    pub fn with_active_pads(bars: u32) -> Self {
        Self::new(&ACTIVE_PAD_IDS, bars, TimeSignature::four_four())
    }

    /// Build a grid from pattern events
    /// Events for pads outside `pad_ids` or beyond the grid end are dropped;
    /// duplicate hits on one step collapse to a single `true`.
    pub fn from_events(
        events: &[PatternEvent],
        pad_ids: &[PadId],
        bars: u32,
        time_signature: TimeSignature,
    ) -> Self {
        let mut grid = Self::new(pad_ids, bars, time_signature);
        let steps_per_bar = time_signature.steps_per_bar();

        for event in events {
            let step = event.time.to_step(steps_per_bar);
            grid.set(event.pad_id, step, true);
        }

        grid
    }

    /// Build a grid from a pattern
    pub fn from_pattern(pattern: &Pattern, pad_ids: &[PadId]) -> Self {
        Self::from_events(
            pattern.events(),
            pad_ids,
            pattern.length_in_bars,
            pattern.time_signature,
        )
    }

    /// Convert every active step to a pattern event
    /// Events come out row by row, in step order within each row.
    pub fn to_events(&self) -> Vec<PatternEvent> {
        let steps_per_bar = self.steps_per_bar();
        let total_steps = self.total_steps() as usize;
        let mut events = Vec::new();

        for (row, &pad_id) in self.pad_ids.iter().enumerate() {
            let cells = &self.cells[row * total_steps..(row + 1) * total_steps];
            for (step, _) in cells.iter().enumerate().filter(|(_, on)| **on) {
                events.push(PatternEvent::new(
                    SymbolicTime::from_step(step as u32, steps_per_bar),
                    pad_id,
                ));
            }
        }

        events
    }

    /// Build a pattern from the grid
    pub fn to_pattern(
        &self,
        id: impl Into<PatternId>,
        name: impl Into<String>,
        tempo: Tempo,
    ) -> Result<Pattern, SequencerError> {
        let mut pattern = Pattern::new(id, name, tempo, self.time_signature, self.bars)?;
        pattern.set_events(self.to_events());
        Ok(pattern)
    }

    fn index(&self, pad_id: PadId, step: u32) -> Option<usize> {
        let total_steps = self.total_steps();
        if step >= total_steps {
            return None;
        }
        let row = self.pad_ids.iter().position(|&id| id == pad_id)?;
        Some(row * total_steps as usize + step as usize)
    }

    /// Read one cell (false for unknown pads or out-of-range steps)
    pub fn get(&self, pad_id: PadId, step: u32) -> bool {
        self.index(pad_id, step)
            .map(|index| self.cells[index])
            .unwrap_or(false)
    }

    /// Write one cell
    /// Returns false if the cell does not exist.
    pub fn set(&mut self, pad_id: PadId, step: u32, on: bool) -> bool {
        match self.index(pad_id, step) {
            Some(index) => {
                self.cells[index] = on;
                true
            }
            None => false,
        }
    }

    /// Flip one cell, returning its new value
    pub fn toggle(&mut self, pad_id: PadId, step: u32) -> Option<bool> {
        let index = self.index(pad_id, step)?;
        self.cells[index] = !self.cells[index];
        Some(self.cells[index])
    }

    /// Steps of one pad row
    pub fn row(&self, pad_id: PadId) -> Option<&[bool]> {
        let total_steps = self.total_steps() as usize;
        let row = self.pad_ids.iter().position(|&id| id == pad_id)?;
        Some(&self.cells[row * total_steps..(row + 1) * total_steps])
    }

    /// Turn every cell off
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Change the bar count
    /// Steps that still fit are kept, new steps start off.
    pub fn set_bars(&mut self, bars: u32) {
        self.reshape(bars, self.time_signature);
    }

    /// Change the time signature, keeping steps that still fit
    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.reshape(self.bars, time_signature);
    }

    fn reshape(&mut self, bars: u32, time_signature: TimeSignature) {
        let mut next = Self::new(&self.pad_ids, bars, time_signature);
        let old_steps = self.total_steps() as usize;
        let kept = old_steps.min(next.total_steps() as usize);
        let new_steps = next.total_steps() as usize;

        for row in 0..self.pad_ids.len() {
            next.cells[row * new_steps..row * new_steps + kept]
                .copy_from_slice(&self.cells[row * old_steps..row * old_steps + kept]);
        }

        *self = next;
    }

    pub fn pad_ids(&self) -> &[PadId] {
        &self.pad_ids
    }

    pub fn bars(&self) -> u32 {
        self.bars
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn steps_per_bar(&self) -> u32 {
        self.time_signature.steps_per_bar()
    }

    pub fn total_steps(&self) -> u32 {
        self.bars * self.steps_per_bar()
    }

    /// Number of active cells
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|on| **on).count()
    }
}
