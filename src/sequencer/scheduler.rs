// Pattern Scheduler - Loops a pattern on the transport and answers
// "what was expected around time t" for hit grading

use super::pattern::Pattern;
use super::timeline::{SymbolicTime, Tempo};
use super::transport::{Tick, TickHandle, TransportClock};
use crate::audio::SharedOutput;
use crate::pads::PadId;
use log::{debug, trace};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// No pattern
    #[default]
    Idle,
    /// Pattern loaded, not playing
    Loaded,
    /// Pattern playing in a loop from transport time 0
    Running,
}

/// One expected hit at an absolute transport time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedEvent {
    pub pad_id: PadId,
    /// Seconds from transport position 0
    pub time: f64,
}

/// Called on every step that has hits, with the loop step index
pub type StepCallback = Box<dyn FnMut(u32, &[PadId])>;

/// Pattern scheduler
///
/// Plays one pattern in a loop, anchored at transport position 0, on a
/// 16th-note tick. Loading a new pattern replaces the old one entirely.
/// Window queries use the tempo the pattern is actually playing at, which
/// differs from the pattern tempo once another component retunes the
/// transport (see [`follow_tempo`](PatternScheduler::follow_tempo)).
pub struct PatternScheduler {
    pattern: Option<Pattern>,
    state: SchedulerState,
    /// Transport tempo while running, when it differs from the pattern's
    playback_tempo: Option<Tempo>,
    tick_handle: Option<TickHandle>,
    step_callback: Rc<RefCell<Option<StepCallback>>>,
}

impl PatternScheduler {
    pub fn new() -> Self {
        Self {
            pattern: None,
            state: SchedulerState::Idle,
            playback_tempo: None,
            tick_handle: None,
            step_callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Tempo the loaded pattern plays and is graded at
    pub fn tempo(&self) -> Option<Tempo> {
        let pattern = self.pattern.as_ref()?;
        Some(self.playback_tempo.unwrap_or(pattern.tempo))
    }

    /// Track a transport tempo change made while the pattern plays
    /// Ignored unless running; the next start goes back to the pattern tempo.
    pub fn follow_tempo(&mut self, tempo: Tempo) {
        if !self.is_running() {
            return;
        }
        if self.tempo() != Some(tempo) {
            debug!("pattern follows transport tempo {}", tempo);
        }
        self.playback_tempo = Some(tempo);
    }

    /// Register a callback fired on every step with hits
    pub fn on_step(&mut self, callback: StepCallback) {
        *self.step_callback.borrow_mut() = Some(callback);
    }

    /// Replace the loaded pattern
    /// A running pattern is stopped first; the new one is not started.
    pub fn load(&mut self, pattern: Pattern, transport: &mut dyn TransportClock) {
        self.stop(transport);
        debug!(
            "loaded pattern '{}' ({} events, {} bars)",
            pattern.id,
            pattern.event_count(),
            pattern.length_in_bars
        );
        self.pattern = Some(pattern);
        self.playback_tempo = None;
        self.state = SchedulerState::Loaded;
    }

    /// Drop the loaded pattern
    pub fn unload(&mut self, transport: &mut dyn TransportClock) -> Option<Pattern> {
        self.stop(transport);
        self.state = SchedulerState::Idle;
        self.pattern.take()
    }

    /// Start looping the loaded pattern
    /// Sets the transport tempo to the pattern tempo. Without a pattern
    /// this does nothing.
    pub fn start(&mut self, transport: &mut dyn TransportClock, output: SharedOutput) {
        let Some(pattern) = &self.pattern else {
            debug!("no pattern loaded, not starting");
            return;
        };
        if let Some(handle) = self.tick_handle.take() {
            transport.clear_tick(handle);
        }

        transport.set_tempo(pattern.tempo);
        self.playback_tempo = None;

        let beats_per_bar = pattern.time_signature.beats_per_bar();
        let loop_sixteenths = (pattern.length_in_bars as u64
            * beats_per_bar as u64
            * SymbolicTime::SUBDIVISIONS_PER_BEAT as u64)
            .max(1);

        let mut steps: BTreeMap<u64, Vec<PadId>> = BTreeMap::new();
        for event in pattern.events() {
            let step = event.time.to_sixteenths(beats_per_bar) % loop_sixteenths;
            steps.entry(step).or_default().push(event.pad_id);
        }

        let step_callback = Rc::clone(&self.step_callback);
        let handle = transport.on_tick(
            0.25,
            Box::new(move |tick: &Tick| {
                let step = tick.index % loop_sixteenths;
                let Some(pads) = steps.get(&step) else {
                    return;
                };
                trace!("step {} at {:.4}s: {:?}", step, tick.time, pads);

                {
                    let mut output = output.borrow_mut();
                    for &pad_id in pads {
                        output.trigger(pad_id);
                    }
                }

                if let Some(callback) = step_callback.borrow_mut().as_mut() {
                    callback(step as u32, pads);
                }
            }),
        );

        debug!("pattern '{}' started at {}", pattern.id, pattern.tempo);
        self.tick_handle = Some(handle);
        self.state = SchedulerState::Running;
    }

    /// Stop playback, keeping the pattern loaded
    /// Safe to call repeatedly or before any start.
    pub fn stop(&mut self, transport: &mut dyn TransportClock) {
        if let Some(handle) = self.tick_handle.take() {
            transport.clear_tick(handle);
            debug!("pattern stopped");
        }
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Loaded;
        }
        self.playback_tempo = None;
    }

    /// Expected hits with `start <= time <= end`, across loop iterations
    ///
    /// Times are absolute transport seconds, with the pattern anchored at
    /// position 0, at the playback tempo. Works in any state as long as a
    /// pattern is loaded.
    pub fn expected_events_in_window(&self, start: f64, end: f64) -> Vec<ExpectedEvent> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        let tempo = self.playback_tempo.unwrap_or(pattern.tempo);
        let beats_per_bar = pattern.time_signature.beats_per_bar();
        let duration = tempo.bar_duration_seconds(beats_per_bar) * pattern.length_in_bars as f64;
        if !(duration > 0.0) || end < start {
            return Vec::new();
        }

        let mut expected = Vec::new();
        for event in pattern.events() {
            let offset = event.time.to_seconds(&tempo, beats_per_bar);
            let first = ((start - offset) / duration).floor() as i64;
            let last = ((end - offset) / duration).ceil() as i64;

            for iteration in first..=last {
                let time = offset + iteration as f64 * duration;
                if time >= start && time <= end {
                    expected.push(ExpectedEvent {
                        pad_id: event.pad_id,
                        time,
                    });
                }
            }
        }

        expected
    }
}

impl Default for PatternScheduler {
    fn default() -> Self {
        Self::new()
    }
}
