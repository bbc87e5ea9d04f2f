// Transport - Playback clock and tick scheduling
// The clock every musical time is measured against

use super::timeline::{Tempo, TimeSignature};
use log::{debug, trace};

/// Transport state (play/stop/pause)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl TransportState {
    /// Check if transport is running
    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Playing)
    }

    /// Check if transport is stopped or paused
    pub fn is_stopped(&self) -> bool {
        matches!(self, TransportState::Stopped | TransportState::Paused)
    }
}

/// Identifies a registered tick callback
pub type TickHandle = u64;

/// One firing of a tick callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub handle: TickHandle,
    /// Number of earlier firings of this callback since it was (re)phased
    pub index: u64,
    /// Transport position of the tick in seconds
    pub time: f64,
}

/// Callback invoked on every tick
pub type TickCallback = Box<dyn FnMut(&Tick)>;

/// External clock the engine schedules against
///
/// Callbacks run on the caller's thread of control and must not block.
pub trait TransportClock {
    /// Current transport position in seconds
    fn now(&self) -> f64;

    /// Current state
    fn state(&self) -> TransportState;

    /// Tempo that tick intervals are measured in
    fn tempo(&self) -> Tempo;

    fn set_tempo(&mut self, tempo: Tempo);

    /// Register a repeating callback every `interval_quarters` quarter notes
    /// (0.25 = 16th notes, 0.5 = eighth notes), first firing at position 0
    fn on_tick(&mut self, interval_quarters: f64, callback: TickCallback) -> TickHandle;

    /// Remove a callback; returns false if the handle was unknown
    fn clear_tick(&mut self, handle: TickHandle) -> bool;

    fn start(&mut self);

    /// Stop and rewind to position 0
    fn stop(&mut self);
}

struct TickTimer {
    handle: TickHandle,
    interval_quarters: f64,
    next_time: f64,
    index: u64,
    callback: TickCallback,
}

/// Deterministic transport advanced explicitly by the host
///
/// The host (audio callback, UI frame loop or test) calls [`advance`]
/// with the elapsed time; every due tick fires in time order.
///
/// [`advance`]: ManualTransport::advance
pub struct ManualTransport {
    state: TransportState,
    position: f64,
    tempo: Tempo,
    time_signature: TimeSignature,
    timers: Vec<TickTimer>,
    next_handle: TickHandle,
}

impl ManualTransport {
    /// Create new transport
    pub fn new() -> Self {
        Self {
            state: TransportState::Stopped,
            position: 0.0,
            tempo: Tempo::default(),
            time_signature: TimeSignature::default(),
            timers: Vec::new(),
            next_handle: 1,
        }
    }

    /// Pause (keep current position)
    pub fn pause(&mut self) {
        self.state = TransportState::Paused;
    }

    /// Toggle play/pause
    pub fn toggle_play(&mut self) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Get time signature
    pub fn time_signature(&self) -> &TimeSignature {
        &self.time_signature
    }

    /// Set time signature
    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
    }

    /// Move the playhead without firing ticks
    /// Timers re-phase to the next tick at or after the new position.
    pub fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
        let seconds_per_quarter = self.tempo.seconds_per_beat();
        for timer in &mut self.timers {
            let interval = timer.interval_quarters * seconds_per_quarter;
            let index = (seconds.max(0.0) / interval).ceil();
            timer.index = index as u64;
            timer.next_time = index * interval;
        }
    }

    /// Number of registered tick callbacks
    pub fn tick_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance the playhead by `delta_seconds`, firing due ticks
    /// Ticks exactly at the new position fire now, not on the next call.
    /// Returns the number of ticks fired.
    pub fn advance(&mut self, delta_seconds: f64) -> usize {
        if !self.state.is_playing() {
            return 0;
        }

        let target = self.position + delta_seconds.max(0.0);
        let seconds_per_quarter = self.tempo.seconds_per_beat();
        let mut fired = 0;

        loop {
            let due = self
                .timers
                .iter_mut()
                .filter(|timer| timer.next_time <= target)
                .min_by(|a, b| a.next_time.total_cmp(&b.next_time));

            let Some(timer) = due else {
                break;
            };

            let tick = Tick {
                handle: timer.handle,
                index: timer.index,
                time: timer.next_time,
            };
            trace!("tick {} #{} at {:.4}s", tick.handle, tick.index, tick.time);

            self.position = tick.time.max(self.position);
            (timer.callback)(&tick);

            timer.index += 1;
            timer.next_time += timer.interval_quarters * seconds_per_quarter;
            fired += 1;
        }

        self.position = target;
        fired
    }
}

impl Default for ManualTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportClock for ManualTransport {
    fn now(&self) -> f64 {
        self.position
    }

    fn state(&self) -> TransportState {
        self.state
    }

    fn tempo(&self) -> Tempo {
        self.tempo
    }

    fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
        // Keep pending ticks on the musical grid of the new tempo
        let position = self.position;
        self.set_position(position);
    }

    fn on_tick(&mut self, interval_quarters: f64, callback: TickCallback) -> TickHandle {
        let handle = self.next_handle;
        self.next_handle += 1;

        let interval_quarters = if interval_quarters > 0.0 {
            interval_quarters
        } else {
            1.0
        };
        let interval = interval_quarters * self.tempo.seconds_per_beat();
        let index = (self.position.max(0.0) / interval).ceil();

        self.timers.push(TickTimer {
            handle,
            interval_quarters,
            next_time: index * interval,
            index: index as u64,
            callback,
        });
        debug!("registered tick {} every {} quarters", handle, interval_quarters);

        handle
    }

    fn clear_tick(&mut self, handle: TickHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        before != self.timers.len()
    }

    fn start(&mut self) {
        self.state = TransportState::Playing;
    }

    fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.set_position(0.0);
    }
}
