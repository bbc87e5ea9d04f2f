// Audio output collaborator
// Sample playback and click synthesis live outside this crate; the engine
// only tells the output what to play.

pub mod context;

use crate::pads::{PadId, pad_name};
use crate::sequencer::metronome::ClickPreset;
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub use context::AudioContextCell;

/// Errors raised while bringing up the audio side
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("Audio initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Audio context is not initialized")]
    NotInitialized,
}

/// Which voicing a metronome click uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickVoice {
    /// First beat of the measure
    Downbeat,
    /// First beat of a sub-group (e.g. beat 3 of 2+2+3)
    Accent,
    /// Any other tick
    Offbeat,
}

/// One metronome click to render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Beat index within the measure
    pub beat: u32,
    pub voice: ClickVoice,
    pub preset: ClickPreset,
    /// Output level in dB (0 dB = full scale)
    pub level_db: f64,
    /// Pitch name of the voicing ("C6")
    pub note: &'static str,
    /// Voicing velocity, 0.0 - 1.0
    pub velocity: f32,
}

/// Fire-and-forget audio output
pub trait AudioOutput {
    /// Play the sample of a pad from the start
    fn trigger(&mut self, pad_id: PadId);

    /// Play a metronome click
    fn click(&mut self, click: &Click);
}

/// Output shared between the engine and its tick callbacks
pub type SharedOutput = Rc<RefCell<dyn AudioOutput>>;

/// Wrap an output for sharing with tick callbacks
pub fn shared_output<O: AudioOutput + 'static>(output: O) -> SharedOutput {
    Rc::new(RefCell::new(output))
}

/// Output that only logs what it would play
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutput;

impl AudioOutput for LogOutput {
    fn trigger(&mut self, pad_id: PadId) {
        debug!("pad {} ({})", pad_id, pad_name(pad_id).unwrap_or("unknown"));
    }

    fn click(&mut self, click: &Click) {
        debug!(
            "click beat {} {:?} {} @ {:.1} dB",
            click.beat, click.voice, click.note, click.level_db
        );
    }
}

/// Output that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn trigger(&mut self, _pad_id: PadId) {}

    fn click(&mut self, _click: &Click) {}
}

/// Output that remembers everything it was asked to play
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingOutput {
    pub pads: Vec<PadId>,
    pub clicks: Vec<Click>,
}

#[cfg(test)]
impl AudioOutput for RecordingOutput {
    fn trigger(&mut self, pad_id: PadId) {
        self.pads.push(pad_id);
    }

    fn click(&mut self, click: &Click) {
        self.clicks.push(*click);
    }
}
