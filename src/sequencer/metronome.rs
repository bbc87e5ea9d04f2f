// Metronome - Subdivision-accurate click scheduling with grouped accents
// Clicks are rendered by the audio output; this module decides when and how

use super::SequencerError;
use super::timeline::{Tempo, TimeSignature};
use super::transport::{Tick, TickHandle, TransportClock};
use crate::audio::{Click, ClickVoice, SharedOutput};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Click timbre, rendered by the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickPreset {
    #[default]
    Classic,
    Woodblock,
    Hihat,
    Cowbell,
    Beep,
}

impl ClickPreset {
    pub const ALL: [ClickPreset; 5] = [
        ClickPreset::Classic,
        ClickPreset::Woodblock,
        ClickPreset::Hihat,
        ClickPreset::Cowbell,
        ClickPreset::Beep,
    ];

    /// Pitch and velocity of a voicing
    pub fn voicing(&self, voice: ClickVoice) -> (&'static str, f32) {
        use ClickVoice::*;
        match (self, voice) {
            (ClickPreset::Classic, Downbeat) => ("C6", 0.8),
            (ClickPreset::Classic, Accent) => ("G5", 0.6),
            (ClickPreset::Classic, Offbeat) => ("C5", 0.35),
            (ClickPreset::Woodblock, Downbeat) => ("G5", 0.9),
            (ClickPreset::Woodblock, Accent) => ("D5", 0.7),
            (ClickPreset::Woodblock, Offbeat) => ("G4", 0.4),
            (ClickPreset::Hihat, Downbeat) => ("C7", 0.7),
            (ClickPreset::Hihat, Accent) => ("C7", 0.55),
            (ClickPreset::Hihat, Offbeat) => ("C7", 0.3),
            (ClickPreset::Cowbell, Downbeat) => ("A5", 0.85),
            (ClickPreset::Cowbell, Accent) => ("E5", 0.65),
            (ClickPreset::Cowbell, Offbeat) => ("A4", 0.4),
            (ClickPreset::Beep, Downbeat) => ("E6", 0.8),
            (ClickPreset::Beep, Accent) => ("B5", 0.6),
            (ClickPreset::Beep, Offbeat) => ("E5", 0.35),
        }
    }
}

/// Time signatures offered to the user, with their groupings
/// The first grouping of each entry is the default.
pub const TIME_SIGNATURE_OPTIONS: [((u8, u8), &[&[u8]]); 6] = [
    ((4, 4), &[&[4], &[2, 2]]),
    ((3, 4), &[&[3]]),
    ((5, 4), &[&[3, 2], &[2, 3]]),
    ((6, 8), &[&[3, 3], &[2, 2, 2]]),
    ((7, 8), &[&[2, 2, 3], &[3, 2, 2], &[2, 3, 2]]),
    ((8, 8), &[&[3, 3, 2], &[3, 2, 3], &[2, 3, 3]]),
];

/// Default grouping for a time signature (`[numerator]` if not listed)
pub fn default_grouping(time_signature: &TimeSignature) -> Vec<u8> {
    let key = (time_signature.numerator(), time_signature.denominator());
    TIME_SIGNATURE_OPTIONS
        .iter()
        .find(|(sig, _)| *sig == key)
        .and_then(|(_, groupings)| groupings.first())
        .map(|grouping| grouping.to_vec())
        .unwrap_or_else(|| vec![time_signature.numerator()])
}

/// Format a grouping for display: `[2, 2, 3]` -> `"2+2+3"`
pub fn format_grouping(grouping: &[u8]) -> String {
    grouping
        .iter()
        .map(|size| size.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Beat positions that start a sub-group, excluding the downbeat
pub fn accent_positions(grouping: &[u8]) -> BTreeSet<u32> {
    let mut accents = BTreeSet::new();
    let mut position = 0u32;
    for &size in grouping {
        if position > 0 {
            accents.insert(position);
        }
        position += size as u32;
    }
    accents
}

/// Check that a grouping is a partition of the measure
pub fn validate_grouping(grouping: &[u8], beats: u8) -> Result<(), SequencerError> {
    let sum: u32 = grouping.iter().map(|&size| size as u32).sum();
    if grouping.is_empty() || grouping.contains(&0) || sum != beats as u32 {
        return Err(SequencerError::InvalidGrouping {
            grouping: grouping.to_vec(),
            beats,
        });
    }
    Ok(())
}

/// Map a 0-100 volume to an output level in dB
/// 0 is silence, 100 is 0 dB, linear over a 40 dB range in between.
pub fn volume_to_db(volume: u8) -> f64 {
    if volume == 0 {
        return f64::NEG_INFINITY;
    }
    -40.0 + (volume.min(100) as f64 / 100.0) * 40.0
}

/// Metronome configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetronomeSettings {
    pub tempo: Tempo,
    /// Beats per measure and the note value each tick lasts
    pub time_signature: TimeSignature,
    /// Accent grouping; `None` means the meter's default grouping
    pub grouping: Option<Vec<u8>>,
    /// 0 - 100
    pub volume: u8,
    pub muted: bool,
    pub preset: ClickPreset,
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        Self {
            tempo: Tempo::default(),
            time_signature: TimeSignature::four_four(),
            grouping: None,
            volume: 70,
            muted: false,
            preset: ClickPreset::Classic,
        }
    }
}

impl MetronomeSettings {
    /// Grouping in effect (the meter's default when unset)
    pub fn effective_grouping(&self) -> Vec<u8> {
        self.grouping
            .clone()
            .unwrap_or_else(|| default_grouping(&self.time_signature))
    }

    pub fn validate(&self) -> Result<(), SequencerError> {
        if let Some(grouping) = &self.grouping {
            validate_grouping(grouping, self.time_signature.numerator())?;
        }
        Ok(())
    }
}

/// Called on every tick with the beat index and its voicing
pub type BeatCallback = Box<dyn FnMut(u32, ClickVoice)>;

struct MetronomeState {
    settings: MetronomeSettings,
    accents: BTreeSet<u32>,
    counter: u64,
    current_beat: Option<u32>,
    beat_callback: Option<BeatCallback>,
}

impl MetronomeState {
    fn level_db(&self) -> f64 {
        if self.settings.muted {
            f64::NEG_INFINITY
        } else {
            volume_to_db(self.settings.volume)
        }
    }

    fn voice_for(&self, beat: u32) -> ClickVoice {
        if beat == 0 {
            ClickVoice::Downbeat
        } else if self.accents.contains(&beat) {
            ClickVoice::Accent
        } else {
            ClickVoice::Offbeat
        }
    }

    /// Advance the beat counter by one tick
    fn next_click(&mut self) -> Click {
        let beats = self.settings.time_signature.beats_per_bar() as u64;
        let beat = (self.counter % beats) as u32;
        self.counter += 1;
        self.current_beat = Some(beat);

        let voice = self.voice_for(beat);
        let (note, velocity) = self.settings.preset.voicing(voice);

        Click {
            beat,
            voice,
            preset: self.settings.preset,
            level_db: self.level_db(),
            note,
            velocity,
        }
    }
}

/// Metronome engine
///
/// Registers one transport tick per note value (`4 / noteValue` quarter
/// notes), so 8ths tick twice as fast as quarters at the same tempo.
/// Volume, preset and grouping are read on every tick, so changes made
/// while running apply from the next click on.
pub struct MetronomeEngine {
    state: Rc<RefCell<MetronomeState>>,
    output: SharedOutput,
    tick_handle: Option<TickHandle>,
}

impl MetronomeEngine {
    /// Create new metronome
    pub fn new(output: SharedOutput, settings: MetronomeSettings) -> Result<Self, SequencerError> {
        settings.validate()?;
        let accents = accent_positions(&settings.effective_grouping());

        Ok(Self {
            state: Rc::new(RefCell::new(MetronomeState {
                settings,
                accents,
                counter: 0,
                current_beat: None,
                beat_callback: None,
            })),
            output,
            tick_handle: None,
        })
    }

    /// Current settings
    pub fn settings(&self) -> MetronomeSettings {
        self.state.borrow().settings.clone()
    }

    pub fn is_running(&self) -> bool {
        self.tick_handle.is_some()
    }

    /// Beat index of the last tick, `None` before the first tick
    pub fn current_beat(&self) -> Option<u32> {
        self.state.borrow().current_beat
    }

    /// Ticks since start
    pub fn tick_count(&self) -> u64 {
        self.state.borrow().counter
    }

    /// Accent positions of the current grouping
    pub fn accents(&self) -> BTreeSet<u32> {
        self.state.borrow().accents.clone()
    }

    /// Register the beat callback
    pub fn on_beat(&mut self, callback: BeatCallback) {
        self.state.borrow_mut().beat_callback = Some(callback);
    }

    /// Start clicking from beat 0
    /// Restarts if already running. Sets the transport tempo.
    pub fn start(&mut self, transport: &mut dyn TransportClock) {
        self.stop(transport);

        let (tempo, interval_quarters) = {
            let mut state = self.state.borrow_mut();
            state.counter = 0;
            state.current_beat = None;
            (
                state.settings.tempo,
                state.settings.time_signature.beat_duration_multiplier(),
            )
        };

        transport.set_tempo(tempo);

        let state = Rc::clone(&self.state);
        let output = Rc::clone(&self.output);
        let handle = transport.on_tick(
            interval_quarters,
            Box::new(move |tick: &Tick| {
                let (click, callback) = {
                    let mut state = state.borrow_mut();
                    let click = state.next_click();
                    (click, state.beat_callback.take())
                };
                trace!("metronome beat {} {:?} at {:.4}s", click.beat, click.voice, tick.time);

                if click.level_db.is_finite() {
                    output.borrow_mut().click(&click);
                }

                if let Some(mut callback) = callback {
                    callback(click.beat, click.voice);
                    let mut state = state.borrow_mut();
                    if state.beat_callback.is_none() {
                        state.beat_callback = Some(callback);
                    }
                }
            }),
        );

        debug!("metronome started at {} ({} quarters per tick)", tempo, interval_quarters);
        self.tick_handle = Some(handle);
    }

    /// Stop clicking and reset the beat counter
    /// Safe to call when already stopped.
    pub fn stop(&mut self, transport: &mut dyn TransportClock) {
        let Some(handle) = self.tick_handle.take() else {
            return;
        };
        transport.clear_tick(handle);

        let mut state = self.state.borrow_mut();
        state.counter = 0;
        state.current_beat = None;
        debug!("metronome stopped");
    }

    /// Change tempo; applied to the transport right away when running
    pub fn set_tempo(&mut self, tempo: Tempo, transport: &mut dyn TransportClock) {
        self.state.borrow_mut().settings.tempo = tempo;
        if self.is_running() {
            transport.set_tempo(tempo);
        }
    }

    /// Change meter; the grouping resets to the meter's default
    /// A running metronome restarts on the new tick interval.
    pub fn set_time_signature(
        &mut self,
        time_signature: TimeSignature,
        transport: &mut dyn TransportClock,
    ) {
        {
            let grouping = default_grouping(&time_signature);
            let mut state = self.state.borrow_mut();
            state.settings.time_signature = time_signature;
            state.accents = accent_positions(&grouping);
            state.settings.grouping = Some(grouping);
        }
        if self.is_running() {
            self.start(transport);
        }
    }

    /// Set the accent grouping (`None` restores the default)
    pub fn set_grouping(&mut self, grouping: Option<Vec<u8>>) -> Result<(), SequencerError> {
        let mut state = self.state.borrow_mut();
        let time_signature = state.settings.time_signature;
        let effective = match &grouping {
            Some(grouping) => {
                validate_grouping(grouping, time_signature.numerator())?;
                grouping.clone()
            }
            None => default_grouping(&time_signature),
        };

        state.accents = accent_positions(&effective);
        state.settings.grouping = grouping;
        Ok(())
    }

    /// Set volume (0-100)
    /// Muting does not touch the stored volume.
    pub fn set_volume(&mut self, volume: u8) {
        self.state.borrow_mut().settings.volume = volume.min(100);
    }

    /// Volume that sounds when not muted
    pub fn volume(&self) -> u8 {
        self.state.borrow().settings.volume
    }

    /// Output level in dB (-inf when silent or muted)
    pub fn level_db(&self) -> f64 {
        self.state.borrow().level_db()
    }

    pub fn mute(&mut self) {
        self.state.borrow_mut().settings.muted = true;
    }

    pub fn unmute(&mut self) {
        self.state.borrow_mut().settings.muted = false;
    }

    pub fn is_muted(&self) -> bool {
        self.state.borrow().settings.muted
    }

    pub fn set_preset(&mut self, preset: ClickPreset) {
        self.state.borrow_mut().settings.preset = preset;
    }

    pub fn preset(&self) -> ClickPreset {
        self.state.borrow().settings.preset
    }
}
