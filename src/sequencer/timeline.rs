// Timeline - Musical time representation
// Converts bar:beat:subdivision positions to transport seconds and step indices

use super::SequencerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time signature (numerator/denominator)
/// Example: 7/8 time = TimeSignature { numerator: 7, denominator: 8 }
///
/// Serialized as a `[numerator, denominator]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct TimeSignature {
    numerator: u8,   // Beats per bar
    denominator: u8, // Note value (2, 4, 8 or 16)
}

impl TimeSignature {
    /// Denominators a signature may use
    pub const VALID_DENOMINATORS: [u8; 4] = [2, 4, 8, 16];

    /// Creates a new time signature
    pub fn new(numerator: u8, denominator: u8) -> Result<Self, SequencerError> {
        if numerator == 0 {
            return Err(SequencerError::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        if !Self::VALID_DENOMINATORS.contains(&denominator) {
            return Err(SequencerError::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Common 4/4 time signature
    pub const fn four_four() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }

    /// Common 3/4 time signature (waltz)
    pub const fn three_four() -> Self {
        Self {
            numerator: 3,
            denominator: 4,
        }
    }

    /// Common 6/8 time signature
    pub const fn six_eight() -> Self {
        Self {
            numerator: 6,
            denominator: 8,
        }
    }

    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    pub fn denominator(&self) -> u8 {
        self.denominator
    }

    /// Number of beats per bar
    pub fn beats_per_bar(&self) -> u32 {
        self.numerator as u32
    }

    /// Number of 16th-note steps in one bar
    /// Example: 4/4 = 16, 7/8 = 14, 3/16 = 3
    pub fn steps_per_bar(&self) -> u32 {
        self.numerator as u32 * 16 / self.denominator as u32
    }

    /// Beat duration relative to quarter note
    /// Example: 4/4 = 1.0, 6/8 = 0.5 (eighth notes)
    pub fn beat_duration_multiplier(&self) -> f64 {
        4.0 / self.denominator as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl TryFrom<[u8; 2]> for TimeSignature {
    type Error = SequencerError;

    fn try_from(value: [u8; 2]) -> Result<Self, Self::Error> {
        Self::new(value[0], value[1])
    }
}

impl From<TimeSignature> for [u8; 2] {
    fn from(value: TimeSignature) -> Self {
        [value.numerator, value.denominator]
    }
}

/// Tempo in BPM (Beats Per Minute)
/// Serialized as the bare BPM number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Creates a new tempo
    /// BPM must be finite and > 0
    pub fn new(bpm: f64) -> Result<Self, SequencerError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(SequencerError::InvalidTempo(bpm));
        }
        Ok(Self { bpm })
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one 16th note in seconds
    pub fn seconds_per_sixteenth(&self) -> f64 {
        self.seconds_per_beat() / SymbolicTime::SUBDIVISIONS_PER_BEAT as f64
    }

    /// Duration of one bar in seconds
    pub fn bar_duration_seconds(&self, beats_per_bar: u32) -> f64 {
        self.seconds_per_beat() * beats_per_bar as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: 120.0 }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

impl TryFrom<f64> for Tempo {
    type Error = SequencerError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tempo> for f64 {
    fn from(value: Tempo) -> Self {
        value.bpm
    }
}

/// Symbolic musical time
/// `bar:beat_group:subdivision`, all 0-based. `beat_group` counts quarter
/// beats within the bar, `subdivision` is the 16th-note offset in the beat.
///
/// The string form (`"1:2:3"`) only exists at the pattern interface
/// boundary; everything else works on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SymbolicTime {
    pub bar: u32,
    pub beat_group: u32,
    pub subdivision: u32,
}

impl SymbolicTime {
    /// 16th-note resolution
    pub const SUBDIVISIONS_PER_BEAT: u32 = 4;

    pub fn new(bar: u32, beat_group: u32, subdivision: u32) -> Self {
        Self {
            bar,
            beat_group,
            subdivision,
        }
    }

    /// Zero position (0:0:0)
    pub fn zero() -> Self {
        Self::default()
    }

    /// Parse `bar:beat_group:subdivision`
    /// Missing or malformed components become 0.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split(':').map(|part| part.trim().parse::<u32>().unwrap_or(0));
        Self {
            bar: parts.next().unwrap_or(0),
            beat_group: parts.next().unwrap_or(0),
            subdivision: parts.next().unwrap_or(0),
        }
    }

    /// Offset from pattern start in 16th notes of the quarter-beat grid
    pub fn to_sixteenths(&self, beats_per_bar: u32) -> u64 {
        let per_beat = Self::SUBDIVISIONS_PER_BEAT as u64;
        self.bar as u64 * beats_per_bar as u64 * per_beat
            + self.beat_group as u64 * per_beat
            + self.subdivision as u64
    }

    /// Convert to seconds from pattern start
    /// `bar·beatsPerBar·secPerBeat + beatGroup·secPerBeat + subdivision·secPerBeat/4`
    pub fn to_seconds(&self, tempo: &Tempo, beats_per_bar: u32) -> f64 {
        let sec_per_beat = tempo.seconds_per_beat();
        self.bar as f64 * beats_per_bar as f64 * sec_per_beat
            + self.beat_group as f64 * sec_per_beat
            + self.subdivision as f64 * sec_per_beat / Self::SUBDIVISIONS_PER_BEAT as f64
    }

    /// Convert seconds back to the nearest 16th-note position
    /// Negative input clamps to 0:0:0.
    pub fn from_seconds(seconds: f64, tempo: &Tempo, beats_per_bar: u32) -> Self {
        let sixteenths = (seconds / tempo.seconds_per_sixteenth()).round().max(0.0) as u64;
        Self::from_sixteenths(sixteenths, beats_per_bar)
    }

    /// Create from an offset on the quarter-beat 16th grid
    pub fn from_sixteenths(sixteenths: u64, beats_per_bar: u32) -> Self {
        let per_beat = Self::SUBDIVISIONS_PER_BEAT as u64;
        let per_bar = (beats_per_bar.max(1) as u64) * per_beat;

        let bar = sixteenths / per_bar;
        let remaining = sixteenths % per_bar;

        Self::new(
            bar as u32,
            (remaining / per_beat) as u32,
            (remaining % per_beat) as u32,
        )
    }

    /// Carry overflowing subdivisions and beat groups into the next unit
    pub fn normalized(&self, beats_per_bar: u32) -> Self {
        Self::from_sixteenths(self.to_sixteenths(beats_per_bar), beats_per_bar)
    }

    /// Convert to a step index (16th-note resolution)
    /// Saturates at `u32::MAX` for positions past the step range.
    pub fn to_step(&self, steps_per_bar: u32) -> u32 {
        self.checked_step(steps_per_bar).unwrap_or(u32::MAX)
    }

    /// Step index, or `None` if it does not fit in a `u32`
    pub fn checked_step(&self, steps_per_bar: u32) -> Option<u32> {
        self.bar
            .checked_mul(steps_per_bar)?
            .checked_add(self.beat_group.checked_mul(Self::SUBDIVISIONS_PER_BEAT)?)?
            .checked_add(self.subdivision)
    }

    /// Create from a step index (16th-note resolution)
    pub fn from_step(step: u32, steps_per_bar: u32) -> Self {
        let steps_per_bar = steps_per_bar.max(1);
        let bar = step / steps_per_bar;
        let remaining = step % steps_per_bar;

        Self::new(
            bar,
            remaining / Self::SUBDIVISIONS_PER_BEAT,
            remaining % Self::SUBDIVISIONS_PER_BEAT,
        )
    }
}

impl fmt::Display for SymbolicTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.bar, self.beat_group, self.subdivision)
    }
}

impl From<&str> for SymbolicTime {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for SymbolicTime {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SymbolicTime> for String {
    fn from(value: SymbolicTime) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_signature() {
        let ts = TimeSignature::four_four();
        assert_eq!(ts.numerator(), 4);
        assert_eq!(ts.denominator(), 4);
        assert_eq!(ts.beats_per_bar(), 4);
        assert_eq!(ts.steps_per_bar(), 16);
        assert_eq!(ts.to_string(), "4/4");
    }

    #[test]
    fn test_time_signature_validation() {
        assert!(TimeSignature::new(7, 8).is_ok());
        assert!(TimeSignature::new(3, 16).is_ok());
        assert!(TimeSignature::new(2, 2).is_ok());
        assert!(TimeSignature::new(4, 3).is_err());
        assert!(TimeSignature::new(4, 1).is_err());
        assert!(TimeSignature::new(4, 32).is_err());
        assert!(TimeSignature::new(0, 4).is_err());
    }

    #[test]
    fn test_steps_per_bar_for_odd_meters() {
        assert_eq!(TimeSignature::new(7, 8).unwrap().steps_per_bar(), 14);
        assert_eq!(TimeSignature::six_eight().steps_per_bar(), 12);
        assert_eq!(TimeSignature::new(5, 4).unwrap().steps_per_bar(), 20);
        assert_eq!(TimeSignature::new(3, 2).unwrap().steps_per_bar(), 24);
    }

    #[test]
    fn test_tempo() {
        let tempo = Tempo::new(120.0).unwrap();
        assert_eq!(tempo.bpm(), 120.0);
        assert_eq!(tempo.seconds_per_beat(), 0.5);
        assert_eq!(tempo.seconds_per_sixteenth(), 0.125);
        assert_eq!(tempo.bar_duration_seconds(4), 2.0);

        assert!(Tempo::new(0.0).is_err());
        assert!(Tempo::new(-90.0).is_err());
        assert!(Tempo::new(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let time = SymbolicTime::parse("1:2:3");
        assert_eq!(time, SymbolicTime::new(1, 2, 3));
        assert_eq!(time.to_string(), "1:2:3");
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(SymbolicTime::parse("2"), SymbolicTime::new(2, 0, 0));
        assert_eq!(SymbolicTime::parse("1:x:3"), SymbolicTime::new(1, 0, 3));
        assert_eq!(SymbolicTime::parse(""), SymbolicTime::zero());
        assert_eq!(SymbolicTime::parse("::1"), SymbolicTime::new(0, 0, 1));
    }

    #[test]
    fn test_to_seconds() {
        let tempo = Tempo::new(120.0).unwrap();

        assert_eq!(SymbolicTime::zero().to_seconds(&tempo, 4), 0.0);
        assert_eq!(SymbolicTime::new(0, 1, 0).to_seconds(&tempo, 4), 0.5);
        assert_eq!(SymbolicTime::new(0, 0, 2).to_seconds(&tempo, 4), 0.25);
        assert_eq!(SymbolicTime::new(1, 0, 0).to_seconds(&tempo, 4), 2.0);

        // 3 beats per bar at 120 BPM: one bar = 1.5s
        assert_eq!(SymbolicTime::new(2, 1, 1).to_seconds(&tempo, 3), 3.625);
    }

    #[test]
    fn test_seconds_round_trip() {
        for bpm in [60.0, 90.0, 120.0, 174.0] {
            let tempo = Tempo::new(bpm).unwrap();
            for beats_per_bar in [3, 4, 5, 7] {
                for bar in 0..3 {
                    for beat_group in 0..beats_per_bar {
                        for subdivision in 0..4 {
                            let time = SymbolicTime::new(bar, beat_group, subdivision);
                            let seconds = time.to_seconds(&tempo, beats_per_bar);
                            let back = SymbolicTime::from_seconds(seconds, &tempo, beats_per_bar);
                            assert_eq!(back, time.normalized(beats_per_bar));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalization_carries() {
        // Subdivision 5 in beat 3 of a 4/4 bar rolls into the next bar
        let time = SymbolicTime::new(0, 3, 5);
        assert_eq!(time.normalized(4), SymbolicTime::new(1, 0, 1));
    }

    #[test]
    fn test_step_conversion() {
        // 4/4: 16 steps per bar
        assert_eq!(SymbolicTime::from_step(0, 16), SymbolicTime::zero());
        assert_eq!(SymbolicTime::from_step(6, 16), SymbolicTime::new(0, 1, 2));
        assert_eq!(SymbolicTime::from_step(17, 16), SymbolicTime::new(1, 0, 1));
        assert_eq!(SymbolicTime::new(1, 0, 1).to_step(16), 17);

        // 7/8: 14 steps per bar
        let time = SymbolicTime::from_step(27, 14);
        assert_eq!(time, SymbolicTime::new(1, 3, 1));
        assert_eq!(time.to_step(14), 27);
    }

    #[test]
    fn test_step_past_range_saturates() {
        let far = SymbolicTime::new(300_000_000, 0, 0);
        assert_eq!(far.checked_step(16), None);
        assert_eq!(far.to_step(16), u32::MAX);

        let max_group = SymbolicTime::new(0, u32::MAX, 0);
        assert_eq!(max_group.checked_step(16), None);
        assert_eq!(SymbolicTime::new(2, 1, 3).checked_step(16), Some(39));
    }

    #[test]
    fn test_serde_forms() {
        let ts: TimeSignature = serde_json::from_str("[7,8]").unwrap();
        assert_eq!(ts, TimeSignature::new(7, 8).unwrap());
        assert_eq!(serde_json::to_string(&ts).unwrap(), "[7,8]");
        assert!(serde_json::from_str::<TimeSignature>("[4,3]").is_err());

        let time: SymbolicTime = serde_json::from_str("\"0:3:2\"").unwrap();
        assert_eq!(time, SymbolicTime::new(0, 3, 2));

        let tempo: Tempo = serde_json::from_str("140").unwrap();
        assert_eq!(tempo.bpm(), 140.0);
        assert!(serde_json::from_str::<Tempo>("0").is_err());
    }
}
