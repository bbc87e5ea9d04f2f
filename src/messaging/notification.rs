// Notifications - What the engine reports to the UI

use crate::audio::ClickVoice;
use crate::pads::PadId;
use crate::practice::{HitResult, PracticeStats};
use crate::sequencer::Pattern;
use std::fmt;

/// One event for the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// Metronome tick: beat index within the measure
    Beat { beat: u32, voice: ClickVoice },
    /// Pattern playback reached a step with hits
    PatternStep { step: u32, pad_count: usize },
    /// A pad was played (practice off, or no pattern running)
    PadTriggered(PadId),
    /// A graded hit
    Hit(HitResult),
    /// Stats after a graded hit
    Stats(PracticeStats),
}

impl Notification {
    /// Step notification for the pads playing on a step
    pub fn pattern_step(step: u32, pads: &[PadId]) -> Self {
        Notification::PatternStep {
            step,
            pad_count: pads.len(),
        }
    }

    /// Check if this notification carries practice results
    pub fn is_practice(&self) -> bool {
        matches!(self, Notification::Hit(_) | Notification::Stats(_))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Beat { beat, voice } => write!(f, "beat {} ({:?})", beat + 1, voice),
            Notification::PatternStep { step, pad_count } => {
                write!(f, "step {} ({} pads)", step, pad_count)
            }
            Notification::PadTriggered(pad_id) => write!(f, "pad {}", pad_id),
            Notification::Hit(hit) => write!(
                f,
                "pad {} {} ({:+.1} ms)",
                hit.pad_id, hit.grade, hit.delta_ms
            ),
            Notification::Stats(stats) => write!(
                f,
                "{} hits, {}% accuracy, streak {}",
                stats.total_hits, stats.accuracy_percent, stats.current_streak
            ),
        }
    }
}

/// Short description of a pattern for status lines
pub fn describe_pattern(pattern: &Pattern) -> String {
    format!(
        "{} [{}] {}, {}, {} bar{}",
        pattern.name,
        pattern.category,
        pattern.tempo,
        pattern.time_signature,
        pattern.length_in_bars,
        if pattern.length_in_bars == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::create_notification_channel;
    use crate::practice::Grade;
    use ringbuf::traits::{Consumer, Producer};

    #[test]
    fn test_channel_delivers_in_order() {
        let (mut tx, mut rx) = create_notification_channel(4);

        assert!(tx.try_push(Notification::Beat { beat: 0, voice: ClickVoice::Downbeat }).is_ok());
        assert!(tx.try_push(Notification::pattern_step(4, &[6, 10])).is_ok());

        assert_eq!(
            rx.try_pop(),
            Some(Notification::Beat { beat: 0, voice: ClickVoice::Downbeat })
        );
        assert_eq!(rx.try_pop(), Some(Notification::PatternStep { step: 4, pad_count: 2 }));
        assert_eq!(rx.try_pop(), None);
    }

    #[test]
    fn test_full_channel_rejects() {
        let (mut tx, _rx) = create_notification_channel(1);
        assert!(tx.try_push(Notification::PadTriggered(6)).is_ok());
        assert!(tx.try_push(Notification::PadTriggered(7)).is_err());
    }

    #[test]
    fn test_describe_pattern() {
        let pattern = crate::sequencer::library::find_pattern("basic-rock").unwrap();
        assert_eq!(describe_pattern(&pattern), "Basic Rock Beat [rock] 100.0 BPM, 4/4, 1 bar");
    }

    #[test]
    fn test_display() {
        let hit = HitResult {
            pad_id: 11,
            expected_time: 1.0,
            actual_time: 1.03,
            grade: Grade::Good,
            delta_ms: 30.0,
        };
        assert_eq!(Notification::Hit(hit).to_string(), "pad 11 good (+30.0 ms)");
        assert!(Notification::Hit(hit).is_practice());
        assert_eq!(
            Notification::Beat { beat: 0, voice: ClickVoice::Accent }.to_string(),
            "beat 1 (Accent)"
        );
    }
}
