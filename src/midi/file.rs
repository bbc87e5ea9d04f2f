// Standard MIDI File codec for drum patterns
// Export writes format 0 on the GM drum channel; import reads format 0/1
// and keeps going past anything it does not understand.

use super::MidiFileError;
use super::drum_map::{DRUM_CHANNEL, note_to_pad, pad_to_note};
use super::event::{MidiEvent, data_len};
use crate::sequencer::pattern::MAX_LENGTH_IN_BARS;
use crate::sequencer::{Pattern, PatternEvent, SymbolicTime, Tempo, TimeSignature};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Resolution of exported files
pub const TICKS_PER_QUARTER: u16 = 96;

/// Exported notes last one 16th minus a tick
const NOTE_LENGTH_TICKS: u32 = TICKS_PER_QUARTER as u32 / 4 - 1;
const EXPORT_VELOCITY: u8 = 100;

/// Longest variable-length quantity the format allows
const MAX_VLQ_BYTES: usize = 4;

/// Largest value a 4-byte variable-length quantity holds
const MAX_VLQ_VALUE: u32 = 0x0FFF_FFFF;

const HEADER_TAG: &[u8; 4] = b"MThd";
const TRACK_TAG: &[u8; 4] = b"MTrk";

/// Name given to patterns decoded without a file name
const DEFAULT_IMPORT_NAME: &str = "Imported";

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct NoteMessage {
    tick: u32,
    /// false sorts first: note-offs precede note-ons on the same tick
    on: bool,
    note: u8,
}

fn write_vlq(out: &mut Vec<u8>, value: u32) {
    let mut buffer = [0u8; 5];
    let mut index = buffer.len() - 1;
    let mut value = value;

    buffer[index] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        index -= 1;
        buffer[index] = ((value & 0x7F) as u8) | 0x80;
        value >>= 7;
    }

    out.extend_from_slice(&buffer[index..]);
}

/// Encode a pattern as a single-track Standard MIDI File
///
/// Pads without a GM note are dropped, as are events whose note-off tick
/// would not fit in a delta time.
pub fn encode(pattern: &Pattern) -> Vec<u8> {
    let time_signature = pattern.time_signature;
    let steps_per_bar = time_signature.steps_per_bar();
    let ticks_per_step = TICKS_PER_QUARTER as u32 / 4;

    let mut track = Vec::new();

    // Tempo: microseconds per quarter, 24 bits
    let us_per_quarter = (60_000_000.0 / pattern.tempo.bpm()).round().clamp(1.0, 0xFF_FFFF as f64) as u32;
    track.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03]);
    track.extend_from_slice(&us_per_quarter.to_be_bytes()[1..]);

    // Time signature: nn dd cc bb, with dd = log2(denominator)
    let exponent = time_signature.denominator().trailing_zeros() as u8;
    track.extend_from_slice(&[0x00, 0xFF, 0x58, 0x04]);
    track.extend_from_slice(&[time_signature.numerator(), exponent, 24, 8]);

    let mut messages = Vec::with_capacity(pattern.event_count() * 2);
    let mut dropped = 0usize;
    let mut out_of_range = 0usize;
    for event in pattern.events() {
        let Some(note) = pad_to_note(event.pad_id) else {
            dropped += 1;
            continue;
        };
        let tick = event
            .time
            .checked_step(steps_per_bar)
            .and_then(|step| step.checked_mul(ticks_per_step))
            .filter(|tick| {
                tick.checked_add(NOTE_LENGTH_TICKS)
                    .is_some_and(|off| off <= MAX_VLQ_VALUE)
            });
        let Some(tick) = tick else {
            out_of_range += 1;
            continue;
        };
        messages.push(NoteMessage { tick, on: true, note });
        messages.push(NoteMessage {
            tick: tick + NOTE_LENGTH_TICKS,
            on: false,
            note,
        });
    }
    if dropped > 0 {
        debug!("{} events on pads without a GM note were not exported", dropped);
    }
    if out_of_range > 0 {
        debug!("{} events past the last encodable tick were not exported", out_of_range);
    }
    messages.sort();

    let mut last_tick = 0;
    for message in &messages {
        write_vlq(&mut track, message.tick - last_tick);
        let event = if message.on {
            MidiEvent::NoteOn {
                channel: DRUM_CHANNEL,
                note: message.note,
                velocity: EXPORT_VELOCITY,
            }
        } else {
            MidiEvent::NoteOff {
                channel: DRUM_CHANNEL,
                note: message.note,
                velocity: 0,
            }
        };
        track.extend_from_slice(&event.to_bytes());
        last_tick = message.tick;
    }

    // End of track
    track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut file = Vec::with_capacity(22 + track.len());
    file.extend_from_slice(HEADER_TAG);
    file.extend_from_slice(&6u32.to_be_bytes());
    file.extend_from_slice(&0u16.to_be_bytes()); // format 0
    file.extend_from_slice(&1u16.to_be_bytes()); // one track
    file.extend_from_slice(&TICKS_PER_QUARTER.to_be_bytes());
    file.extend_from_slice(TRACK_TAG);
    file.extend_from_slice(&(track.len() as u32).to_be_bytes());
    file.extend_from_slice(&track);
    file
}

/// Write a pattern to a `.mid` file
pub fn export_file(path: impl AsRef<Path>, pattern: &Pattern) -> Result<(), MidiFileError> {
    let path = path.as_ref();
    fs::write(path, encode(pattern))?;
    info!("exported pattern '{}' to {}", pattern.name, path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let slice = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([slice[0], slice[1]]))
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Read a variable-length quantity, returning (value, bytes consumed)
fn read_vlq(bytes: &[u8], offset: usize) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for consumed in 0..MAX_VLQ_BYTES {
        let byte = *bytes.get(offset + consumed)?;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, consumed + 1));
        }
    }
    None
}

/// Tempo, meter and drum hits gathered across all tracks
struct ImportState {
    tempo: Tempo,
    time_signature: TimeSignature,
    /// (absolute tick, GM note)
    notes: Vec<(u64, u8)>,
}

impl ImportState {
    fn new() -> Self {
        Self {
            tempo: Tempo::default(),
            time_signature: TimeSignature::four_four(),
            notes: Vec::new(),
        }
    }

    fn meta(&mut self, kind: u8, payload: &[u8]) {
        match kind {
            0x51 if payload.len() == 3 => {
                let us_per_quarter = u32::from_be_bytes([0, payload[0], payload[1], payload[2]]);
                if us_per_quarter == 0 {
                    warn!("ignoring zero tempo meta-event");
                    return;
                }
                let bpm = (60_000_000.0 / us_per_quarter as f64).round();
                match Tempo::new(bpm) {
                    Ok(tempo) => self.tempo = tempo,
                    Err(e) => warn!("ignoring tempo meta-event: {}", e),
                }
            }
            0x58 if payload.len() >= 2 => {
                let denominator = 1u8.checked_shl(payload[1] as u32).unwrap_or(0);
                match TimeSignature::new(payload[0], denominator) {
                    Ok(time_signature) => self.time_signature = time_signature,
                    Err(e) => warn!("ignoring time signature meta-event: {}", e),
                }
            }
            _ => {}
        }
    }

    /// Walk one track's events, stopping quietly at the first truncation
    fn track(&mut self, data: &[u8]) {
        let mut cursor = 0usize;
        let mut tick = 0u64;
        let mut running_status: Option<u8> = None;

        while cursor < data.len() {
            let Some((delta, consumed)) = read_vlq(data, cursor) else {
                debug!("bad delta time at track offset {}, ending track", cursor);
                return;
            };
            cursor += consumed;
            tick += delta as u64;

            let Some(&status) = data.get(cursor) else {
                return;
            };

            match status {
                0xFF => {
                    let Some(&kind) = data.get(cursor + 1) else {
                        return;
                    };
                    let Some((length, consumed)) = read_vlq(data, cursor + 2) else {
                        return;
                    };
                    let start = cursor + 2 + consumed;
                    let end = start + length as usize;
                    let Some(payload) = data.get(start..end) else {
                        debug!("truncated meta-event at track offset {}", cursor);
                        return;
                    };
                    self.meta(kind, payload);
                    cursor = end;
                }
                0xF0 | 0xF7 => {
                    let Some((length, consumed)) = read_vlq(data, cursor + 1) else {
                        return;
                    };
                    cursor += 1 + consumed + length as usize;
                }
                _ => {
                    let status = if status & 0x80 != 0 {
                        running_status = Some(status);
                        cursor += 1;
                        status
                    } else if let Some(status) = running_status {
                        status
                    } else {
                        // Data byte with nothing to run on
                        cursor += 1;
                        continue;
                    };

                    let end = cursor + data_len(status);
                    let Some(body) = data.get(cursor..end) else {
                        return;
                    };

                    let mut message = [status, 0, 0];
                    message[1..1 + body.len()].copy_from_slice(body);
                    if let Some(MidiEvent::NoteOn {
                        channel: DRUM_CHANNEL,
                        note,
                        ..
                    }) = MidiEvent::from_bytes(&message[..1 + body.len()])
                    {
                        self.notes.push((tick, note));
                    }
                    cursor = end;
                }
            }
        }
    }

    /// Quantize collected hits to 16th steps
    fn into_pattern(self, ticks_per_quarter: u16, name: &str) -> Result<Pattern, MidiFileError> {
        let ticks_per_sixteenth = ticks_per_quarter as f64 / 4.0;
        let steps_per_bar = self.time_signature.steps_per_bar();

        let step_limit = MAX_LENGTH_IN_BARS as u64 * steps_per_bar as u64;

        let mut events = Vec::with_capacity(self.notes.len());
        let mut max_step = 0u64;
        let mut unmapped = 0usize;
        let mut too_late = 0usize;
        for (tick, note) in self.notes {
            let Some(pad_id) = note_to_pad(note) else {
                unmapped += 1;
                continue;
            };
            let step = (tick as f64 / ticks_per_sixteenth).round() as u64;
            if step >= step_limit {
                too_late += 1;
                continue;
            }
            max_step = max_step.max(step);
            events.push(PatternEvent::new(
                SymbolicTime::from_step(step as u32, steps_per_bar),
                pad_id,
            ));
        }
        if unmapped > 0 {
            debug!("{} notes without a pad were skipped", unmapped);
        }
        if too_late > 0 {
            debug!("{} notes past bar {} were skipped", too_late, MAX_LENGTH_IN_BARS);
        }

        let length_in_bars = (max_step + 1).div_ceil(steps_per_bar as u64) as u32;

        let mut pattern = Pattern::new(
            Uuid::new_v4().to_string(),
            name,
            self.tempo,
            self.time_signature,
            length_in_bars,
        )?;
        pattern.set_events(events);
        Ok(pattern)
    }
}

/// Decode a Standard MIDI File into a pattern named "Imported"
pub fn decode(bytes: &[u8]) -> Result<Pattern, MidiFileError> {
    decode_named(bytes, DEFAULT_IMPORT_NAME)
}

/// Decode a Standard MIDI File into a pattern
///
/// Collects note-ons on the GM drum channel from every track and maps
/// them back to pads. The pattern is named after `file_name` without its
/// `.mid`/`.midi` extension. Only a missing header or a format above 1 is
/// an error; anything else malformed is skipped.
pub fn decode_named(bytes: &[u8], file_name: &str) -> Result<Pattern, MidiFileError> {
    if bytes.get(..4) != Some(HEADER_TAG.as_slice()) {
        return Err(MidiFileError::MissingHeader);
    }
    let (Some(header_length), Some(format), Some(track_count), Some(division)) = (
        read_u32(bytes, 4),
        read_u16(bytes, 8),
        read_u16(bytes, 10),
        read_u16(bytes, 12),
    ) else {
        return Err(MidiFileError::MissingHeader);
    };

    if format > 1 {
        return Err(MidiFileError::UnsupportedFormat(format));
    }

    let ticks_per_quarter = if division == 0 || division & 0x8000 != 0 {
        warn!("unsupported time division {:#06x}, assuming {} ticks per quarter", division, TICKS_PER_QUARTER);
        TICKS_PER_QUARTER
    } else {
        division
    };

    let mut state = ImportState::new();
    let mut position = 8usize.saturating_add(header_length as usize);
    let mut tracks_read = 0u16;

    while tracks_read < track_count {
        let (Some(tag), Some(length)) = (bytes.get(position..position + 4), read_u32(bytes, position + 4)) else {
            break;
        };
        let start = position + 8;
        let end = start.saturating_add(length as usize);
        position = end;

        if tag != TRACK_TAG.as_slice() {
            debug!("skipping {:?} chunk", String::from_utf8_lossy(tag));
            continue;
        }
        tracks_read += 1;

        let data = &bytes[start.min(bytes.len())..end.min(bytes.len())];
        state.track(data);
    }

    if tracks_read < track_count {
        debug!("header announced {} tracks, found {}", track_count, tracks_read);
    }

    let name = strip_midi_extension(file_name);
    let pattern = state.into_pattern(ticks_per_quarter, name)?;
    info!(
        "imported '{}': {} events, {} bars at {}",
        pattern.name,
        pattern.event_count(),
        pattern.length_in_bars,
        pattern.tempo
    );
    Ok(pattern)
}

/// Read a `.mid` file, naming the pattern after the file
pub fn import_file(path: impl AsRef<Path>) -> Result<Pattern, MidiFileError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_IMPORT_NAME.to_string());
    decode_named(&bytes, &file_name)
}

fn strip_midi_extension(file_name: &str) -> &str {
    for extension in [".midi", ".mid"] {
        let Some(split) = file_name.len().checked_sub(extension.len()) else {
            continue;
        };
        if file_name.is_char_boundary(split) && file_name[split..].eq_ignore_ascii_case(extension) {
            return &file_name[..split];
        }
    }
    file_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pads::{HAT_1, KICK, SNARE_1};

    fn pattern_with(events: &[(SymbolicTime, u8)], time_signature: TimeSignature) -> Pattern {
        let mut pattern = Pattern::new(
            "p",
            "Pattern",
            Tempo::new(120.0).unwrap(),
            time_signature,
            1,
        )
        .unwrap();
        for &(time, pad) in events {
            pattern.add_event(time, pad);
        }
        pattern
    }

    fn track_body(bytes: &[u8]) -> &[u8] {
        &bytes[22..]
    }

    fn smf(format: u16, tracks: &[&[u8]]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&format.to_be_bytes());
        bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&96u16.to_be_bytes());
        for track in tracks {
            bytes.extend_from_slice(b"MTrk");
            bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
            bytes.extend_from_slice(track);
        }
        bytes
    }

    #[test]
    fn test_vlq() {
        let mut out = Vec::new();
        write_vlq(&mut out, 0);
        write_vlq(&mut out, 0x7F);
        write_vlq(&mut out, 0x80);
        write_vlq(&mut out, 0x0FFF_FFFF);
        assert_eq!(out, vec![0x00, 0x7F, 0x81, 0x00, 0xFF, 0xFF, 0xFF, 0x7F]);

        assert_eq!(read_vlq(&[0x81, 0x00], 0), Some((0x80, 2)));
        assert_eq!(read_vlq(&[0xFF, 0xFF, 0xFF, 0x7F], 0), Some((0x0FFF_FFFF, 4)));
        assert_eq!(read_vlq(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F], 0), None);
        assert_eq!(read_vlq(&[0x81], 0), None);
    }

    #[test]
    fn test_encode_layout() {
        let pattern = pattern_with(&[(SymbolicTime::zero(), KICK)], TimeSignature::four_four());
        let bytes = encode(&pattern);

        assert_eq!(&bytes[..4], b"MThd");
        assert_eq!(&bytes[8..14], &[0, 0, 0, 1, 0, 96]);
        assert_eq!(&bytes[14..18], b"MTrk");

        let track = track_body(&bytes);
        #[rustfmt::skip]
        let expected = [
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 500000 us per quarter
            0x00, 0xFF, 0x58, 0x04, 4, 2, 24, 8,
            0x00, 0x99, 36, 100,
            23, 0x89, 36, 0,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        assert_eq!(track, &expected);
        assert_eq!(read_u32(&bytes, 18), Some(expected.len() as u32));
    }

    #[test]
    fn test_encode_orders_off_before_on() {
        // Same-tick messages of one kind sort by note number
        let pattern = pattern_with(
            &[(SymbolicTime::zero(), SNARE_1), (SymbolicTime::zero(), KICK)],
            TimeSignature::four_four(),
        );
        let track = track_body(&encode(&pattern)).to_vec();
        let notes = &track[15..track.len() - 4];
        assert_eq!(
            notes,
            &[0x00, 0x99, 36, 100, 0x00, 0x99, 38, 100, 23, 0x89, 36, 0, 0x00, 0x89, 38, 0]
        );
    }

    #[test]
    fn test_encode_drops_unmapped_pads() {
        let pattern = pattern_with(&[(SymbolicTime::zero(), 3)], TimeSignature::four_four());
        let decoded = decode(&encode(&pattern)).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_round_trip_odd_meter() {
        let seven_eight = TimeSignature::new(7, 8).unwrap();
        let pattern = pattern_with(
            &[
                (SymbolicTime::zero(), KICK),
                (SymbolicTime::new(0, 3, 1), HAT_1),
                (SymbolicTime::new(1, 0, 2), SNARE_1),
            ],
            seven_eight,
        );

        let decoded = decode_named(&encode(&pattern), "groove.MID").unwrap();
        assert_eq!(decoded.name, "groove");
        assert_eq!(decoded.time_signature, seven_eight);
        assert_eq!(decoded.tempo.bpm(), 120.0);
        assert_eq!(decoded.length_in_bars, 2);
        assert_eq!(decoded.category, "custom");
        assert_eq!(decoded.difficulty, 1);

        let mut events = decoded.events().to_vec();
        events.sort();
        assert_eq!(
            events,
            vec![
                PatternEvent::new(SymbolicTime::zero(), 2), // kick folds onto Bass Kick
                PatternEvent::new(SymbolicTime::new(0, 3, 1), HAT_1),
                PatternEvent::new(SymbolicTime::new(1, 0, 2), SNARE_1),
            ]
        );
        assert!(Uuid::parse_str(&decoded.id).is_ok());
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(decode(b"RIFF0000"), Err(MidiFileError::MissingHeader)));
        assert!(matches!(decode(b"MThd\0\0"), Err(MidiFileError::MissingHeader)));
        assert!(matches!(decode(&[]), Err(MidiFileError::MissingHeader)));
    }

    #[test]
    fn test_unsupported_format() {
        let bytes = smf(2, &[&[0x00, 0xFF, 0x2F, 0x00]]);
        assert!(matches!(decode(&bytes), Err(MidiFileError::UnsupportedFormat(2))));
    }

    #[test]
    fn test_running_status_and_sysex() {
        #[rustfmt::skip]
        let track: &[u8] = &[
            0x00, 0xF0, 0x03, 0x7E, 0x7F, 0xF7,  // sysex, skipped
            0x00, 0x99, 36, 100,                 // kick
            0x18, 38, 90,                        // running status: snare at tick 24
            0x18, 38, 0,                         // velocity 0 is a note-off
            0x00, 0xC9, 5,                       // program change, one data byte
            0x18, 0x99, 42, 80,                  // hat at tick 72
            0x00, 0x90, 38, 100,                 // channel 1, ignored
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let pattern = decode(&smf(0, &[track])).unwrap();

        let steps: Vec<(u32, u8)> = pattern
            .events()
            .iter()
            .map(|e| (e.time.to_step(16), e.pad_id))
            .collect();
        assert_eq!(steps, vec![(0, 2), (1, SNARE_1), (3, HAT_1)]);
    }

    #[test]
    fn test_multi_track_last_tempo_wins() {
        let conductor: &[u8] = &[
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120
            0x00, 0xFF, 0x58, 0x04, 3, 2, 24, 8,      // 3/4
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let drums: &[u8] = &[
            0x00, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0, // 100
            0x00, 0x99, 46, 100,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let pattern = decode(&smf(1, &[conductor, drums])).unwrap();

        assert_eq!(pattern.tempo.bpm(), 100.0);
        assert_eq!(pattern.time_signature, TimeSignature::three_four());
        assert_eq!(pattern.event_count(), 1);
    }

    #[test]
    fn test_alien_chunks_and_truncation_are_skipped() {
        let mut bytes = smf(0, &[]);
        bytes[11] = 1; // one track announced
        bytes.extend_from_slice(b"XFIH");
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&100u32.to_be_bytes()); // longer than what follows
        bytes.extend_from_slice(&[0x00, 0x99, 42, 100, 0x00, 0x99]);

        let pattern = decode(&bytes).unwrap();
        assert_eq!(pattern.event_count(), 1);
        assert_eq!(pattern.events()[0].pad_id, HAT_1);
    }

    #[test]
    fn test_encode_skips_events_past_tick_range() {
        let pattern = pattern_with(
            &[
                (SymbolicTime::parse("300000000:0:0"), SNARE_1),
                (SymbolicTime::new(0, 1, 0), KICK),
            ],
            TimeSignature::four_four(),
        );
        let decoded = decode(&encode(&pattern)).unwrap();

        assert_eq!(decoded.event_count(), 1);
        assert_eq!(decoded.events()[0].pad_id, KICK);
        assert_eq!(decoded.events()[0].time, SymbolicTime::new(0, 1, 0));
        assert_eq!(decoded.length_in_bars, 1);
    }

    #[test]
    fn test_decode_drops_notes_past_length_limit() {
        #[rustfmt::skip]
        let track = [
            0x00, 0x99, 36, 100,
            0xFF, 0xFF, 0xFF, 0x7F, 0x99, 38, 100,
        ];
        let pattern = decode(&smf(0, &[&track[..]])).unwrap();

        assert_eq!(pattern.event_count(), 1);
        assert_eq!(pattern.events()[0].pad_id, KICK);
        assert_eq!(pattern.length_in_bars, 1);

        // Last step of the longest pattern still fits
        let last_tick = (MAX_LENGTH_IN_BARS * 16 - 1) * 24;
        let mut track = Vec::new();
        write_vlq(&mut track, last_tick);
        track.extend_from_slice(&[0x99, 38, 100]);
        let pattern = decode(&smf(0, &[track.as_slice()])).unwrap();
        assert_eq!(pattern.event_count(), 1);
        assert_eq!(pattern.length_in_bars, MAX_LENGTH_IN_BARS);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_midi_extension("beat.mid"), "beat");
        assert_eq!(strip_midi_extension("beat.MIDI"), "beat");
        assert_eq!(strip_midi_extension("beat.mid.txt"), "beat.mid.txt");
        assert_eq!(strip_midi_extension(".mid"), "");
    }
}
