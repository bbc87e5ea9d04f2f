// MIDI channel voice messages

/// Channel voice message (channel 0-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    PolyPressure { channel: u8, note: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, value: i16 },
}

/// Number of data bytes following a channel status byte
/// Program change and channel pressure carry one, everything else two.
pub fn data_len(status: u8) -> usize {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

impl MidiEvent {
    /// Parse a raw channel message
    /// Note On with velocity 0 is a Note Off.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if !(0x80..0xF0).contains(&status) || data.len() < data_len(status) {
            return None;
        }

        let channel = status & 0x0F;
        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                note: data[0],
                velocity: data[1],
            },
            0x90 if data[1] == 0 => MidiEvent::NoteOff {
                channel,
                note: data[0],
                velocity: 0,
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                note: data[0],
                velocity: data[1],
            },
            0xA0 => MidiEvent::PolyPressure {
                channel,
                note: data[0],
                pressure: data[1],
            },
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: data[0],
                value: data[1],
            },
            0xC0 => MidiEvent::ProgramChange {
                channel,
                program: data[0],
            },
            0xD0 => MidiEvent::ChannelPressure {
                channel,
                pressure: data[0],
            },
            // 0xE0
            _ => {
                let lsb = data[0] as i16;
                let msb = data[1] as i16;
                MidiEvent::PitchBend {
                    channel,
                    value: (msb << 7) | lsb,
                }
            }
        };

        Some(event)
    }

    /// Encode as a status byte plus data bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiEvent::NoteOn { channel, note, velocity } => vec![0x90 | channel, note, velocity],
            MidiEvent::NoteOff { channel, note, velocity } => vec![0x80 | channel, note, velocity],
            MidiEvent::PolyPressure { channel, note, pressure } => {
                vec![0xA0 | channel, note, pressure]
            }
            MidiEvent::ControlChange { channel, controller, value } => {
                vec![0xB0 | channel, controller, value]
            }
            MidiEvent::ProgramChange { channel, program } => vec![0xC0 | channel, program],
            MidiEvent::ChannelPressure { channel, pressure } => vec![0xD0 | channel, pressure],
            MidiEvent::PitchBend { channel, value } => {
                vec![0xE0 | channel, (value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
            }
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::PolyPressure { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::ChannelPressure { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => channel,
        }
    }
}
