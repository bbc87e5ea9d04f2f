// Built-in practice patterns

use super::SequencerError;
use super::pattern::Pattern;
use super::timeline::{SymbolicTime, Tempo, TimeSignature};
use crate::pads::{HAT_1, HAT_2, KICK, PadId, SNARE_1, SNARE_2};

struct PatternDef {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    bpm: f64,
    length_in_bars: u32,
    difficulty: u8,
    events: &'static [(&'static str, PadId)],
}

const BASIC_ROCK: PatternDef = PatternDef {
    id: "basic-rock",
    name: "Basic Rock Beat",
    category: "rock",
    bpm: 100.0,
    length_in_bars: 1,
    difficulty: 1,
    events: &[
        ("0:0:0", KICK),
        ("0:0:0", HAT_1),
        ("0:0:2", HAT_1),
        ("0:1:0", SNARE_1),
        ("0:1:0", HAT_1),
        ("0:1:2", HAT_1),
        ("0:2:0", KICK),
        ("0:2:0", HAT_1),
        ("0:2:2", HAT_1),
        ("0:3:0", SNARE_1),
        ("0:3:0", HAT_1),
        ("0:3:2", HAT_1),
    ],
};

const BOOM_BAP: PatternDef = PatternDef {
    id: "boom-bap",
    name: "Boom Bap",
    category: "hip-hop",
    bpm: 90.0,
    length_in_bars: 1,
    difficulty: 2,
    events: &[
        ("0:0:0", KICK),
        ("0:0:0", HAT_1),
        ("0:0:2", HAT_1),
        ("0:1:0", SNARE_1),
        ("0:1:0", HAT_1),
        ("0:1:2", HAT_1),
        ("0:2:0", HAT_1),
        ("0:2:2", KICK),
        ("0:2:2", HAT_1),
        ("0:3:0", SNARE_1),
        ("0:3:0", HAT_1),
        ("0:3:2", HAT_1),
    ],
};

const TRAP_HIHATS: PatternDef = PatternDef {
    id: "trap-hihats",
    name: "Trap Hi-Hats",
    category: "trap",
    bpm: 140.0,
    length_in_bars: 1,
    difficulty: 3,
    events: &[
        ("0:0:0", KICK),
        ("0:2:2", KICK),
        ("0:1:0", SNARE_1),
        ("0:3:0", SNARE_1),
        ("0:0:0", HAT_1),
        ("0:0:1", HAT_1),
        ("0:0:2", HAT_1),
        ("0:0:3", HAT_1),
        ("0:1:0", HAT_1),
        ("0:1:1", HAT_1),
        ("0:1:2", HAT_1),
        ("0:1:3", HAT_1),
        ("0:2:0", HAT_1),
        ("0:2:1", HAT_1),
        ("0:2:2", HAT_1),
        ("0:2:3", HAT_1),
        ("0:3:0", HAT_1),
        ("0:3:1", HAT_1),
        ("0:3:2", HAT_1),
        ("0:3:3", HAT_1),
        ("0:1:2", HAT_2),
        ("0:3:2", HAT_2),
    ],
};

const FOUR_ON_THE_FLOOR: PatternDef = PatternDef {
    id: "four-on-floor",
    name: "Four on the Floor",
    category: "house",
    bpm: 120.0,
    length_in_bars: 1,
    difficulty: 1,
    events: &[
        ("0:0:0", KICK),
        ("0:1:0", KICK),
        ("0:2:0", KICK),
        ("0:3:0", KICK),
        ("0:0:2", HAT_1),
        ("0:1:2", HAT_1),
        ("0:2:2", HAT_1),
        ("0:3:2", HAT_1),
        ("0:1:0", SNARE_1),
        ("0:3:0", SNARE_1),
    ],
};

const BOSSA_NOVA: PatternDef = PatternDef {
    id: "bossa-nova",
    name: "Bossa Nova",
    category: "latin",
    bpm: 110.0,
    length_in_bars: 2,
    difficulty: 3,
    events: &[
        ("0:0:0", KICK),
        ("0:0:0", HAT_1),
        ("0:0:2", HAT_1),
        ("0:1:0", SNARE_2),
        ("0:1:0", HAT_1),
        ("0:1:2", HAT_1),
        ("0:2:0", HAT_1),
        ("0:2:2", KICK),
        ("0:2:2", HAT_1),
        ("0:3:0", SNARE_2),
        ("0:3:0", HAT_1),
        ("0:3:2", HAT_1),
        ("1:0:0", KICK),
        ("1:0:0", HAT_1),
        ("1:0:2", HAT_1),
        ("1:1:0", SNARE_2),
        ("1:1:0", HAT_1),
        ("1:1:2", HAT_1),
        ("1:2:0", KICK),
        ("1:2:0", HAT_1),
        ("1:2:2", HAT_1),
        ("1:3:0", SNARE_2),
        ("1:3:0", HAT_1),
        ("1:3:2", HAT_1),
    ],
};

const SHUFFLE: PatternDef = PatternDef {
    id: "shuffle",
    name: "Shuffle",
    category: "blues",
    bpm: 95.0,
    length_in_bars: 1,
    difficulty: 2,
    events: &[
        ("0:0:0", KICK),
        ("0:0:0", HAT_1),
        ("0:0:3", HAT_1),
        ("0:1:0", SNARE_1),
        ("0:1:0", HAT_1),
        ("0:1:3", HAT_1),
        ("0:2:0", KICK),
        ("0:2:0", HAT_1),
        ("0:2:3", HAT_1),
        ("0:3:0", SNARE_1),
        ("0:3:0", HAT_1),
        ("0:3:3", HAT_1),
    ],
};

const HALF_TIME: PatternDef = PatternDef {
    id: "half-time",
    name: "Half-Time",
    category: "rock",
    bpm: 85.0,
    length_in_bars: 1,
    difficulty: 1,
    events: &[
        ("0:0:0", KICK),
        ("0:0:0", HAT_1),
        ("0:0:2", HAT_1),
        ("0:1:0", HAT_1),
        ("0:1:2", HAT_1),
        ("0:2:0", SNARE_1),
        ("0:2:0", HAT_1),
        ("0:2:2", HAT_1),
        ("0:3:0", HAT_1),
        ("0:3:2", HAT_1),
    ],
};

const LIBRARY: [PatternDef; 7] = [
    BASIC_ROCK,
    BOOM_BAP,
    TRAP_HIHATS,
    FOUR_ON_THE_FLOOR,
    BOSSA_NOVA,
    SHUFFLE,
    HALF_TIME,
];

impl PatternDef {
    fn build(&self) -> Result<Pattern, SequencerError> {
        let mut pattern = Pattern::new(
            self.id,
            self.name,
            Tempo::new(self.bpm)?,
            TimeSignature::four_four(),
            self.length_in_bars,
        )?
        .with_category(self.category)
        .with_difficulty(self.difficulty)?;

        for (time, pad_id) in self.events {
            pattern.add_event(SymbolicTime::parse(time), *pad_id);
        }
        Ok(pattern)
    }
}

/// All built-in patterns
pub fn default_patterns() -> Vec<Pattern> {
    LIBRARY.iter().filter_map(|def| def.build().ok()).collect()
}

/// Look up a built-in pattern by id
pub fn find_pattern(id: &str) -> Option<Pattern> {
    LIBRARY
        .iter()
        .find(|def| def.id == id)
        .and_then(|def| def.build().ok())
}
