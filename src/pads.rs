// Pad table - identifiers and names of the 16 drum pads

/// Pad identifier (0-15 on the 4x4 grid, row 0 = bottom)
/// Patterns may carry any id in 0-255; only 0-15 map to a pad.
pub type PadId = u8;

/// Number of pads on the grid
pub const PAD_COUNT: usize = 16;

pub const BASS_KICK_3: PadId = 0;
pub const BASS_KICK_2: PadId = 1;
pub const BASS_KICK: PadId = 2;
pub const KICK: PadId = 6;
pub const GHOST_SNARE: PadId = 7;
pub const SNARE_2: PadId = 9;
pub const HAT_1: PadId = 10;
pub const SNARE_1: PadId = 11;
pub const HAT_2: PadId = 14;
pub const HAT_3: PadId = 15;

/// Pads backed by a sample, in editor row order (hats top, kicks bottom)
pub const ACTIVE_PAD_IDS: [PadId; 10] = [
    HAT_3,
    HAT_2,
    HAT_1,
    GHOST_SNARE,
    SNARE_1,
    SNARE_2,
    KICK,
    BASS_KICK,
    BASS_KICK_2,
    BASS_KICK_3,
];

const PAD_NAMES: [&str; PAD_COUNT] = [
    "Bass Kick 3",
    "Bass Kick 2",
    "Bass Kick",
    "Rim",
    "Tom Low",
    "Tom Mid",
    "Kick",
    "Ghost Snare",
    "Snap",
    "Snare 2",
    "Hat 1",
    "Snare 1",
    "Cowbell",
    "Ride",
    "Hat 2",
    "Hat 3",
];

/// Display name of a pad
pub fn pad_name(pad_id: PadId) -> Option<&'static str> {
    PAD_NAMES.get(pad_id as usize).copied()
}

/// Whether a pad has a sample loaded
pub fn is_active(pad_id: PadId) -> bool {
    ACTIVE_PAD_IDS.contains(&pad_id)
}
