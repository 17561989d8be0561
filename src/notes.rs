//! Pre-computed MIDI note timing tables.
//!
//! Lookup tables avoid floating-point work in the tick path. Both tables
//! are indexed by MIDI note number (0–127).

use crate::config::TIMER_RESOLUTION_US;

/// Number of MIDI notes.
pub const NOTE_COUNT: usize = 128;

/// Full period of each note in microseconds:
/// `1_000_000 / (440 * 2^((note - 69) / 12))`.
#[rustfmt::skip]
pub const NOTE_PERIODS_US: [u32; NOTE_COUNT] = [
    // C-1 .. B-1
    122312, 115447, 108968, 102852, 97079, 91631, 86488, 81634, 77052, 72727, 68645, 64793,
    // C0 .. B0
    61156, 57724, 54484, 51426, 48540, 45815, 43244, 40817, 38526, 36364, 34323, 32396,
    // C1 .. B1
    30578, 28862, 27242, 25713, 24270, 22908, 21622, 20408, 19263, 18182, 17161, 16198,
    // C2 .. B2
    15289, 14431, 13621, 12856, 12135, 11454, 10811, 10204, 9631, 9091, 8581, 8099,
    // C3 .. B3
    7645, 7215, 6810, 6428, 6067, 5727, 5405, 5102, 4816, 4545, 4290, 4050,
    // C4 .. B4 (middle C = 60)
    3822, 3608, 3405, 3214, 3034, 2863, 2703, 2551, 2408, 2273, 2145, 2025,
    // C5 .. B5
    1911, 1804, 1703, 1607, 1517, 1432, 1351, 1276, 1204, 1136, 1073, 1012,
    // C6 .. B6
    956, 902, 851, 804, 758, 716, 676, 638, 602, 568, 536, 506,
    // C7 .. B7
    478, 451, 426, 402, 379, 358, 338, 319, 301, 284, 268, 253,
    // C8 .. B8
    239, 225, 213, 201, 190, 179, 169, 159, 150, 142, 134, 127,
    // C9 .. G9
    119, 113, 106, 100, 95, 89, 84, 80,
];

/// Timer ticks between step-pin toggles for each note, at
/// [`TIMER_RESOLUTION_US`] per tick. A4 (69) toggles every 57 ticks.
#[rustfmt::skip]
pub const NOTE_DOUBLE_TICKS: [u16; NOTE_COUNT] = [
    // C-1 .. B-1: far below what a drive can voice
    3058, 2886, 2724, 2571, 2427, 2291, 2162, 2041, 1926, 1818, 1716, 1620,
    1529, 1443, 1362, 1286, 1214, 1145, 1081, 1020, 963, 909, 858, 810,
    764, 722, 681, 643, 607, 573, 541, 510, 482, 455, 429, 405,
    382, 361, 341, 321, 303, 286, 270, 255, 241, 227, 215, 202,
    191, 180, 170, 161, 152, 143, 135, 128, 120, 114, 107, 101,
    // C4 .. B4: the drives' sweet spot
    96, 90, 85, 80, 76, 72, 68, 64, 60, 57, 54, 51,
    48, 45, 43, 40, 38, 36, 34, 32, 30, 28, 27, 25,
    24, 23, 21, 20, 19, 18, 17, 16, 15, 14, 13, 13,
    12, 11, 11, 10, 9, 9, 8, 8, 8, 7, 7, 6,
    6, 6, 5, 5, 5, 4, 4, 4, 4, 4, 3, 3,
    3, 3, 3, 3, 2, 2, 2, 2,
];

/// Half-period of `note` in timer ticks, or `None` for notes above 127.
pub fn double_ticks(note: u8) -> Option<u16> {
    NOTE_DOUBLE_TICKS.get(note as usize).copied()
}

/// Nominal frequency of `note` in millihertz, derived from the period table.
pub fn frequency_mhz(note: u8) -> Option<u32> {
    let period = *NOTE_PERIODS_US.get(note as usize)?;
    Some(1_000_000_000 / period)
}

const _: () = assert!(TIMER_RESOLUTION_US == 40, "note tables assume 40 µs ticks");
