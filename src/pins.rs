//! GPIO assignments for the drive header.
//!
//! Each drive uses two consecutive outputs: STEP then DIRECTION, starting
//! at [`FIRST_PIN`]. Drive `n` (1-based) therefore maps to
//! `FIRST_PIN + (n - 1) * 2` and the pin after it.

use crate::config::MAX_DRIVES;

/// First GPIO of the drive header (drive 1 STEP).
pub const FIRST_PIN: i32 = 2;

/// STEP and DIRECTION GPIO numbers of one drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrivePins {
    pub step: i32,
    pub direction: i32,
}

/// Pin pair for 1-based drive index `drive`, or `None` outside the header.
pub const fn drive_pins(drive: u8) -> Option<DrivePins> {
    if drive == 0 || drive as usize > MAX_DRIVES {
        return None;
    }
    let step = FIRST_PIN + (drive as i32 - 1) * 2;
    Some(DrivePins {
        step,
        direction: step + 1,
    })
}
