//! Device configuration and protocol constants
//!
//! Identity (bus address, drive range) and the Moppy wire constants shared
//! by the parser, dispatcher and instrument. The defaults describe a single
//! eight-drive device at address 0x01.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Every frame begins with this byte (ASCII 'M').
pub const START_BYTE: u8 = 0x4D;

/// Broadcast address: frames sent here reach every device on the bus.
pub const SYSTEM_ADDRESS: u8 = 0x00;

/// Sub-address meaning "every drive on this device".
pub const ALL_DRIVES: u8 = 0x00;

/// START, ADDRESS, SUB_ADDRESS, BODY_SIZE.
pub const HEADER_LEN: usize = 4;

/// Largest body the size byte can declare.
pub const MAX_BODY_LEN: usize = u8::MAX as usize;

/// Header plus the largest declarable body.
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_BODY_LEN;

// ---------------------------------------------------------------------------
// System commands (address 0x00)
// ---------------------------------------------------------------------------

pub const CMD_PING: u8 = 0x80;
pub const CMD_PONG: u8 = 0x81;
pub const CMD_SEQUENCE_START: u8 = 0xFA;
pub const CMD_SEQUENCE_STOP: u8 = 0xFC;
pub const CMD_RESET: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Device commands (address = this device)
// ---------------------------------------------------------------------------

pub const DEV_CMD_RESET: u8 = 0x00;
pub const DEV_CMD_NOTE_OFF: u8 = 0x08;
/// Payload: `[midi_note]`.
pub const DEV_CMD_NOTE_ON: u8 = 0x09;
/// Payload: `[bend_msb, bend_lsb]`, centre 8192.
pub const DEV_CMD_BEND_PITCH: u8 = 0x0E;

// ---------------------------------------------------------------------------
// Hardware
// ---------------------------------------------------------------------------

/// Serial link speed used by every Moppy controller.
pub const SERIAL_BAUD_RATE: u32 = 57_600;

/// Period of the instrument tick, in microseconds.
/// The note tables in [`crate::notes`] are computed against this value.
pub const TIMER_RESOLUTION_US: u64 = 40;

/// Upper bound on drives one device can drive (two pins each).
pub const MAX_DRIVES: usize = 8;

/// Furthest head position of a 3.5" drive before it bounces back.
pub const MAX_POSITION: u8 = 158;

/// Device identity and protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// This device's bus address (never [`SYSTEM_ADDRESS`]).
    pub device_address: u8,
    /// First drive sub-address this device answers for.
    pub min_sub_address: u8,
    /// Last drive sub-address this device answers for.
    pub max_sub_address: u8,
    /// Broadcast opcode that elicits a pong.
    pub ping_opcode: u8,
    /// Opcode placed in the pong reply.
    pub pong_opcode: u8,
    /// Frames declaring a larger body are dropped.
    pub max_body_size: u8,
    /// Play a short note on each drive in turn at boot.
    #[serde(default)]
    pub play_startup_sound: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_address: 0x01,
            min_sub_address: 1,
            max_sub_address: 8,
            ping_opcode: CMD_PING,
            pong_opcode: CMD_PONG,
            max_body_size: u8::MAX,
            play_startup_sound: false,
        }
    }
}

impl DeviceConfig {
    /// Number of drives in `min_sub_address..=max_sub_address`.
    pub fn drive_count(&self) -> usize {
        if self.max_sub_address < self.min_sub_address {
            return 0;
        }
        (self.max_sub_address - self.min_sub_address) as usize + 1
    }

    /// Whether `sub` is a drive sub-address handled here.
    pub fn handles_drive(&self, sub: u8) -> bool {
        (self.min_sub_address..=self.max_sub_address).contains(&sub)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_address == SYSTEM_ADDRESS {
            return Err(ConfigError::BroadcastDeviceAddress);
        }
        if self.min_sub_address == ALL_DRIVES {
            return Err(ConfigError::ZeroMinDrive);
        }
        if self.min_sub_address > self.max_sub_address {
            return Err(ConfigError::InvertedDriveRange {
                min: self.min_sub_address,
                max: self.max_sub_address,
            });
        }
        if self.drive_count() > MAX_DRIVES {
            return Err(ConfigError::TooManyDrives {
                count: self.drive_count(),
            });
        }
        if self.ping_opcode == self.pong_opcode {
            return Err(ConfigError::OpcodeClash);
        }
        Ok(())
    }
}
