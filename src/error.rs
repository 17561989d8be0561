//! Error types for the floppyctl firmware.
//!
//! Framing problems on the wire are not errors: the parser recovers from
//! them locally. What remains is configuration and start-up failures, all
//! `Copy` so they can be logged and returned without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is inconsistent.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The device address collides with the broadcast address.
    BroadcastDeviceAddress,
    /// Drive 0 is the "all drives" sentinel and cannot be a real drive.
    ZeroMinDrive,
    /// `min_sub_address` is above `max_sub_address`.
    InvertedDriveRange { min: u8, max: u8 },
    /// More drives than the board has pins for.
    TooManyDrives { count: usize },
    /// Ping and pong share an opcode.
    OpcodeClash,
    /// The number of pin pairs supplied does not match the drive range.
    DriveCountMismatch { expected: usize, got: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BroadcastDeviceAddress => write!(f, "device address is the broadcast address"),
            Self::ZeroMinDrive => write!(f, "minimum drive sub-address must be at least 1"),
            Self::InvertedDriveRange { min, max } => {
                write!(f, "drive range inverted (min={min}, max={max})")
            }
            Self::TooManyDrives { count } => write!(f, "{count} drives exceeds board capacity"),
            Self::OpcodeClash => write!(f, "ping and pong opcodes are identical"),
            Self::DriveCountMismatch { expected, got } => {
                write!(f, "expected {expected} drive pin pairs, got {got}")
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
