//! Moppy frame layout and encoding.
//!
//! Wire format:
//! ```text
//! ┌───────┬─────────┬─────────────┬──────────┬─────────┬─────────────┐
//! │ START │ ADDRESS │ SUB_ADDRESS │ SIZE (N) │ COMMAND │ PAYLOAD     │
//! │ 0x4D  │ 0 = all │ 0 = all     │ 0..=255  │ 1 byte  │ N - 1 bytes │
//! └───────┴─────────┴─────────────┴──────────┴─────────┴─────────────┘
//! ```
//!
//! `SIZE` counts the command byte plus payload. Decoding lives in
//! [`super::codec`]; this module owns the decoded view and the encoder
//! used for replies and by host-side tooling.

use crate::config::{DeviceConfig, HEADER_LEN, START_BYTE, SYSTEM_ADDRESS};

/// Pong reply: header plus `[PONG, address, min_drive, max_drive]`.
pub const PONG_FRAME_LEN: usize = HEADER_LEN + 4;

/// Who a frame is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Broadcast to every device on the bus.
    System,
    /// One specific device.
    Device(u8),
}

impl Target {
    pub fn from_address(address: u8) -> Self {
        if address == SYSTEM_ADDRESS {
            Self::System
        } else {
            Self::Device(address)
        }
    }
}

/// A validated frame, borrowed from the parser's scratch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    pub target: Target,
    pub sub_address: u8,
    pub command: u8,
    pub payload: &'a [u8],
}

/// Encode one frame into `out`.
///
/// Returns the total number of bytes written, or `None` if the payload does
/// not fit in the size byte or `out` is too small.
pub fn encode_frame(
    address: u8,
    sub_address: u8,
    command: u8,
    payload: &[u8],
    out: &mut [u8],
) -> Option<usize> {
    let body_len = payload.len() + 1;
    let size = u8::try_from(body_len).ok()?;
    let total = HEADER_LEN + body_len;
    if total > out.len() {
        return None;
    }

    out[..HEADER_LEN].copy_from_slice(&[START_BYTE, address, sub_address, size]);
    out[HEADER_LEN] = command;
    out[HEADER_LEN + 1..total].copy_from_slice(payload);

    Some(total)
}

/// Build the pong reply advertising this device and its drive range.
pub fn pong_frame(config: &DeviceConfig) -> [u8; PONG_FRAME_LEN] {
    [
        START_BYTE,
        SYSTEM_ADDRESS,
        0x00,
        0x04,
        config.pong_opcode,
        config.device_address,
        config.min_sub_address,
        config.max_sub_address,
    ]
}
