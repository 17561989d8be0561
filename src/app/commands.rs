//! Typed views of the raw opcodes carried by Moppy messages.
//!
//! The protocol core forwards `(command, payload)` untouched; instruments
//! decode them here before acting.

use crate::config::{
    CMD_RESET, CMD_SEQUENCE_START, CMD_SEQUENCE_STOP, DEV_CMD_BEND_PITCH, DEV_CMD_NOTE_OFF,
    DEV_CMD_NOTE_ON, DEV_CMD_RESET,
};

/// Pitch-bend value meaning "no bend".
pub const BEND_CENTRE: u16 = 8192;

/// Broadcast commands that apply to every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    /// Playback is about to begin.
    SequenceStart,
    /// Playback stopped; silence everything.
    SequenceStop,
    /// Return every drive to its initial state.
    Reset,
    /// Opcode this firmware does not act on.
    Other(u8),
}

impl SystemCommand {
    pub fn parse(command: u8, _payload: &[u8]) -> Self {
        match command {
            CMD_SEQUENCE_START => Self::SequenceStart,
            CMD_SEQUENCE_STOP => Self::SequenceStop,
            CMD_RESET => Self::Reset,
            other => Self::Other(other),
        }
    }
}

/// Commands addressed to one drive (or all drives) of this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    Reset,
    NoteOff,
    /// Start playing a MIDI note.
    NoteOn { note: u8 },
    /// 14-bit bend, [`BEND_CENTRE`] = unbent.
    BendPitch { value: u16 },
    /// Known opcode whose payload is too short.
    Malformed(u8),
    Other(u8),
}

impl DeviceCommand {
    pub fn parse(command: u8, payload: &[u8]) -> Self {
        match (command, payload) {
            (DEV_CMD_RESET, _) => Self::Reset,
            (DEV_CMD_NOTE_OFF, _) => Self::NoteOff,
            (DEV_CMD_NOTE_ON, [note, ..]) => Self::NoteOn { note: *note },
            (DEV_CMD_BEND_PITCH, [msb, lsb, ..]) => Self::BendPitch {
                value: u16::from_be_bytes([*msb, *lsb]),
            },
            (DEV_CMD_NOTE_ON | DEV_CMD_BEND_PITCH, _) => Self::Malformed(command),
            (other, _) => Self::Other(other),
        }
    }
}
