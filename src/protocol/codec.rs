//! Streaming Moppy frame parser.
//!
//! The parser pulls bytes from a [`ByteSource`] one at a time through the
//! header, then reads the whole body in one go once enough bytes are
//! buffered. It never blocks: when the source cannot satisfy the next step
//! it reports [`Progress::Stalled`] and keeps its position, so the host loop
//! can call it again later with more data available.
//!
//! ```text
//! AwaitStart ─▶ AwaitAddress ─▶ AwaitSubAddress ─▶ AwaitSize ─▶ AwaitBody ─▶ (frame)
//!     ▲              │                 │                            │          │
//!     └──────────────┴─────────────────┴────────────────────────────┴──────────┘
//!                        reject / oversize / complete
//! ```
//!
//! A rejected address resets to `AwaitStart` without skipping the rest of
//! that frame; its remaining bytes are rescanned for a start byte.

use log::{debug, trace};

use super::frame::{Message, Target};
use super::transport::ByteSource;
use crate::config::{ALL_DRIVES, DeviceConfig, HEADER_LEN, MAX_FRAME_LEN, START_BYTE, SYSTEM_ADDRESS};

/// Parser position within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Scanning for [`START_BYTE`].
    AwaitStart,
    AwaitAddress,
    AwaitSubAddress,
    AwaitSize,
    /// Header complete; waiting until `declared` body bytes are buffered.
    AwaitBody { declared: u8 },
}

/// Outcome of a single [`FrameParser::poll`].
#[derive(Debug, PartialEq, Eq)]
pub enum Progress<'a> {
    /// Nothing could be consumed; try again once more bytes arrive.
    Stalled,
    /// Input was consumed (or a frame discarded) but no frame completed.
    Advanced,
    /// A complete, validated frame with at least a command byte.
    Frame(Message<'a>),
}

/// Byte-level state machine for one serial link.
///
/// The scratch buffer mirrors the wire layout (header at `0..4`, body after)
/// and is reused for every frame. Bytes beyond the current frame are stale.
pub struct FrameParser {
    position: Position,
    scratch: [u8; MAX_FRAME_LEN],
    config: DeviceConfig,
}

impl FrameParser {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            position: Position::AwaitStart,
            scratch: [0; MAX_FRAME_LEN],
            config: config.clone(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Drop any partially received frame.
    pub fn reset(&mut self) {
        self.position = Position::AwaitStart;
    }

    /// Advance the state machine by one byte, or by one whole body.
    pub fn poll<S: ByteSource>(&mut self, source: &mut S) -> Progress<'_> {
        if let Position::AwaitBody { declared } = self.position {
            return self.poll_body(source, declared);
        }

        if source.bytes_available() == 0 {
            return Progress::Stalled;
        }

        let mut byte = [0u8; 1];
        if let Err(e) = source.read_exact(&mut byte) {
            trace!("codec: read failed in {:?}: {:?}", self.position, e);
            return Progress::Stalled;
        }

        self.advance(byte[0]);
        Progress::Advanced
    }

    fn advance(&mut self, byte: u8) {
        match self.position {
            Position::AwaitStart => {
                if byte == START_BYTE {
                    self.scratch[0] = byte;
                    self.position = Position::AwaitAddress;
                }
            }

            Position::AwaitAddress => {
                if byte == SYSTEM_ADDRESS || byte == self.config.device_address {
                    self.scratch[1] = byte;
                    self.position = Position::AwaitSubAddress;
                } else {
                    trace!("codec: frame for device 0x{:02X} ignored", byte);
                    self.reset();
                }
            }

            Position::AwaitSubAddress => {
                if byte == ALL_DRIVES || self.config.handles_drive(byte) {
                    self.scratch[2] = byte;
                    self.position = Position::AwaitSize;
                } else {
                    debug!("codec: sub-address {} out of range, resyncing", byte);
                    self.reset();
                }
            }

            Position::AwaitSize => {
                self.scratch[3] = byte;
                self.position = Position::AwaitBody { declared: byte };
            }

            // Body bytes are read in bulk by `poll_body`.
            Position::AwaitBody { .. } => {}
        }
    }

    fn poll_body<S: ByteSource>(&mut self, source: &mut S, declared: u8) -> Progress<'_> {
        let size = declared as usize;

        if declared > self.config.max_body_size || HEADER_LEN + size > self.scratch.len() {
            debug!("codec: declared body of {} bytes exceeds limit, dropping frame", size);
            self.reset();
            return Progress::Advanced;
        }

        if size == 0 {
            trace!("codec: empty body, no-op");
            self.reset();
            return Progress::Advanced;
        }

        if source.bytes_available() < size {
            return Progress::Stalled;
        }

        if let Err(e) = source.read_exact(&mut self.scratch[HEADER_LEN..HEADER_LEN + size]) {
            trace!("codec: body read failed: {:?}", e);
            return Progress::Stalled;
        }

        self.position = Position::AwaitStart;

        Progress::Frame(Message {
            target: Target::from_address(self.scratch[1]),
            sub_address: self.scratch[2],
            command: self.scratch[HEADER_LEN],
            payload: &self.scratch[HEADER_LEN + 1..HEADER_LEN + size],
        })
    }
}
