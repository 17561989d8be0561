//! Serial handler — the parser and dispatcher driven from the main loop.

use super::codec::{FrameParser, Position, Progress};
use super::dispatch::Dispatcher;
use super::transport::ByteSource;
use crate::app::ports::MessageConsumer;
use crate::config::DeviceConfig;
use crate::error::Result;

/// Protocol engine for one serial link.
///
/// Holds exactly one in-flight frame. Create it once at start-up and call
/// [`drain_messages`](Self::drain_messages) from the host loop as often as
/// convenient.
pub struct SerialHandler {
    parser: FrameParser,
    dispatcher: Dispatcher,
}

impl SerialHandler {
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: FrameParser::new(config),
            dispatcher: Dispatcher::new(config),
        })
    }

    /// Process everything the source can deliver right now.
    ///
    /// Frames are dispatched in wire order. Returns the number of frames
    /// handed off (pongs plus consumer calls); returns as soon as the source
    /// cannot supply the next byte or the rest of a pending body.
    pub fn drain_messages<S, C>(&mut self, source: &mut S, consumer: &mut C) -> usize
    where
        S: ByteSource,
        C: MessageConsumer + ?Sized,
    {
        let mut dispatched = 0;
        loop {
            match self.parser.poll(source) {
                Progress::Stalled => return dispatched,
                Progress::Advanced => {}
                Progress::Frame(message) => {
                    self.dispatcher.dispatch(&message, source, consumer);
                    dispatched += 1;
                }
            }
        }
    }

    pub fn position(&self) -> Position {
        self.parser.position()
    }

    /// Drop any partially received frame (e.g. after reopening the port).
    pub fn reset(&mut self) {
        self.parser.reset();
    }
}
