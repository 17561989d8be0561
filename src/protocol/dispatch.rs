//! Frame dispatcher — answers pings itself, forwards everything else.

use log::warn;

use super::frame::{Message, PONG_FRAME_LEN, Target, pong_frame};
use super::transport::ByteSource;
use crate::app::ports::MessageConsumer;
use crate::config::DeviceConfig;

pub struct Dispatcher {
    ping_opcode: u8,
    pong: [u8; PONG_FRAME_LEN],
}

impl Dispatcher {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            ping_opcode: config.ping_opcode,
            pong: pong_frame(config),
        }
    }

    /// The pre-built reply sent for every broadcast ping.
    pub fn pong(&self) -> &[u8; PONG_FRAME_LEN] {
        &self.pong
    }

    /// Answer a broadcast ping with the pong frame, or hand the message to
    /// the consumer.
    pub fn dispatch<S, C>(&self, message: &Message<'_>, sink: &mut S, consumer: &mut C)
    where
        S: ByteSource,
        C: MessageConsumer + ?Sized,
    {
        match message.target {
            Target::System if message.command == self.ping_opcode => {
                if let Err(e) = sink.write(&self.pong) {
                    warn!("dispatch: pong write failed: {:?}", e);
                }
            }
            Target::System => consumer.handle_system_message(message.command, message.payload),
            Target::Device(_) => {
                consumer.handle_device_message(message.sub_address, message.command, message.payload);
            }
        }
    }
}
