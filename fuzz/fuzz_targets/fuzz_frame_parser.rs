//! Fuzz target: `SerialHandler::drain_messages`
//!
//! Drives arbitrary byte sequences through the Moppy parser, split at a
//! fuzzer-chosen point, and asserts that it never panics, never hands out
//! payloads larger than a frame can carry, and always comes to rest.
//!
//! cargo fuzz run fuzz_frame_parser

#![no_main]

use std::collections::VecDeque;

use floppyctl::app::ports::MessageConsumer;
use floppyctl::config::DeviceConfig;
use floppyctl::protocol::{ByteSource, Position, SerialHandler};
use libfuzzer_sys::fuzz_target;

struct Link(VecDeque<u8>);

impl ByteSource for Link {
    type Error = ();

    fn bytes_available(&self) -> usize {
        self.0.len()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ()> {
        if buf.len() > self.0.len() {
            return Err(());
        }
        let n = buf.len();
        for (slot, byte) in buf.iter_mut().zip(self.0.drain(..n)) {
            *slot = byte;
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), ()> {
        assert_eq!(data.len(), 8, "only pong frames are written");
        Ok(())
    }
}

struct Check;

impl MessageConsumer for Check {
    fn handle_system_message(&mut self, _command: u8, payload: &[u8]) {
        assert!(payload.len() < 255);
    }

    fn handle_device_message(&mut self, sub_address: u8, _command: u8, payload: &[u8]) {
        assert!(sub_address <= 8);
        assert!(payload.len() < 255);
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).min(rest.len());

    let mut handler = SerialHandler::new(&DeviceConfig::default()).unwrap();
    let mut link = Link(rest[..split].iter().copied().collect());

    handler.drain_messages(&mut link, &mut Check);
    link.0.extend(&rest[split..]);
    handler.drain_messages(&mut link, &mut Check);

    match handler.position() {
        Position::AwaitBody { declared } => assert!(link.0.len() < declared as usize),
        _ => assert!(link.0.is_empty()),
    }
});
