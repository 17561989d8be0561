//! Port traits — the boundary between the protocol core and instruments.
//!
//! ```text
//!   SerialHandler ──▶ MessageConsumer ──▶ instrument (FloppyDrives, ...)
//! ```
//!
//! The protocol core only knows this trait. Any actuator driver that can
//! react to system and device messages plugs in here, and tests substitute
//! a recording consumer.

/// Receives every decoded message that is not answered by the core itself.
///
/// Both calls happen synchronously from inside
/// [`SerialHandler::drain_messages`](crate::protocol::SerialHandler::drain_messages)
/// and must return promptly. `payload` borrows the parser's scratch buffer
/// and is only valid for the duration of the call.
pub trait MessageConsumer {
    /// A broadcast (address 0x00) command that affects every device.
    fn handle_system_message(&mut self, command: u8, payload: &[u8]);

    /// A command addressed to this device.
    ///
    /// `sub_address` is either 0 (all drives) or a drive inside the
    /// configured range.
    fn handle_device_message(&mut self, sub_address: u8, command: u8, payload: &[u8]);
}
