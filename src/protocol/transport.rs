//! Byte source abstraction — any non-blocking serial channel.
//!
//! Concrete implementations:
//! - ESP32 UART / USB-CDC ([`crate::adapters::uart`], espidf only)
//! - In-memory scripted sources in the integration tests
//!
//! The parser is generic over `ByteSource`, so a new transport needs no
//! change to the protocol logic.

/// Non-blocking byte channel feeding the frame parser.
pub trait ByteSource {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Number of bytes that can be read right now without blocking.
    fn bytes_available(&self) -> usize;

    /// Fill `buf` completely.
    ///
    /// Callers only request as many bytes as `bytes_available` just
    /// reported, so implementations must not block in that case.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` back to the controller (only used for pong replies).
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

