//! Adapters — concrete implementations of the crate's port traits.
//!
//! | Adapter        | Implements       | Connects to               |
//! |----------------|------------------|---------------------------|
//! | `log_consumer` | MessageConsumer  | Serial log, then an inner |
//! |                |                  | instrument                |
//! | `uart`         | ByteSource       | ESP32 UART (espidf only)  |

pub mod log_consumer;
pub mod uart;
