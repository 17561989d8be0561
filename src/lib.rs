//! Floppyctl firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host-side
//! tooling. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod instrument;
pub mod notes;
pub mod pins;
pub mod protocol;

pub mod adapters;
pub mod drivers;

pub use app::ports::MessageConsumer;
pub use config::DeviceConfig;
pub use protocol::{ByteSource, SerialHandler};
