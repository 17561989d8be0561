//! Application core — the seam between protocol and instruments, zero I/O.
//!
//! [`ports`] defines what the protocol engine needs from an instrument;
//! [`commands`] turns raw opcodes into typed commands for instruments.

pub mod commands;
pub mod ports;
