//! Hardware timing drivers.

pub mod hw_timer;
