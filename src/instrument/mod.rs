//! Instruments — concrete [`MessageConsumer`](crate::app::ports::MessageConsumer)s.

pub mod floppy;

pub use floppy::{FloppyDrive, FloppyDrives};
