//! Moppy serial protocol engine.
//!
//! Non-blocking framing and dispatch for the Moppy wire protocol.
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌─────────────┐   ┌─────────────────┐
//! │ ByteSource │──▶│ FrameParser │──▶│ Dispatcher  │──▶│ MessageConsumer │
//! │ (trait)    │   │ (codec)     │   │             │   │ (instrument)    │
//! └────────────┘   └─────────────┘   └──────┬──────┘   └─────────────────┘
//!       ▲                                   │ ping
//!       └───────────── pong ────────────────┘
//! ```
//!
//! [`SerialHandler`] ties the pieces together for the firmware main loop.

pub mod codec;
pub mod dispatch;
pub mod frame;
pub mod handler;
pub mod transport;

pub use codec::{FrameParser, Position, Progress};
pub use dispatch::Dispatcher;
pub use frame::{Message, PONG_FRAME_LEN, Target, encode_frame, pong_frame};
pub use handler::SerialHandler;
pub use transport::ByteSource;
