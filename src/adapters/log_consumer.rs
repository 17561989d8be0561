//! Log-based consumer decorator.
//!
//! Implements [`MessageConsumer`] by logging each message to the console
//! (UART / USB-CDC in production) and forwarding it to the wrapped
//! instrument unchanged.

use log::debug;

use crate::app::ports::MessageConsumer;

/// Logs every forwarded message, then hands it to `inner`.
pub struct LoggingConsumer<C> {
    inner: C,
}

impl<C: MessageConsumer> LoggingConsumer<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: MessageConsumer> MessageConsumer for LoggingConsumer<C> {
    fn handle_system_message(&mut self, command: u8, payload: &[u8]) {
        debug!("MSG | system cmd=0x{:02X} payload={:02X?}", command, payload);
        self.inner.handle_system_message(command, payload);
    }

    fn handle_device_message(&mut self, sub_address: u8, command: u8, payload: &[u8]) {
        debug!(
            "MSG | drive={} cmd=0x{:02X} payload={:02X?}",
            sub_address, command, payload
        );
        self.inner.handle_device_message(sub_address, command, payload);
    }
}
