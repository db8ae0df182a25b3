//! Outbound transport

use servo_hal::UartTx;

/// Best-effort byte sink for outbound command lines
///
/// Any [`UartTx`] is a transport. Send failures are reported to the link,
/// which logs them but never fails a command because of them.
pub trait Transport {
    /// Error type for send operations
    type Error;

    /// Hand `bytes` to the line
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<U: UartTx> Transport for U {
    type Error = U::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.write_blocking(bytes)
    }
}
