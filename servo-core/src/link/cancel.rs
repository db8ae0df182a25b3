//! Per-caller cancellation of blocking reads

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Cancellation signal for one reader
///
/// Firing the token makes the reader's current (or next) wait end with
/// [`ServoError::Interrupted`](crate::ServoError::Interrupted). A read
/// consumes the cancellation whether it was interrupted or won by a pending
/// angle, so the token is armed again afterwards.
pub struct CancelToken<M: RawMutex> {
    signal: Signal<M, ()>,
}

impl<M: RawMutex> Default for CancelToken<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> CancelToken<M> {
    /// Create an armed token
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Interrupt the owning reader
    pub fn cancel(&self) {
        self.signal.signal(());
    }

    /// Withdraw a cancellation that has not been observed yet
    pub fn reset(&self) {
        self.signal.reset();
    }

    /// Whether a cancellation is waiting to be observed
    pub fn is_cancelled(&self) -> bool {
        self.signal.signaled()
    }

    pub(crate) async fn cancelled(&self) {
        self.signal.wait().await
    }
}
