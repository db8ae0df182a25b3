//! Lock-protected angle state and reader wakeups
//!
//! A blocking mutex guards the angle, the pending flag and the wakers of
//! suspended readers together. Work done under the lock is always bounded:
//! nothing inside it waits, so the receive path may take it from an
//! interrupt-like context.

use core::cell::RefCell;
use core::future::{poll_fn, Future};
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::MultiWakerRegistration;

use servo_protocol::Angle;

/// Snapshot of the shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngleState {
    /// Last accepted angle, from the line or from a local command
    pub angle: Angle,
    /// A decoded angle is waiting for a reader
    pub pending: bool,
}

/// Contents of the lock
///
/// Handed out by [`SharedAngle::with`] so that a caller can apply several
/// updates under one acquisition.
pub struct AngleCell<const READERS: usize> {
    state: AngleState,
    readers: MultiWakerRegistration<READERS>,
}

impl<const READERS: usize> AngleCell<READERS> {
    const fn new() -> Self {
        Self {
            state: AngleState {
                angle: Angle::MIN,
                pending: false,
            },
            readers: MultiWakerRegistration::new(),
        }
    }

    /// Record a decoded angle, mark it pending and wake readers
    pub fn publish(&mut self, angle: Angle) {
        self.state.angle = angle;
        self.state.pending = true;
        self.readers.wake();
    }

    /// Record a local command; pending and readers are untouched
    pub fn set_quiet(&mut self, angle: Angle) {
        self.state.angle = angle;
    }

    /// Take the pending angle, clearing the flag
    pub fn take(&mut self) -> Option<Angle> {
        if self.state.pending {
            self.state.pending = false;
            Some(self.state.angle)
        } else {
            None
        }
    }

    /// Current state
    pub fn state(&self) -> AngleState {
        self.state
    }
}

/// Angle state shared between the receive path and the endpoints
///
/// `READERS` bounds how many suspended readers are tracked individually.
/// Registering one more wakes all of them so that none is lost; they
/// re-check the flag and go back to sleep.
pub struct SharedAngle<M: RawMutex, const READERS: usize> {
    inner: Mutex<M, RefCell<AngleCell<READERS>>>,
}

impl<M: RawMutex, const READERS: usize> Default for SharedAngle<M, READERS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const READERS: usize> SharedAngle<M, READERS> {
    /// Start at angle 0 with nothing pending
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(AngleCell::new())),
        }
    }

    /// Run `f` with the lock held
    pub fn with<R>(&self, f: impl FnOnce(&mut AngleCell<READERS>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`AngleCell::publish`]
    pub fn publish(&self, angle: Angle) {
        self.with(|cell| cell.publish(angle));
    }

    /// See [`AngleCell::set_quiet`]
    pub fn set_quiet(&self, angle: Angle) {
        self.with(|cell| cell.set_quiet(angle));
    }

    /// Current state
    pub fn snapshot(&self) -> AngleState {
        self.with(|cell| cell.state())
    }

    /// Take the pending angle, or register `cx` to be woken on the next publish
    pub fn poll_take(&self, cx: &mut Context<'_>) -> Poll<Angle> {
        self.with(|cell| match cell.take() {
            Some(angle) => Poll::Ready(angle),
            None => {
                cell.readers.register(cx.waker());
                Poll::Pending
            }
        })
    }

    /// Wait until an angle is pending, then take it
    ///
    /// The lock is only held while polling, never across the suspension.
    /// Dropping the future leaves the state untouched.
    pub fn take(&self) -> impl Future<Output = Angle> + '_ {
        poll_fn(move |cx| self.poll_take(cx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_waker() -> (Arc<CountingWaker>, Waker) {
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(counter.clone());
        (counter, waker)
    }

    fn angle(v: i64) -> Angle {
        Angle::new(v).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let shared = SharedAngle::<CriticalSectionRawMutex, 2>::new();
        assert_eq!(
            shared.snapshot(),
            AngleState {
                angle: Angle::MIN,
                pending: false
            }
        );
    }

    #[test]
    fn test_publish_then_take() {
        let shared = SharedAngle::<CriticalSectionRawMutex, 2>::new();
        let (_, waker) = counting_waker();
        let mut cx = Context::from_waker(&waker);

        shared.publish(angle(42));
        assert_eq!(shared.poll_take(&mut cx), Poll::Ready(angle(42)));
        assert!(!shared.snapshot().pending);
        assert_eq!(shared.poll_take(&mut cx), Poll::Pending);
    }

    #[test]
    fn test_publish_wakes_registered_reader_once() {
        let shared = SharedAngle::<CriticalSectionRawMutex, 2>::new();
        let (counter, waker) = counting_waker();
        let mut cx = Context::from_waker(&waker);

        assert_eq!(shared.poll_take(&mut cx), Poll::Pending);
        shared.publish(angle(10));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        // Waker was consumed by the wake; a second publish has no one to wake
        shared.publish(angle(11));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(shared.poll_take(&mut cx), Poll::Ready(angle(11)));
    }

    #[test]
    fn test_set_quiet_does_not_wake() {
        let shared = SharedAngle::<CriticalSectionRawMutex, 2>::new();
        let (counter, waker) = counting_waker();
        let mut cx = Context::from_waker(&waker);

        assert_eq!(shared.poll_take(&mut cx), Poll::Pending);
        shared.set_quiet(angle(90));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
        assert_eq!(
            shared.snapshot(),
            AngleState {
                angle: angle(90),
                pending: false
            }
        );
        assert_eq!(shared.poll_take(&mut cx), Poll::Pending);
    }

    #[test]
    fn test_set_quiet_keeps_pending() {
        let shared = SharedAngle::<CriticalSectionRawMutex, 2>::new();
        shared.publish(angle(30));
        shared.set_quiet(angle(60));
        assert_eq!(
            shared.snapshot(),
            AngleState {
                angle: angle(60),
                pending: true
            }
        );
    }

    #[test]
    fn test_reader_overflow_wakes_everyone() {
        let shared = SharedAngle::<CriticalSectionRawMutex, 1>::new();
        let (first, first_waker) = counting_waker();
        let (second, second_waker) = counting_waker();

        assert_eq!(shared.poll_take(&mut Context::from_waker(&first_waker)), Poll::Pending);
        assert_eq!(shared.poll_take(&mut Context::from_waker(&second_waker)), Poll::Pending);
        // Registration was full, so the first reader was woken to re-poll
        assert_eq!(first.0.load(Ordering::SeqCst), 1);

        shared.publish(angle(5));
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
    }
}
