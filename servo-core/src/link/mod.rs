//! Servo link driver context
//!
//! [`ServoLink`] is what the host runtime registers: it is handed by
//! reference to the serial receive hook and to every stream entry point.
//!
//! ```text
//!  serial line ──receive()──► SharedAngle ──read()──► consumer
//!       ▲                          ▲
//!       └────────── write() ───────┘◄──────────────── consumer
//! ```
//!
//! The receive path only ever takes the state lock. The transport sits
//! behind its own async mutex, so a slow send holds up other writers but
//! never the receive path.

mod cancel;

pub use cancel::CancelToken;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

use servo_hal::UartRx;
use servo_protocol::{parse_command, Angle, LineDecoder, LineError, MAX_COMMAND_LEN};

use crate::config::LinkConfig;
use crate::error::ServoError;
use crate::state::{AngleCell, AngleState, SharedAngle};
use crate::traits::{CopyIn, CopyOut, Transport};

/// Suspended readers tracked individually before falling back to wake-all
pub const DEFAULT_READERS: usize = 4;

/// What one inbound chunk did, gathered under the state lock
#[derive(Default)]
struct ChunkOutcome {
    decoded: usize,
    last: Option<Angle>,
    rejected: usize,
    overflowed: usize,
}

impl ChunkOutcome {
    /// Run `bytes` through `decoder`, publishing every decoded angle
    fn feed<const READERS: usize>(
        cell: &mut AngleCell<READERS>,
        decoder: &mut LineDecoder,
        bytes: &[u8],
    ) -> Self {
        let mut outcome = Self::default();
        for &byte in bytes {
            match decoder.feed(byte) {
                Ok(Some(angle)) => {
                    cell.publish(angle);
                    outcome.decoded += 1;
                    outcome.last = Some(angle);
                }
                Ok(None) | Err(LineError::Stray(_)) => {}
                Err(LineError::Rejected) => outcome.rejected += 1,
                Err(LineError::Overflow) => outcome.overflowed += 1,
            }
        }
        outcome
    }
}

/// One servo link: shared angle state plus the outbound transport slot
pub struct ServoLink<M: RawMutex, T, const READERS: usize = DEFAULT_READERS> {
    config: LinkConfig,
    angle: SharedAngle<M, READERS>,
    transport: Mutex<M, Option<T>>,
}

impl<M: RawMutex, T, const READERS: usize> ServoLink<M, T, READERS> {
    /// Create a detached link at angle 0 with nothing pending
    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            angle: SharedAngle::new(),
            transport: Mutex::new(None),
        }
    }

    /// Link configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Attach the serial line used for forwarding commands
    ///
    /// Waits for any send in flight. Returns the receive room the serial
    /// layer should advertise. A previously attached transport is dropped.
    pub async fn attach(&self, transport: T) -> u32 {
        self.transport.lock().await.replace(transport);
        info!(
            "servo: line discipline {} attached",
            self.config.line_discipline
        );
        self.config.receive_room
    }

    /// Detach the serial line, handing it back
    pub async fn detach(&self) -> Option<T> {
        let transport = self.transport.lock().await.take();
        if transport.is_some() {
            info!("servo: line discipline closed");
        }
        transport
    }

    /// Whether a transport is attached
    pub async fn is_attached(&self) -> bool {
        self.transport.lock().await.is_some()
    }

    /// Open the character endpoint; always succeeds
    pub fn open(&self) -> Result<(), ServoError> {
        trace!("servo: open");
        Ok(())
    }

    /// Close the character endpoint; always succeeds
    pub fn close(&self) -> Result<(), ServoError> {
        trace!("servo: close");
        Ok(())
    }

    /// Last accepted angle
    pub fn angle(&self) -> Angle {
        self.angle.snapshot().angle
    }

    /// Whether a decoded angle is waiting for a reader
    pub fn is_pending(&self) -> bool {
        self.angle.snapshot().pending
    }

    /// Snapshot of angle and pending flag, taken under the lock
    pub fn state(&self) -> AngleState {
        self.angle.snapshot()
    }

    /// Feed a chunk of inbound bytes through `decoder`
    ///
    /// The whole chunk is processed under the state lock, so every decoded
    /// angle is published and its readers woken before anyone can observe
    /// the state. Malformed input is dropped; nothing is reported back.
    /// Logging happens once the lock is released.
    pub fn receive(&self, decoder: &mut LineDecoder, bytes: &[u8]) {
        let outcome = self
            .angle
            .with(|cell| ChunkOutcome::feed(cell, decoder, bytes));

        trace!("servo: rx {} bytes", bytes.len());
        if let Some(angle) = outcome.last {
            debug!(
                "servo: decoded {} angle(s), last {}",
                outcome.decoded,
                angle.degrees()
            );
        }
        if outcome.rejected > 0 {
            debug!("servo: discarded {} invalid token(s)", outcome.rejected);
        }
        if outcome.overflowed > 0 {
            trace!("servo: line full, {} digit(s) dropped", outcome.overflowed);
        }
    }

    /// Pull one chunk from `rx` and feed it through `decoder`
    ///
    /// `scratch` bounds the chunk size. Returns the number of bytes
    /// consumed, or the line's error.
    pub fn receive_from<R: UartRx>(
        &self,
        rx: &mut R,
        decoder: &mut LineDecoder,
        scratch: &mut [u8],
    ) -> Result<usize, R::Error> {
        let n = rx.read_blocking(scratch)?;
        if n > 0 {
            self.receive(decoder, &scratch[..n]);
        }
        Ok(n)
    }

    /// Wait for the next decoded angle and copy `"<angle>\n"` to `out`
    ///
    /// The line is truncated to `out.capacity()`. Fails with
    /// [`ServoError::Interrupted`] if `cancel` fires first, leaving the
    /// state untouched. Concurrent readers compete: each pending angle is
    /// delivered to exactly one of them.
    ///
    /// An angle that is already pending wins over a cancellation raised at
    /// the same time. Either way the token comes back armed, so a cancel
    /// aimed at this read never leaks into the next one.
    pub async fn read<O: CopyOut + ?Sized>(
        &self,
        out: &mut O,
        cancel: &CancelToken<M>,
    ) -> Result<usize, ServoError> {
        let angle = match select(self.angle.take(), cancel.cancelled()).await {
            Either::First(angle) => {
                cancel.reset();
                angle
            }
            Either::Second(()) => {
                debug!("servo: read interrupted");
                return Err(ServoError::Interrupted);
            }
        };

        let line = angle.to_line();
        let len = line.len().min(out.capacity());
        out.copy_out(&line[..len])?;
        Ok(len)
    }

    /// [`ServoLink::read`], with the calling thread parked until woken
    #[cfg(any(test, feature = "std"))]
    pub fn read_blocking<O: CopyOut + ?Sized>(
        &self,
        out: &mut O,
        cancel: &CancelToken<M>,
    ) -> Result<usize, ServoError> {
        pollster::block_on(self.read(out, cancel))
    }
}

impl<M: RawMutex, T: Transport, const READERS: usize> ServoLink<M, T, READERS> {
    /// Accept a local angle command and forward it on the line
    ///
    /// On success the angle becomes the current one and `"<angle>\n"` is
    /// sent to the attached transport, if any. The pending flag is left
    /// alone and no reader is woken: local commands are not telemetry.
    /// Returns the full input length.
    pub async fn write<I: CopyIn + ?Sized>(&self, input: &I) -> Result<usize, ServoError> {
        let len = input.len();
        if len > self.config.write_limit() {
            debug!("servo: command too long ({} bytes)", len);
            return Err(ServoError::InvalidArgument);
        }

        let mut buf = [0u8; MAX_COMMAND_LEN];
        if let Err(e) = input.copy_in(&mut buf[..len]) {
            warn!("servo: failed to receive data from caller");
            return Err(e.into());
        }

        let angle = parse_command(&buf[..len]).map_err(|e| {
            debug!("servo: rejected command: {:?}", e);
            ServoError::from(e)
        })?;

        // The line stays held until the angle is stored, so the last
        // command sent is the one that sticks
        let mut line = self.transport.lock().await;
        forward(line.as_mut(), angle);
        self.angle.set_quiet(angle);
        drop(line);

        debug!("servo: command angle {}", angle.degrees());
        Ok(len)
    }

    /// [`ServoLink::write`], with the calling thread parked while another
    /// writer holds the line
    #[cfg(any(test, feature = "std"))]
    pub fn write_blocking<I: CopyIn + ?Sized>(&self, input: &I) -> Result<usize, ServoError> {
        pollster::block_on(self.write(input))
    }
}

/// Best-effort send of `"<angle>\n"`; failures are only logged
fn forward<T: Transport>(transport: Option<&mut T>, angle: Angle) {
    match transport {
        Some(transport) => {
            if transport.send(&angle.to_line()).is_err() {
                warn!("servo: failed to forward command");
            }
        }
        None => trace!("servo: no line attached, command not forwarded"),
    }
}
