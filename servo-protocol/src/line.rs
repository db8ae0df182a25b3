//! Inbound telemetry decoding
//!
//! Bytes arrive in arbitrary chunks. Digits are collected in a
//! [`LineBuffer`] until a terminator (`'\n'` or `'\r'`) closes the token,
//! at which point the buffered digits are parsed and range-checked.
//!
//! When more than [`LINE_CAPACITY`] digits arrive before a terminator, the
//! extra digits are dropped and the retained prefix is parsed once the
//! terminator shows up. A prefix that long can only pass the range check
//! when it is zero-padded.

use heapless::Vec;

use crate::angle::Angle;

/// Maximum number of digits held before a terminator
pub const LINE_CAPACITY: usize = 15;

/// Reasons a byte did not contribute to a decoded angle
///
/// These are diagnostics for the receive path. They are never meant to be
/// surfaced to whoever delivered the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Digit dropped because the line buffer was full
    Overflow,
    /// Byte that is neither a digit nor a terminator
    Stray(u8),
    /// Terminated token did not parse or was out of range
    Rejected,
}

/// Digits accumulated since the last terminator
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    digits: Vec<u8, LINE_CAPACITY>,
}

impl LineBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { digits: Vec::new() }
    }

    /// Append a digit, returning `false` if the buffer is full
    pub fn push(&mut self, digit: u8) -> bool {
        self.digits.push(digit).is_ok()
    }

    /// Number of buffered digits
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether no digits are buffered
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Whether another digit would be dropped
    pub fn is_full(&self) -> bool {
        self.digits.is_full()
    }

    /// Buffered digits as ASCII
    pub fn as_bytes(&self) -> &[u8] {
        &self.digits
    }

    /// Drop all buffered digits
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Parse the buffered digits as an angle and clear the buffer
    ///
    /// The buffer is emptied whether or not the parse succeeds.
    pub fn take_value(&mut self) -> Option<Angle> {
        let value = parse_digits(&self.digits);
        self.digits.clear();
        value.and_then(|v| Angle::new(i64::from(v)))
    }
}

fn parse_digits(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u32, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u32::from(d.wrapping_sub(b'0')))
    })
}

/// Whether `byte` ends an inbound token
pub const fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Byte-at-a-time decoder for the inbound stream
///
/// One decoder belongs to one inbound stream and is only ever fed from that
/// stream's delivery context.
#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    line: LineBuffer,
}

impl LineDecoder {
    /// Create a decoder with an empty line
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Discard any partially received token
    pub fn reset(&mut self) {
        self.line.clear();
    }

    /// Digits received since the last terminator
    pub fn buffered(&self) -> &LineBuffer {
        &self.line
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(angle))` when a terminator completes a valid token,
    /// `Ok(None)` when the byte was absorbed (digit buffered, or terminator
    /// on an empty line), or `Err` describing why the byte was discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Angle>, LineError> {
        match byte {
            b'0'..=b'9' => {
                if self.line.push(byte) {
                    Ok(None)
                } else {
                    Err(LineError::Overflow)
                }
            }
            b if is_terminator(b) => {
                if self.line.is_empty() {
                    return Ok(None);
                }
                match self.line.take_value() {
                    Some(angle) => Ok(Some(angle)),
                    None => Err(LineError::Rejected),
                }
            }
            other => Err(LineError::Stray(other)),
        }
    }

    /// Feed a chunk, calling `on_angle` for every valid token
    ///
    /// Discarded bytes are ignored. Returns the last decoded angle, if any.
    pub fn feed_bytes(&mut self, bytes: &[u8], mut on_angle: impl FnMut(Angle)) -> Option<Angle> {
        let mut last = None;
        for &byte in bytes {
            if let Ok(Some(angle)) = self.feed(byte) {
                on_angle(angle);
                last = Some(angle);
            }
        }
        last
    }
}
