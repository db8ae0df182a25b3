//! Validated servo angle and its line encoding

use core::ops::Deref;

/// Smallest accepted angle in degrees
pub const MIN_ANGLE: u8 = 0;

/// Largest accepted angle in degrees
pub const MAX_ANGLE: u8 = 180;

/// Longest encoded angle line ("180\n")
pub const MAX_LINE_LEN: usize = 4;

/// A servo angle known to lie in `MIN_ANGLE..=MAX_ANGLE`
///
/// The only way to build one is through [`Angle::new`], so any `Angle` that
/// reaches shared state has been range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angle(u8);

impl Angle {
    /// Lowest position
    pub const MIN: Angle = Angle(MIN_ANGLE);

    /// Highest position
    pub const MAX: Angle = Angle(MAX_ANGLE);

    /// Validate a raw value, returning `None` when out of range
    pub const fn new(degrees: i64) -> Option<Self> {
        if degrees >= MIN_ANGLE as i64 && degrees <= MAX_ANGLE as i64 {
            Some(Self(degrees as u8))
        } else {
            None
        }
    }

    /// Angle in whole degrees
    pub const fn degrees(self) -> u8 {
        self.0
    }

    /// Encode as `"<degrees>\n"`
    pub fn to_line(self) -> AngleLine {
        let mut line = AngleLine {
            buf: [0; MAX_LINE_LEN],
            len: 0,
        };
        let v = self.0;
        if v >= 100 {
            line.push(b'0' + v / 100);
        }
        if v >= 10 {
            line.push(b'0' + (v / 10) % 10);
        }
        line.push(b'0' + v % 10);
        line.push(b'\n');
        line
    }
}

impl TryFrom<i64> for Angle {
    type Error = ();

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Angle::new(value).ok_or(())
    }
}

impl From<Angle> for u8 {
    fn from(angle: Angle) -> u8 {
        angle.0
    }
}

/// An encoded angle line, at most [`MAX_LINE_LEN`] bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleLine {
    buf: [u8; MAX_LINE_LEN],
    len: usize,
}

impl AngleLine {
    // Callers never exceed MAX_LINE_LEN: at most three digits plus '\n'.
    fn push(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Copy as much of the line as fits into `out`
    ///
    /// Returns the number of bytes written, which is less than the line
    /// length when `out` is short.
    pub fn copy_truncated(&self, out: &mut [u8]) -> usize {
        let n = self.len.min(out.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        n
    }
}

impl Deref for AngleLine {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl AsRef<[u8]> for AngleLine {
    fn as_ref(&self) -> &[u8] {
        self
    }
}
