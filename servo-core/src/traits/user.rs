//! Caller buffer access
//!
//! A character device hands the driver addresses it cannot trust. Copies in
//! and out may therefore fail, and the endpoints report that as
//! [`ServoError::Fault`](crate::ServoError::Fault). Plain slices never fault.

use crate::error::Fault;

/// Source of caller-supplied bytes
pub trait CopyIn {
    /// Number of bytes the caller offered
    fn len(&self) -> usize;

    /// Whether the caller offered nothing
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the first `dst.len()` bytes into `dst`
    fn copy_in(&self, dst: &mut [u8]) -> Result<(), Fault>;
}

/// Destination for bytes returned to the caller
pub trait CopyOut {
    /// Number of bytes the caller can accept
    fn capacity(&self) -> usize;

    /// Copy `src` to the start of the caller buffer
    fn copy_out(&mut self, src: &[u8]) -> Result<(), Fault>;
}

impl CopyIn for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_in(&self, dst: &mut [u8]) -> Result<(), Fault> {
        let src = self.get(..dst.len()).ok_or(Fault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl CopyOut for [u8] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn copy_out(&mut self, src: &[u8]) -> Result<(), Fault> {
        let dst = self.get_mut(..src.len()).ok_or(Fault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_copy_in() {
        let src: &[u8] = b"123";
        let mut dst = [0u8; 2];
        assert_eq!(src.copy_in(&mut dst), Ok(()));
        assert_eq!(&dst, b"12");

        let mut too_big = [0u8; 4];
        assert_eq!(src.copy_in(&mut too_big), Err(Fault));
    }

    #[test]
    fn test_slice_copy_out() {
        let mut buf = [0u8; 3];
        let dst: &mut [u8] = &mut buf;
        assert_eq!(dst.capacity(), 3);
        assert_eq!(dst.copy_out(b"45"), Ok(()));
        assert_eq!(dst.copy_out(b"4567"), Err(Fault));
        assert_eq!(&buf[..2], b"45");
    }
}
