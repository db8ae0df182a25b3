//! Serial line abstractions
//!
//! The servo line is a plain byte pipe: outbound angle commands go through
//! [`UartTx`], inbound telemetry chunks come from [`UartRx`].

/// Serial transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Queue `data` for transmission
    ///
    /// Returns once the bytes have been handed to the line, or on error.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever bytes are available into `buf`
    ///
    /// Returns the number of bytes read. Zero means nothing was pending.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A full-duplex serial line
pub trait Uart: UartTx + UartRx {}

impl<T: UartTx + UartRx> Uart for T {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loopback line: everything written comes back on read
    struct Loopback {
        buf: [u8; 16],
        len: usize,
    }

    impl UartTx for Loopback {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            let end = self.len + data.len();
            if end > self.buf.len() {
                return Err(());
            }
            self.buf[self.len..end].copy_from_slice(data);
            self.len = end;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    impl UartRx for Loopback {
        type Error = ();

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = self.len.min(buf.len());
            buf[..n].copy_from_slice(&self.buf[..n]);
            self.buf.copy_within(n..self.len, 0);
            self.len -= n;
            Ok(n)
        }
    }

    fn echo<U: Uart>(line: &mut U, data: &[u8], out: &mut [u8]) -> usize {
        assert!(line.write_blocking(data).is_ok());
        assert!(line.flush().is_ok());
        line.read_blocking(out).unwrap_or(0)
    }

    #[test]
    fn test_loopback_is_a_uart() {
        let mut line = Loopback { buf: [0; 16], len: 0 };
        let mut out = [0u8; 8];
        let n = echo(&mut line, b"90\n", &mut out);
        assert_eq!(&out[..n], b"90\n");
    }

    #[test]
    fn test_partial_read_keeps_remainder() {
        let mut line = Loopback { buf: [0; 16], len: 0 };
        line.write_blocking(b"180\n").unwrap();

        let mut out = [0u8; 2];
        assert_eq!(line.read_blocking(&mut out), Ok(2));
        assert_eq!(&out, b"18");
        assert_eq!(line.read_blocking(&mut out), Ok(2));
        assert_eq!(&out, b"0\n");
        assert_eq!(line.read_blocking(&mut out), Ok(0));
    }
}
