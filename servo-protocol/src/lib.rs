//! Servo Angle Line Protocol
//!
//! This crate defines the wire format spoken on the servo serial line. Both
//! directions use the same framing: an ASCII decimal angle followed by a
//! line terminator.
//!
//! # Protocol Overview
//!
//! ```text
//! inbound:   [0-9]{1,15} ( '\n' | '\r' )     any other byte is ignored
//! outbound:  [0-9]{1,3}  '\n'                value in 0..=180
//! ```
//!
//! There are no headers, checksums or versions. Malformed inbound tokens are
//! dropped by the decoder without ever reaching the application.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod angle;
pub mod command;
pub mod line;

pub use angle::{Angle, AngleLine, MAX_ANGLE, MAX_LINE_LEN, MIN_ANGLE};
pub use command::{parse_command, CommandError, MAX_COMMAND_LEN};
pub use line::{LineBuffer, LineDecoder, LineError, LINE_CAPACITY};
