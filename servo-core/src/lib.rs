//! Board-agnostic core of the servo link
//!
//! This crate contains everything between the serial line and the
//! character endpoint that does not depend on a particular host runtime:
//!
//! - Shared angle state and reader wakeups
//! - The receive path feeding the line decoder
//! - The blocking read and command write endpoints
//! - Transport and caller-buffer abstractions
//! - Link configuration
//!
//! The endpoints are async. With the `std` feature, `read_blocking` and
//! `write_blocking` park the calling thread until the link wakes it.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod error;
pub mod link;
pub mod state;
pub mod traits;

pub use config::LinkConfig;
pub use error::{Fault, ServoError};
pub use link::{CancelToken, ServoLink, DEFAULT_READERS};
pub use state::{AngleState, SharedAngle};
pub use traits::{CopyIn, CopyOut, Transport};

pub use servo_protocol::{Angle, LineDecoder};
