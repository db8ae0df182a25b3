//! Collaborator abstractions
//!
//! The link never talks to a concrete serial port or caller buffer. These
//! traits are the seams where the host runtime plugs in.

pub mod transport;
pub mod user;

pub use transport::Transport;
pub use user::{CopyIn, CopyOut};
