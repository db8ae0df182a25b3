//! Shared angle state
//!
//! The last known angle and the "new data" flag, behind the single lock
//! that every entry point of the link goes through.

pub mod shared;

pub use shared::{AngleCell, AngleState, SharedAngle};
