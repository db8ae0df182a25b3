//! Endpoint errors

use servo_protocol::CommandError;

/// Errors returned by the stream endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// Wait cancelled before an angle became pending
    Interrupted,
    /// Oversized, non-numeric or out-of-range command
    InvalidArgument,
    /// Caller buffer could not be accessed
    Fault,
}

/// Caller buffer access failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fault;

impl From<Fault> for ServoError {
    fn from(_: Fault) -> Self {
        ServoError::Fault
    }
}

impl From<CommandError> for ServoError {
    fn from(_: CommandError) -> Self {
        ServoError::InvalidArgument
    }
}

impl core::fmt::Display for ServoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ServoError::Interrupted => f.write_str("interrupted"),
            ServoError::InvalidArgument => f.write_str("invalid argument"),
            ServoError::Fault => f.write_str("bad address"),
        }
    }
}
