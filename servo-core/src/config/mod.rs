//! Link configuration
//!
//! Board-agnostic settings for one servo link. With the `serde` feature the
//! configuration can be stored as postcard binary data.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use servo_protocol::MAX_COMMAND_LEN;

/// Maximum device name length
pub const MAX_NAME_LEN: usize = 16;

/// Default character device name
pub const DEFAULT_DEVICE_NAME: &str = "servo";

/// Default line discipline number
pub const DEFAULT_LINE_DISCIPLINE: u8 = 20;

/// Default receive room advertised to the serial layer
pub const DEFAULT_RECEIVE_ROOM: u32 = 65536;

/// Settings for one servo link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Name of the character endpoint
    pub device_name: String<MAX_NAME_LEN>,
    /// Line discipline number the receive path is registered under
    pub line_discipline: u8,
    /// Bytes the serial layer may deliver per chunk
    pub receive_room: u32,
    /// Longest command accepted by `write`, capped at `MAX_COMMAND_LEN`
    pub max_write_len: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let mut device_name = String::new();
        // DEFAULT_DEVICE_NAME is shorter than MAX_NAME_LEN
        let _ = device_name.push_str(DEFAULT_DEVICE_NAME);
        Self {
            device_name,
            line_discipline: DEFAULT_LINE_DISCIPLINE,
            receive_room: DEFAULT_RECEIVE_ROOM,
            max_write_len: MAX_COMMAND_LEN,
        }
    }
}

impl LinkConfig {
    /// Effective command length limit
    pub fn write_limit(&self) -> usize {
        self.max_write_len.min(MAX_COMMAND_LEN)
    }
}

/// Configuration persistence errors
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Encoding failed or buffer too small
    Serialize,
    /// Stored bytes are not a valid configuration
    Deserialize,
}

#[cfg(feature = "serde")]
impl LinkConfig {
    /// Encode into `buf`, returning the used prefix
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Decode a configuration written by [`LinkConfig::to_postcard`]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.device_name.as_str(), "servo");
        assert_eq!(config.line_discipline, 20);
        assert_eq!(config.receive_room, 65536);
        assert_eq!(config.write_limit(), 255);
    }

    #[test]
    fn test_write_limit_is_capped() {
        let config = LinkConfig {
            max_write_len: 4096,
            ..LinkConfig::default()
        };
        assert_eq!(config.write_limit(), MAX_COMMAND_LEN);

        let config = LinkConfig {
            max_write_len: 8,
            ..LinkConfig::default()
        };
        assert_eq!(config.write_limit(), 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let mut config = LinkConfig::default();
        config.line_discipline = 27;
        config.device_name.clear();
        config.device_name.push_str("servo1").unwrap();

        let mut buf = [0u8; 64];
        let bytes = config.to_postcard(&mut buf).unwrap();
        assert_eq!(LinkConfig::from_postcard(bytes), Ok(config));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_rejects_truncated() {
        let mut buf = [0u8; 64];
        let len = LinkConfig::default().to_postcard(&mut buf).unwrap().len();
        assert_eq!(
            LinkConfig::from_postcard(&buf[..len - 1]),
            Err(ConfigError::Deserialize)
        );
    }
}
