//! Servo Link Hardware Abstraction Layer
//!
//! Serial line traits that the link core is written against. A chip HAL,
//! a pseudo-terminal pair or a test double implements them; the core never
//! touches a concrete port.
//!
//! ```text
//! ┌───────────────────────────┐
//! │  servo-core (ServoLink)   │
//! └───────────────────────────┘
//!              │
//!              ▼
//! ┌───────────────────────────┐
//! │  servo-hal (this crate)   │
//! └───────────────────────────┘
//!              │
//!      ┌───────┴────────┐
//!      ▼                ▼
//!  UART driver     virtual tty
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{Uart, UartRx, UartTx};
