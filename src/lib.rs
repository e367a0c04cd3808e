#![no_std]

//! Driver for the MCP23017, a 16-bit I2C I/O expander with two 8-pin ports.
//!
//! The chip is operated in its factory-default `IOCON.BANK = 0` register
//! layout. Every operation is a fresh bus transaction against the live
//! registers; the driver caches nothing, so read-modify-write sequences
//! preserve whatever other bus masters or earlier calls left in the sibling
//! bits of a register.
//!
//! Read-modify-write is *not* atomic across the bus. If several execution
//! contexts talk to the same chip, the caller must serialize bus access
//! externally (a mutex around the bus, or a shared-bus manager); this crate
//! performs no locking of its own.
//!
//! See [the datasheet](https://ww1.microchip.com/downloads/en/DeviceDoc/20001952C.pdf)
//! for the register-level details.
//!
//! With the `async` feature the driver binds `embedded-hal-async` instead of
//! the blocking `embedded-hal` I2C trait; the API is otherwise identical.

pub mod expander;
pub mod interface;
pub mod prelude;
pub mod registers;

pub use crate::expander::Mcp23017;
pub use crate::interface::RegisterAccess;
pub use crate::registers::{
    Direction, Error, InterruptMirror, InterruptMode, PinNumber, PinSet, Polarity, Port, Register,
    DEFAULT_ADDRESS, FALLBACK_ADDRESS,
};

use core::fmt::Display;

/// Bus clock the chip is qualified for in fast mode.
///
/// The I2C clock is shared by every device on the bus, so it is process-wide
/// configuration: apply it once at startup when initializing the HAL bus
/// peripheral, not per driver instance.
pub const RECOMMENDED_BUS_CLOCK_HZ: u32 = 400_000;

#[cfg(feature = "rtt")]
macro_rules! rtt_trace {
    ($($arg:tt)*) => { rtt_target::rprintln!($($arg)*) };
}
#[cfg(not(feature = "rtt"))]
macro_rules! rtt_trace {
    ($($arg:tt)*) => {};
}
pub(crate) use rtt_trace;

/// Level of one hardware address strap (A0/A1/A2).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SlaveAddressing {
    /// Strap tied to ground.
    Low,
    /// Strap tied to VDD.
    High,
}

impl Display for SlaveAddressing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SlaveAddressing::High => write!(f, "High"),
            SlaveAddressing::Low => write!(f, "Low"),
        }
    }
}

/// Converts the three physical address straps to the slave address.
pub fn convert_slave_address(
    a0: SlaveAddressing,
    a1: SlaveAddressing,
    a2: SlaveAddressing,
) -> u8 {
    let strap = |pin| match pin {
        SlaveAddressing::Low => 0,
        SlaveAddressing::High => 1,
    };
    DEFAULT_ADDRESS | strap(a2) << 2 | strap(a1) << 1 | strap(a0)
}

/// Normalizes a caller-supplied address to the chip's [0x20, 0x27] range.
///
/// Accepts either a full slave address or a bare 3-bit strap value, which is
/// added to the 0x20 base. Anything else binds the fallback address 0x27
/// rather than failing, so callers cannot rely on an error for a malformed
/// address.
pub fn resolve_address(address: u8) -> u8 {
    match address {
        0x20..=0x27 => address,
        0x00..=0x07 => DEFAULT_ADDRESS + address,
        _ => FALLBACK_ADDRESS,
    }
}
