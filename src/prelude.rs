//! Convenience re-exports for application firmware.

pub use crate::expander::Mcp23017;
pub use crate::interface::RegisterAccess;
pub use crate::registers::{
    Direction, Error, InterruptMirror, InterruptMode, PinNumber, PinSet, Polarity, Port, Register,
};
pub use crate::{convert_slave_address, resolve_address, SlaveAddressing};
