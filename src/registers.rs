//! Register map and value types for the MCP23017.
//!
//! Addresses follow the `IOCON.BANK = 0` layout (factory default, never
//! changed by this driver): the two ports interleave, so each constant below
//! is the port A address and port B lives one address above it.

use core::fmt::Display;

/// Default slave address with all three address straps tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;
/// Address bound when the caller hands in something unusable (see
/// [`resolve_address`](crate::resolve_address)).
pub const FALLBACK_ADDRESS: u8 = 0x27;

/// Chip registers, by port A address (`IOCON.BANK = 0`).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Register {
    /// Direction, bit 1 = input.
    Iodir = 0x00,
    /// Input polarity inversion, bit 1 = inverted.
    Ipol = 0x02,
    /// Interrupt-on-change enable.
    Gpinten = 0x04,
    /// Compare value for interrupts in compare mode.
    Defval = 0x06,
    /// Interrupt control, bit 1 = compare against DEFVAL, 0 = any change.
    Intcon = 0x08,
    /// Chip configuration (MIRROR, SEQOP, ...).
    Iocon = 0x0A,
    /// Weak pull-up enable, input pins only.
    Gppu = 0x0C,
    /// Interrupt flags, one bit per pin that raised the interrupt.
    Intf = 0x0E,
    /// GPIO snapshot latched when the interrupt fired.
    Intcap = 0x10,
    /// Live pin levels.
    Gpio = 0x12,
    /// Output latch, the write side of pins configured as outputs.
    Olat = 0x14,
}

impl Register {
    /// Resolves the concrete register address for one port.
    ///
    /// Port A addresses are even, so the port index is just OR-ed in.
    #[inline]
    pub fn in_port(self, port: Port) -> u8 {
        self as u8 | port as u8
    }
}

/// One of the two 8-pin ports.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Port {
    /// Port A (GPA0..GPA7), register offset 0.
    A = 0x00,
    /// Port B (GPB0..GPB7), register offset 1.
    B = 0x01,
}

impl TryFrom<u8> for Port {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Port::A),
            1 => Ok(Port::B),
            _ => Err(Error::InvalidParameter),
        }
    }
}

/// Pin position within a port, a bit index into the 8-bit registers.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PinNumber {
    Pin0,
    Pin1,
    Pin2,
    Pin3,
    Pin4,
    Pin5,
    Pin6,
    Pin7,
}

impl TryFrom<u8> for PinNumber {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(PinNumber::Pin0),
            1 => Ok(PinNumber::Pin1),
            2 => Ok(PinNumber::Pin2),
            3 => Ok(PinNumber::Pin3),
            4 => Ok(PinNumber::Pin4),
            5 => Ok(PinNumber::Pin5),
            6 => Ok(PinNumber::Pin6),
            7 => Ok(PinNumber::Pin7),
            _ => Err(Error::InvalidParameter),
        }
    }
}

impl PinNumber {
    /// Lowest set bit of a flag byte, as a pin. `None` when no bit is set.
    ///
    /// The INTF register may carry several flags at once; servicing code
    /// handles the lowest-numbered pin first and re-polls for the rest.
    pub fn lowest_set(byte: u8) -> Option<PinNumber> {
        PinNumber::try_from(byte.trailing_zeros() as u8).ok()
    }
}

/// Pin direction. The chip encodes input as bit value 1.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    /// Pin drives its output latch.
    Output = 0,
    /// Pin reads external state.
    Input = 1,
}

/// A digital pin level.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PinSet {
    /// Logic low.
    Low = 0,
    /// Logic high.
    High = 1,
}

impl PinSet {
    /// Maps a register bit (0 or nonzero) to a level.
    #[inline]
    pub fn from_bit(bit: u8) -> PinSet {
        match bit {
            0 => PinSet::Low,
            _ => PinSet::High,
        }
    }
}

/// Input polarity of a pin as seen through the GPIO register.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Polarity {
    /// GPIO bit matches the pin level.
    NotInverted = 0,
    /// GPIO bit is the opposite of the pin level.
    Inverted = 1,
}

/// Interrupt trigger condition for one pin.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InterruptMode {
    /// Fire on any transition.
    Change,
    /// Fire when the pin goes high (compare against DEFVAL bit 0).
    Rising,
    /// Fire when the pin goes low (compare against DEFVAL bit 1).
    Falling,
}

/// Whether the two INT output pins of the chip are tied together.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InterruptMirror {
    /// INTA and INTB both signal interrupts from either port.
    Connected,
    /// Each INT pin signals only its own port.
    Independent,
}

/// IOCON bit controlling INT pin mirroring.
pub(crate) const IOCON_MIRROR: u8 = 0b0100_0000;

/// Driver errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The bus transaction did not complete.
    CommunicationErr,
    /// A port or pin index was out of range.
    InvalidParameter,
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::CommunicationErr => write!(f, "I2C communication failure"),
            Error::InvalidParameter => write!(f, "Invalid Parameter"),
        }
    }
}

/// Collapses a transport error into the driver error.
pub(crate) fn i2c_comm_error<E>(_: E) -> Error {
    Error::CommunicationErr
}

/// Sets the bit for `pin` in a register byte.
#[inline]
pub fn bit_set(byte: u8, pin: PinNumber) -> u8 {
    byte | (1 << pin as u8)
}

/// Clears the bit for `pin` in a register byte.
#[inline]
pub fn bit_clear(byte: u8, pin: PinNumber) -> u8 {
    byte & !(1 << pin as u8)
}

/// Reads the bit for `pin` out of a register byte, as 0 or 1.
#[inline]
pub fn bit_read(byte: u8, pin: PinNumber) -> u8 {
    (byte >> pin as u8) & 1
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_address_per_port() {
        assert_eq!(0x00, Register::Iodir.in_port(Port::A));
        assert_eq!(0x01, Register::Iodir.in_port(Port::B));
        assert_eq!(0x12, Register::Gpio.in_port(Port::A));
        assert_eq!(0x13, Register::Gpio.in_port(Port::B));
        assert_eq!(0x15, Register::Olat.in_port(Port::B));
    }

    #[test]
    fn test_bit_set() {
        assert_eq!(0b10000000, bit_set(0b00000000, PinNumber::Pin7));
        assert_eq!(0b00010100, bit_set(0b00010000, PinNumber::Pin2));
    }

    #[test]
    fn test_bit_clear() {
        assert_eq!(0b01111111, bit_clear(0b11111111, PinNumber::Pin7));
        assert_eq!(0b00010000, bit_clear(0b00010100, PinNumber::Pin2));
    }

    #[test]
    fn test_bit_read() {
        assert_eq!(1, bit_read(0b10000000, PinNumber::Pin7));
        assert_eq!(0, bit_read(0b01111111, PinNumber::Pin7));
    }

    #[test]
    fn test_port_try_from() {
        assert_eq!(Ok(Port::A), Port::try_from(0));
        assert_eq!(Ok(Port::B), Port::try_from(1));
        assert_eq!(Err(Error::InvalidParameter), Port::try_from(2));
    }

    #[test]
    fn test_pin_try_from() {
        assert_eq!(Ok(PinNumber::Pin0), PinNumber::try_from(0));
        assert_eq!(Ok(PinNumber::Pin7), PinNumber::try_from(7));
        assert_eq!(Err(Error::InvalidParameter), PinNumber::try_from(8));
        assert_eq!(Err(Error::InvalidParameter), PinNumber::try_from(0xff));
    }

    #[test]
    fn test_lowest_set() {
        assert_eq!(Some(PinNumber::Pin0), PinNumber::lowest_set(0b00000001));
        // several flags at once report the lowest pin
        assert_eq!(Some(PinNumber::Pin1), PinNumber::lowest_set(0b00000110));
        assert_eq!(Some(PinNumber::Pin7), PinNumber::lowest_set(0b10000000));
        assert_eq!(None, PinNumber::lowest_set(0x00));
    }
}
