//! The MCP23017 device handle and its operations.
//!
//! Every operation here is one or more immediate bus transactions; nothing is
//! queued and no register content is cached. Multi-transaction sequences
//! (anything configuring a single pin) are read-modify-write and therefore
//! race with any other bus master touching the same register.

use crate::interface::RegisterAccess;
use crate::registers::*;
use crate::{resolve_address, rtt_trace, SlaveAddressing};

use byteorder::{ByteOrder, LittleEndian};
#[cfg(not(feature = "async"))]
use embedded_hal::i2c::I2c;
#[cfg(feature = "async")]
use embedded_hal_async::i2c::I2c;

/// Handle for one MCP23017 on the bus.
///
/// Owns the bus handle (share the bus upstream if several drivers need it)
/// and the resolved slave address, which is immutable for the lifetime of
/// the handle.
#[derive(Debug, Clone)]
pub struct Mcp23017<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Mcp23017<I2C> {
    /// Creates a handle, normalizing `address` per [`resolve_address`].
    ///
    /// Construction never fails; the device is not probed. The first
    /// register access reports whether anything answers at the address.
    #[inline]
    pub fn new(i2c: I2C, address: u8) -> Self {
        let address = resolve_address(address);
        rtt_trace!("mcp23017: bound address {:#04x}", address);
        Mcp23017 { i2c, address }
    }

    /// Creates a handle from the three hardware address straps.
    #[inline]
    pub fn with_address_pins(
        i2c: I2C,
        a0: SlaveAddressing,
        a1: SlaveAddressing,
        a2: SlaveAddressing,
    ) -> Self {
        Self::new(i2c, crate::convert_slave_address(a0, a1, a2))
    }

    /// The bound 7-bit slave address, always within [0x20, 0x27].
    #[inline]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consumes the handle and returns the bus.
    #[inline]
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Mcp23017",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> RegisterAccess for Mcp23017<I2C>
where
    I2C: I2c<Error = E>,
{
    #[inline]
    async fn read_register(&mut self, register: Register, port: Port) -> Result<u8, Error> {
        let mut rx_buffer: [u8; 1] = [0; 1];
        self.i2c
            .write_read(self.address, &[register.in_port(port)], &mut rx_buffer)
            .await
            .map_err(i2c_comm_error)?;
        Ok(rx_buffer[0])
    }

    #[inline]
    async fn write_register(
        &mut self,
        register: Register,
        port: Port,
        value: u8,
    ) -> Result<(), Error> {
        self.i2c
            .write(self.address, &[register.in_port(port), value])
            .await
            .map_err(i2c_comm_error)?;
        Ok(())
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Mcp23017",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> Mcp23017<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Read-modify-write of one bit, starting from the live register value
    /// so the other pins of the port keep their configuration.
    async fn update_bit(
        &mut self,
        register: Register,
        port: Port,
        pin: PinNumber,
        set: bool,
    ) -> Result<(), Error> {
        let current = self.read_register(register, port).await?;
        let value = if set {
            bit_set(current, pin)
        } else {
            bit_clear(current, pin)
        };
        self.write_register(register, port, value).await
    }

    /// Configures one pin as input or output (IODIR).
    #[inline]
    pub async fn set_pin_direction(
        &mut self,
        port: Port,
        pin: PinNumber,
        direction: Direction,
    ) -> Result<(), Error> {
        self.update_bit(Register::Iodir, port, pin, direction == Direction::Input)
            .await
    }

    /// Enables or disables the weak pull-up of one pin (GPPU).
    #[inline]
    pub async fn set_pull_up(
        &mut self,
        port: Port,
        pin: PinNumber,
        pull: PinSet,
    ) -> Result<(), Error> {
        self.update_bit(Register::Gppu, port, pin, pull == PinSet::High)
            .await
    }

    /// Sets the input polarity inversion of one pin (IPOL).
    #[inline]
    pub async fn set_input_polarity(
        &mut self,
        port: Port,
        pin: PinNumber,
        polarity: Polarity,
    ) -> Result<(), Error> {
        self.update_bit(Register::Ipol, port, pin, polarity == Polarity::Inverted)
            .await
    }

    /// Reads the live level of one pin (GPIO).
    pub async fn read_pin(&mut self, port: Port, pin: PinNumber) -> Result<PinSet, Error> {
        let gpio = self.read_register(Register::Gpio, port).await?;
        Ok(PinSet::from_bit(bit_read(gpio, pin)))
    }

    /// Drives one output pin (OLAT).
    ///
    /// Goes through the output latch, not the GPIO register: the latch is
    /// what the chip keeps driving onto pins configured as outputs.
    #[inline]
    pub async fn write_pin(
        &mut self,
        port: Port,
        pin: PinNumber,
        value: PinSet,
    ) -> Result<(), Error> {
        self.update_bit(Register::Olat, port, pin, value == PinSet::High)
            .await
    }

    /// Reads the live levels of a whole port (GPIO).
    #[inline]
    pub async fn read_port(&mut self, port: Port) -> Result<u8, Error> {
        self.read_register(Register::Gpio, port).await
    }

    /// Drives a whole port at once (OLAT).
    #[inline]
    pub async fn write_port(&mut self, port: Port, value: u8) -> Result<(), Error> {
        self.write_register(Register::Olat, port, value).await
    }

    /// Reads both ports in one transaction. Port A is the low byte.
    pub async fn read_all(&mut self) -> Result<u16, Error> {
        let mut rx_buffer: [u8; 2] = [0; 2];
        self.i2c
            .write_read(
                self.address,
                &[Register::Gpio.in_port(Port::A)],
                &mut rx_buffer,
            )
            .await
            .map_err(i2c_comm_error)?;
        Ok(LittleEndian::read_u16(&rx_buffer))
    }

    /// Drives both ports in one transaction. Port A is the low byte.
    pub async fn write_all(&mut self, value: u16) -> Result<(), Error> {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.i2c
            .write(
                self.address,
                &[Register::Olat.in_port(Port::A), bytes[0], bytes[1]],
            )
            .await
            .map_err(i2c_comm_error)?;
        Ok(())
    }

    /// Arms the interrupt of one pin.
    ///
    /// Reads GPINTEN, INTCON and DEFVAL, folds the pin's configuration into
    /// them and writes all three back:
    /// - [`InterruptMode::Change`] clears the INTCON bit, firing on any
    ///   transition; the pin's DEFVAL bit is left as read.
    /// - [`InterruptMode::Rising`]/[`InterruptMode::Falling`] set the INTCON
    ///   bit and point DEFVAL at the level the pin must *leave* to trigger
    ///   (0 for rising, 1 for falling).
    pub async fn enable_interrupt(
        &mut self,
        port: Port,
        pin: PinNumber,
        mode: InterruptMode,
    ) -> Result<(), Error> {
        let mut gpinten = self.read_register(Register::Gpinten, port).await?;
        let mut intcon = self.read_register(Register::Intcon, port).await?;
        let mut defval = self.read_register(Register::Defval, port).await?;

        gpinten = bit_set(gpinten, pin);
        match mode {
            InterruptMode::Change => {
                intcon = bit_clear(intcon, pin);
            }
            InterruptMode::Rising => {
                intcon = bit_set(intcon, pin);
                defval = bit_clear(defval, pin);
            }
            InterruptMode::Falling => {
                intcon = bit_set(intcon, pin);
                defval = bit_set(defval, pin);
            }
        }

        rtt_trace!("mcp23017: enable irq port {:?} pin {:?}", port, pin);
        self.write_interrupt_registers(port, gpinten, intcon, defval)
            .await
    }

    /// Disarms the interrupt of one pin.
    ///
    /// Clears only the GPINTEN bit; the pin's INTCON and DEFVAL bits are
    /// written back as read, so a later re-enable with the same mode finds
    /// them untouched.
    pub async fn disable_interrupt(&mut self, port: Port, pin: PinNumber) -> Result<(), Error> {
        let gpinten = self.read_register(Register::Gpinten, port).await?;
        let intcon = self.read_register(Register::Intcon, port).await?;
        let defval = self.read_register(Register::Defval, port).await?;

        rtt_trace!("mcp23017: disable irq port {:?} pin {:?}", port, pin);
        self.write_interrupt_registers(port, bit_clear(gpinten, pin), intcon, defval)
            .await
    }

    /// All three interrupt registers are written even when an earlier write
    /// fails; the first error is the one reported.
    async fn write_interrupt_registers(
        &mut self,
        port: Port,
        gpinten: u8,
        intcon: u8,
        defval: u8,
    ) -> Result<(), Error> {
        let enable = self.write_register(Register::Gpinten, port, gpinten).await;
        let control = self.write_register(Register::Intcon, port, intcon).await;
        let compare = self.write_register(Register::Defval, port, defval).await;
        enable.and(control).and(compare)
    }

    /// The lowest-numbered pin with a pending interrupt flag (INTF), or
    /// `None` when the port has no pending interrupt.
    ///
    /// When several pins fired at once only the lowest is reported; service
    /// it and poll again for the rest.
    pub async fn interrupt_pin(&mut self, port: Port) -> Result<Option<PinNumber>, Error> {
        let flags = self.read_register(Register::Intf, port).await?;
        Ok(PinNumber::lowest_set(flags))
    }

    /// The level of one pin as latched at the moment its interrupt fired
    /// (INTCAP).
    ///
    /// This is a captured *level*, not a computed edge direction: `High`
    /// means the pin was high when the interrupt condition was detected. For
    /// a single clean transition that coincides with the edge direction, but
    /// deriving edges is the caller's business.
    pub async fn captured_pin_state(
        &mut self,
        port: Port,
        pin: PinNumber,
    ) -> Result<PinSet, Error> {
        let capture = self.read_register(Register::Intcap, port).await?;
        Ok(PinSet::from_bit(bit_read(capture, pin)))
    }

    /// Ties the INTA/INTB output pins together or keeps them per-port
    /// (IOCON.MIRROR, mirrored into both ports' IOCON copies).
    pub async fn set_interrupt_mirror(&mut self, mirror: InterruptMirror) -> Result<(), Error> {
        for port in [Port::A, Port::B] {
            let iocon = self.read_register(Register::Iocon, port).await?;
            let value = match mirror {
                InterruptMirror::Connected => iocon | IOCON_MIRROR,
                InterruptMirror::Independent => iocon & !IOCON_MIRROR,
            };
            self.write_register(Register::Iocon, port, value).await?;
        }
        Ok(())
    }
}
