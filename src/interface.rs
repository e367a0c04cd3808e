//! The register-access seam every higher-level operation funnels through.

use crate::registers::{Error, Port, Register};

/// Single-byte access to an addressed chip register.
///
/// This is the only place the driver touches the bus; pin configuration,
/// digital I/O and interrupt servicing are all read-modify-write sequences
/// built on these two calls.
#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self,),
    async(feature = "async", keep_self)
)]
pub trait RegisterAccess {
    /// Reads one register of one port: a register-address write followed by
    /// a one-byte read, as a single bus transaction.
    async fn read_register(&mut self, register: Register, port: Port) -> Result<u8, Error>;

    /// Writes one register of one port: register address and data byte in a
    /// single bus transaction.
    async fn write_register(&mut self, register: Register, port: Port, value: u8)
        -> Result<(), Error>;
}
