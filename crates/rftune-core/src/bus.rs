//! Register I/O abstraction
//!
//! A device backend exposes the SPI bridge through a handful of named
//! 32-bit control/status registers. Backends know the byte addresses of
//! these registers (they come from the gateware's generated CSR map); the
//! engine only ever names them through [`Csr`].

use crate::error::Result;

/// The control/status registers the transaction engine consumes
///
/// `CtrlScratch` is not part of the SPI cycle; it is a read/write dummy
/// register used as a liveness check after opening the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Csr {
    /// Outgoing 32-bit SPI command word
    SpiMosi,
    /// Transfer-length / start-flag register
    SpiControl,
    /// Completion (done) flag register
    SpiStatus,
    /// Incoming 32-bit SPI response word
    SpiMiso,
    /// Scratch register, no hardware side effects
    CtrlScratch,
}

/// Synchronous access to the device's control/status registers
///
/// Every call is immediately observable by hardware: no queuing, no
/// reordering. The engine relies on this to sequence the MOSI write, the
/// start strobe and the status polls of one transfer.
///
/// Implementations are single-owner; the bridge has a single in-flight
/// transaction slot, so concurrent callers would corrupt the MOSI/MISO
/// protocol. Callers that share a bus across threads must add their own
/// mutual exclusion.
pub trait RegisterBus {
    /// Read a 32-bit control/status register
    fn read32(&mut self, reg: Csr) -> Result<u32>;

    /// Write a 32-bit control/status register
    fn write32(&mut self, reg: Csr, value: u32) -> Result<()>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read32(&mut self, reg: Csr) -> Result<u32> {
        (**self).read32(reg)
    }

    fn write32(&mut self, reg: Csr, value: u32) -> Result<()> {
        (**self).write32(reg, value)
    }
}

// Boxed buses as trait objects, for callers that pick a backend at runtime
impl RegisterBus for Box<dyn RegisterBus + Send> {
    fn read32(&mut self, reg: Csr) -> Result<u32> {
        (**self).read32(reg)
    }

    fn write32(&mut self, reg: Csr, value: u32) -> Result<()> {
        (**self).write32(reg, value)
    }
}
