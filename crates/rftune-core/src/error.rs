//! Error types for rftune-core
//!
//! Backend crates carry their own richer error enums (with `std::io::Error`
//! sources) and map down to this flat type where they cross the
//! [`RegisterBus`](crate::bus::RegisterBus) boundary.

use thiserror::Error;

/// Core error type - flat and `Copy`, shared by all backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// SPI register address does not fit in the 15-bit address field
    #[error("SPI register address 0x{addr:04X} does not fit in 15 bits")]
    AddressOutOfRange {
        /// The rejected address
        addr: u32,
    },

    /// The bridge never raised its done flag within the poll budget
    #[error("SPI transfer did not complete within {polls} status polls")]
    TransferTimeout {
        /// Number of status polls performed before giving up
        polls: u32,
    },

    /// A control/status register access failed in the backend
    #[error("register bus access failed")]
    BusFault,
}

/// Result type alias using the core error type
pub type Result<T> = core::result::Result<T, Error>;
