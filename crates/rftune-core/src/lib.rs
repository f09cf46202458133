//! rftune-core - Register-bus abstraction and SPI transaction engine
//!
//! This crate provides the pieces shared by every rftune backend:
//!
//! - [`bus::RegisterBus`] - the interface a device backend implements to
//!   expose the bridge's memory-mapped control/status registers
//! - [`spi::SpiOp`] / [`spi::SpiReply`] - the in-memory model of one SPI
//!   register transaction and its 32-bit wire encoding
//! - [`engine::SpiEngine`] - the transaction engine that drives the
//!   single-slot SPI bridge over a busy-poll completion protocol
//!
//! # Example
//!
//! ```ignore
//! use rftune_core::{engine::SpiEngine, spi::SpiOp};
//!
//! fn read_version<B: rftune_core::bus::RegisterBus>(bus: B) -> rftune_core::Result<u16> {
//!     let mut engine = SpiEngine::new(bus);
//!     engine.read_reg(0x002F)
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bus;
pub mod engine;
pub mod error;
pub mod spi;

pub use error::{Error, Result};
