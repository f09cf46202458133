//! rftune-litepcie - LitePCIe device backend
//!
//! Implements [`rftune_core::bus::RegisterBus`] on top of the LitePCIe
//! kernel driver's register ioctl, against a `/dev/litepcieX` device node.

pub mod device;
pub mod error;

pub use device::LitePcieDevice;
pub use error::{LitePcieError, Result};
