//! LitePCIe device implementation
//!
//! This module provides the `LitePcieDevice` struct that implements the
//! `RegisterBus` trait using the LitePCIe kernel driver's register ioctl.

use crate::error::{LitePcieError, Result};

use rftune_core::bus::{Csr, RegisterBus};
use rftune_core::error::{Error as CoreError, Result as CoreResult};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// CSR byte addresses of the registers rftune uses
///
/// These match the generated `csr.h` of the bundled gateware. The SPI
/// bridge is a LiteX SPIMaster instance wired to the LMS7002M.
pub mod csr {
    /// Scratch register in the ctrl block
    pub const CTRL_SCRATCH: u32 = 0x0004;

    /// Base of the LMS7002M SPI master block
    pub const LMS7002M_SPI_BASE: u32 = 0x3000;
    /// Transfer-length / start register
    pub const LMS7002M_SPI_CONTROL: u32 = LMS7002M_SPI_BASE;
    /// Done flag register
    pub const LMS7002M_SPI_STATUS: u32 = LMS7002M_SPI_BASE + 0x04;
    /// Outgoing command word
    pub const LMS7002M_SPI_MOSI: u32 = LMS7002M_SPI_BASE + 0x08;
    /// Incoming response word
    pub const LMS7002M_SPI_MISO: u32 = LMS7002M_SPI_BASE + 0x0C;
}

/// LitePCIe register ioctl plumbing
mod ioctl {
    use nix::ioctl_readwrite;

    // LitePCIe ioctl magic number
    const LITEPCIE_IOCTL_MAGIC: u8 = b'S';

    /// Must match the kernel driver's `struct litepcie_ioctl_reg`
    #[repr(C)]
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LitepcieIoctlReg {
        pub addr: u32,
        pub val: u32,
        pub is_write: u8,
    }

    ioctl_readwrite!(litepcie_reg, LITEPCIE_IOCTL_MAGIC, 0, LitepcieIoctlReg);
}

/// An open LitePCIe device node
///
/// Owns the file handle for the process lifetime; exactly one handle per
/// device, passed by reference into the transaction engine. Dropping the
/// device closes the node.
pub struct LitePcieDevice {
    file: File,
    path: String,
}

impl LitePcieDevice {
    /// Open a LitePCIe device node (e.g. `/dev/litepcie0`)
    pub fn open(path: &str) -> Result<Self> {
        log::debug!("litepcie: Opening device {}", path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LitePcieError::OpenFailed {
                path: path.to_string(),
                source: e,
            })?;

        log::info!("litepcie: Opened {}", path);

        Ok(Self {
            file,
            path: path.to_string(),
        })
    }

    /// The device node path this handle was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read a 32-bit CSR at a raw byte address
    pub fn readl(&mut self, addr: u32) -> Result<u32> {
        let mut reg = ioctl::LitepcieIoctlReg {
            addr,
            val: 0,
            is_write: 0,
        };
        unsafe {
            ioctl::litepcie_reg(self.file.as_raw_fd(), &mut reg).map_err(|e| {
                LitePcieError::RegAccessFailed {
                    addr,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }
        Ok(reg.val)
    }

    /// Write a 32-bit CSR at a raw byte address
    pub fn writel(&mut self, addr: u32, value: u32) -> Result<()> {
        let mut reg = ioctl::LitepcieIoctlReg {
            addr,
            val: value,
            is_write: 1,
        };
        unsafe {
            ioctl::litepcie_reg(self.file.as_raw_fd(), &mut reg).map_err(|e| {
                LitePcieError::RegAccessFailed {
                    addr,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }
        Ok(())
    }
}

/// Byte address of a named register
fn csr_addr(reg: Csr) -> u32 {
    match reg {
        Csr::SpiMosi => csr::LMS7002M_SPI_MOSI,
        Csr::SpiControl => csr::LMS7002M_SPI_CONTROL,
        Csr::SpiStatus => csr::LMS7002M_SPI_STATUS,
        Csr::SpiMiso => csr::LMS7002M_SPI_MISO,
        Csr::CtrlScratch => csr::CTRL_SCRATCH,
    }
}

impl RegisterBus for LitePcieDevice {
    fn read32(&mut self, reg: Csr) -> CoreResult<u32> {
        self.readl(csr_addr(reg)).map_err(|e| {
            log::error!("litepcie: {}", e);
            CoreError::BusFault
        })
    }

    fn write32(&mut self, reg: Csr, value: u32) -> CoreResult<()> {
        self.writel(csr_addr(reg), value).map_err(|e| {
            log::error!("litepcie: {}", e);
            CoreError::BusFault
        })
    }
}
