//! rftune-dummy - In-memory device emulator for testing
//!
//! Emulates the LitePCIe CSR surface rftune drives: the scratch register,
//! the single-slot SPI bridge, and enough LMS7002M behavior (version
//! word, VCO comparators) for bring-up and tuning to run end to end
//! without hardware.

use rftune_core::bus::{Csr, RegisterBus};
use rftune_core::error::Result;
use rftune_core::spi::{SpiControl, SpiOp, SpiStatus};

/// Chip-model constants, mirroring the slice of the LMS7002M register
/// map the emulator gives behavior to
mod lms7 {
    /// Version/revision/mask word
    pub const VERSION: u16 = 0x002F;
    /// VCO capacitor bank word, CSW in \[8:1\]
    pub const VCO_CSW: u16 = 0x008B;
    /// VCO comparator readback, CMPHO \[13\] CMPLO \[12\]
    pub const VCO_CMP: u16 = 0x008C;
    pub const CSW_SHIFT: u32 = 1;
    pub const CMP_SHIFT: u32 = 12;
}

/// Configuration for the emulated device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Scratch register reset value
    pub scratch: u32,
    /// Number of not-done status polls before a transfer reports done
    pub done_after: u32,
    /// Version word the chip model returns
    pub version: u16,
    /// Whether the VCO comparators can ever report lock
    pub vco_locks: bool,
    /// Capacitor word at which the VCO locks
    pub target_csw: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            // LitePCIe ctrl block reset value
            scratch: 0x1234_5678,
            done_after: 0,
            version: 0x3841,
            vco_locks: true,
            target_csw: 0x5A,
        }
    }
}

/// Emulated LitePCIe device with an LMS7002M behind the SPI bridge
pub struct DummyDevice {
    config: DummyConfig,
    scratch: u32,
    regs: Vec<u16>,
    mosi: u32,
    miso: u32,
    pending_polls: u32,
    busy: bool,
    status_polls: u32,
    log: Vec<SpiOp>,
}

impl DummyDevice {
    /// Create an emulated device with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let mut regs = vec![0u16; 1 << 15];
        regs[usize::from(lms7::VERSION)] = config.version;
        Self {
            scratch: config.scratch,
            config,
            regs,
            mosi: 0,
            miso: 0,
            pending_polls: 0,
            busy: false,
            status_polls: 0,
            log: Vec::new(),
        }
    }

    /// Create an emulated device with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Every SPI operation the bridge executed, in order
    pub fn transactions(&self) -> &[SpiOp] {
        &self.log
    }

    /// Total number of status-register reads observed
    pub fn status_polls(&self) -> u32 {
        self.status_polls
    }

    /// Peek at a chip register
    pub fn chip_reg(&self, addr: u16) -> u16 {
        self.regs[usize::from(addr)]
    }

    /// The configuration this device was built with
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    fn start_transfer(&mut self) {
        let op = SpiOp::from_word(self.mosi);
        log::trace!("dummy: executing {:?}", op);
        match op {
            SpiOp::Write { addr, value } => {
                self.regs[usize::from(addr)] = value;
            }
            SpiOp::Read { addr } => {
                self.miso = u32::from(self.chip_read(addr));
            }
        }
        self.log.push(op);
        self.pending_polls = self.config.done_after;
        self.busy = true;
    }

    /// Chip-side read, with the comparator register computed from the
    /// programmed capacitor word
    fn chip_read(&self, addr: u16) -> u16 {
        if addr == lms7::VCO_CMP {
            if !self.config.vco_locks {
                return 0;
            }
            let csw = (self.regs[usize::from(lms7::VCO_CSW)] >> lms7::CSW_SHIFT) & 0xFF;
            let cmp = match csw.cmp(&u16::from(self.config.target_csw)) {
                // below target capacitance: oscillating too fast
                std::cmp::Ordering::Less => 0b11,
                std::cmp::Ordering::Equal => 0b10,
                std::cmp::Ordering::Greater => 0b00,
            };
            return cmp << lms7::CMP_SHIFT;
        }
        self.regs[usize::from(addr)]
    }
}

impl RegisterBus for DummyDevice {
    fn read32(&mut self, reg: Csr) -> Result<u32> {
        match reg {
            Csr::SpiStatus => {
                self.status_polls += 1;
                if self.busy && self.pending_polls > 0 {
                    self.pending_polls -= 1;
                    Ok(0)
                } else {
                    self.busy = false;
                    Ok(SpiStatus::DONE.bits())
                }
            }
            Csr::SpiMiso => Ok(self.miso),
            Csr::SpiMosi => Ok(self.mosi),
            Csr::SpiControl => Ok(0),
            Csr::CtrlScratch => Ok(self.scratch),
        }
    }

    fn write32(&mut self, reg: Csr, value: u32) -> Result<()> {
        match reg {
            Csr::SpiMosi => self.mosi = value,
            Csr::SpiControl => {
                if SpiControl::from_bits_truncate(value).contains(SpiControl::START) {
                    self.start_transfer();
                }
            }
            Csr::CtrlScratch => self.scratch = value,
            Csr::SpiStatus | Csr::SpiMiso => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rftune_core::engine::SpiEngine;

    #[test]
    fn scratch_register_reads_back() {
        let mut dev = DummyDevice::new(DummyConfig {
            scratch: 0xDEAD_BEEF,
            ..Default::default()
        });
        assert_eq!(dev.read32(Csr::CtrlScratch).unwrap(), 0xDEAD_BEEF);
        dev.write32(Csr::CtrlScratch, 0x5555_AAAA).unwrap();
        assert_eq!(dev.read32(Csr::CtrlScratch).unwrap(), 0x5555_AAAA);
    }

    #[test]
    fn chip_register_write_read_roundtrip() {
        let mut dev = DummyDevice::new_default();
        let mut engine = SpiEngine::new(&mut dev);
        engine.write_reg(0x0123, 0xABCD).unwrap();
        assert_eq!(engine.read_reg(0x0123).unwrap(), 0xABCD);
        drop(engine);
        assert_eq!(dev.chip_reg(0x0123), 0xABCD);
    }

    #[test]
    fn version_word_is_configurable() {
        let mut dev = DummyDevice::new(DummyConfig {
            version: 0x7777,
            ..Default::default()
        });
        let mut engine = SpiEngine::new(&mut dev);
        assert_eq!(engine.read_reg(0x002F).unwrap(), 0x7777);
    }

    #[test]
    fn done_flag_is_gated_by_poll_count() {
        let mut dev = DummyDevice::new(DummyConfig {
            done_after: 3,
            ..Default::default()
        });
        let mut engine = SpiEngine::new(&mut dev);
        engine.write_reg(0x0001, 1).unwrap();
        drop(engine);
        // three not-done polls, then the observing one
        assert_eq!(dev.status_polls(), 4);
    }

    #[test]
    fn transaction_log_preserves_order() {
        let ops = [
            SpiOp::write(0x0010, 1).unwrap(),
            SpiOp::read(0x0010).unwrap(),
            SpiOp::write(0x0011, 2).unwrap(),
        ];
        let mut dev = DummyDevice::new_default();
        let mut engine = SpiEngine::new(&mut dev);
        engine.transact_many(&ops).unwrap();
        drop(engine);
        assert_eq!(dev.transactions(), &ops[..]);
    }
}
