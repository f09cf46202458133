//! LMS7002M front-end driver
//!
//! A thin, bring-up oriented slice of the chip: soft reset, version
//! check, and CGEN PLL programming. All register traffic goes through the
//! SPI transaction engine; this crate never touches the bridge registers
//! directly.

use crate::cgen::CgenPlan;
use crate::error::Lms7Error;
use crate::regs;
use crate::tune::{CgenTuner, ClkSel};

use rftune_core::bus::RegisterBus;
use rftune_core::engine::SpiEngine;
use rftune_core::spi::SpiOp;

/// Reference clock of the supported boards
pub const DEFAULT_REFCLK_HZ: f64 = 26_000_000.0;

/// VCO comparator readback states
///
/// CMPHO set alone means the oscillator amplitude is inside the window;
/// both set means the frequency is above it (more capacitance needed),
/// both clear means below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VcoCmp {
    InRange,
    TooFast,
    TooSlow,
}

/// An LMS7002M behind a SPI transaction engine
///
/// Owns the engine (and through it the register bus) for the lifetime of
/// the bring-up session. Single owner; the chip's SPI port has one
/// transaction slot.
pub struct Lms7<B> {
    engine: SpiEngine<B>,
    refclk_hz: f64,
}

impl<B: RegisterBus> Lms7<B> {
    /// Wrap a register bus, assuming the default reference clock
    pub fn new(bus: B) -> Self {
        Self::with_refclk(bus, DEFAULT_REFCLK_HZ)
    }

    /// Wrap a register bus with a non-default reference clock
    pub fn with_refclk(bus: B, refclk_hz: f64) -> Self {
        Self {
            engine: SpiEngine::new(bus),
            refclk_hz,
        }
    }

    /// Access the underlying transaction engine
    pub fn engine_mut(&mut self) -> &mut SpiEngine<B> {
        &mut self.engine
    }

    /// One-time chip bring-up
    ///
    /// Pulses the top-level enable word through a soft reset, verifies
    /// the silicon version over SPI, then powers the CGEN block. Tuning
    /// is meaningless until this has succeeded.
    pub fn enable(&mut self) -> Result<(), Lms7Error> {
        self.engine.write_reg(regs::CONFIG, regs::CONFIG_RESET)?;
        self.engine.write_reg(regs::CONFIG, regs::CONFIG_ENABLE)?;

        let found = self.engine.read_reg(regs::VERSION)?;
        if found != regs::EXPECTED_VERSION {
            return Err(Lms7Error::UnexpectedChipVersion {
                found,
                expected: regs::EXPECTED_VERSION,
            });
        }
        log::info!("lms7: chip version word 0x{:04X}", found);

        self.engine.write_reg(regs::CGEN_CFG, regs::CGEN_CFG_ENABLE)?;
        Ok(())
    }

    /// Binary-search the VCO capacitor bank until the comparators report
    /// lock
    fn search_vco_csw(&mut self, freq_hz: f64) -> Result<(), Lms7Error> {
        let mut lo = 0i32;
        let mut hi = 255i32;
        while lo <= hi {
            let csw = (lo + hi) / 2;
            self.engine
                .write_reg(regs::CGEN_VCO_CSW, (csw as u16) << regs::CSW_VCO_SHIFT)?;
            match self.read_vco_cmp()? {
                VcoCmp::InRange => {
                    log::debug!("cgen: VCO locked with CSW {}", csw);
                    return Ok(());
                }
                VcoCmp::TooFast => lo = csw + 1,
                VcoCmp::TooSlow => hi = csw - 1,
            }
        }
        Err(Lms7Error::VcoNotLocked { freq_hz })
    }

    fn read_vco_cmp(&mut self) -> Result<VcoCmp, Lms7Error> {
        let word = self.engine.read_reg(regs::CGEN_VCO_CMP)?;
        let cmp = (word >> regs::VCO_CMP_SHIFT) & regs::VCO_CMP_MASK;
        Ok(match cmp {
            0b10 => VcoCmp::InRange,
            0b11 => VcoCmp::TooFast,
            _ => VcoCmp::TooSlow,
        })
    }
}

impl<B: RegisterBus> CgenTuner for Lms7<B> {
    fn cgen_tune(&mut self, freq_hz: f64, clk_sel: ClkSel) -> Result<(), Lms7Error> {
        let plan = CgenPlan::compute(freq_hz, self.refclk_hz)?;
        log::debug!(
            "cgen: vco {} Hz, int {}, frac {}, div_outch {}",
            plan.vco_hz,
            plan.int_sdm,
            plan.frac_sdm,
            plan.div_outch
        );

        let ops = [
            SpiOp::write(regs::CGEN_SDM_FRAC_LO, plan.frac_lo())?,
            SpiOp::write(regs::CGEN_SDM_HI, plan.sdm_hi())?,
            SpiOp::write(regs::CGEN_DIV, plan.div_word(clk_sel))?,
        ];
        self.engine.transact_many(&ops)?;

        self.search_vco_csw(freq_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tune::{tune_cgen, TuneError, DEFAULT_TUNE_ATTEMPTS};
    use rftune_core::bus::{Csr, RegisterBus};
    use rftune_dummy::{DummyConfig, DummyDevice};

    #[test]
    fn enable_accepts_known_silicon() {
        let mut dev = DummyDevice::new_default();
        let mut chip = Lms7::new(&mut dev);
        chip.enable().unwrap();
    }

    #[test]
    fn enable_rejects_unknown_silicon() {
        let mut dev = DummyDevice::new(DummyConfig {
            version: 0x1234,
            ..Default::default()
        });
        let mut chip = Lms7::new(&mut dev);
        let err = chip.enable().unwrap_err();
        assert!(matches!(
            err,
            Lms7Error::UnexpectedChipVersion { found: 0x1234, .. }
        ));
    }

    #[test]
    fn tune_locks_over_the_emulated_chip() {
        let mut dev = DummyDevice::new_default();
        let mut chip = Lms7::new(&mut dev);
        chip.enable().unwrap();
        chip.cgen_tune(801e6, ClkSel::Div1).unwrap();
    }

    #[test]
    fn stuck_vco_exhausts_the_budget() {
        let mut dev = DummyDevice::new(DummyConfig {
            vco_locks: false,
            ..Default::default()
        });
        let mut chip = Lms7::new(&mut dev);
        chip.enable().unwrap();
        let err = tune_cgen(&mut chip, 801e6, &[1u32; 5]).unwrap_err();
        assert_eq!(err, TuneError::Exhausted { attempts: 5 });
    }

    #[test]
    fn bring_up_flow_over_dummy_device() {
        // The full orchestration the binary performs: scratch check,
        // enable, tune; locks on the first attempt.
        let mut dev = DummyDevice::new(DummyConfig {
            scratch: 0xDEAD_BEEF,
            ..Default::default()
        });
        assert_eq!(dev.read32(Csr::CtrlScratch).unwrap(), 0xDEAD_BEEF);

        let mut chip = Lms7::new(&mut dev);
        chip.enable().unwrap();
        tune_cgen(&mut chip, 801e6, &[1u32; DEFAULT_TUNE_ATTEMPTS]).unwrap();
        drop(chip);

        // first-attempt lock: the divider word was programmed exactly once
        let div_writes = dev
            .transactions()
            .iter()
            .filter(|op| op.is_write() && op.addr() == regs::CGEN_DIV)
            .count();
        assert_eq!(div_writes, 1);
    }
}
