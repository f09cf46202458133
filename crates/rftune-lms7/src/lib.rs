//! rftune-lms7 - LMS7002M front-end control
//!
//! Programs the transceiver's internal registers through the
//! [`SpiEngine`](rftune_core::engine::SpiEngine): one-time chip enable,
//! CGEN PLL programming with an on-chip VCO capacitor search, and the
//! bounded-retry tuning loop that sweeps clock-divider candidates until
//! the VCO locks.

#![warn(rust_2018_idioms)]

pub mod cgen;
pub mod chip;
pub mod error;
pub mod regs;
pub mod tune;

pub use chip::{Lms7, DEFAULT_REFCLK_HZ};
pub use error::Lms7Error;
pub use tune::{tune_cgen, CgenTuner, ClkSel, TuneError, DEFAULT_TUNE_ATTEMPTS};
