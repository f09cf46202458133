//! Clock-divider tuning retry loop
//!
//! One attempt per candidate divider, first success wins. A failed
//! attempt is logged and converted into "try the next candidate"; only
//! when the whole candidate list is exhausted does the loop report
//! failure, carrying the number of attempts made.

use crate::error::Lms7Error;
use thiserror::Error;

/// Default retry budget of the bring-up flow
pub const DEFAULT_TUNE_ATTEMPTS: usize = 40;

/// The 2-bit CLKH/CLKL clock-select code sent to the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClkSel {
    /// Undivided
    Div1 = 0,
    /// Divide by 2
    Div2 = 1,
    /// Divide by 4
    Div4 = 2,
    /// Divide by 8
    Div8 = 3,
}

impl ClkSel {
    /// Map a divider value to its select code
    ///
    /// Any divider other than 1, 2 or 4 selects the /8 code.
    pub fn from_divider(divider: u32) -> Self {
        match divider {
            1 => Self::Div1,
            2 => Self::Div2,
            4 => Self::Div4,
            _ => Self::Div8,
        }
    }

    /// The raw 2-bit code
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Terminal failure of the tuning loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TuneError {
    /// Every candidate in the budget failed to achieve lock
    #[error("could not tune CGEN VCO after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made
        attempts: usize,
    },
}

/// The tune entry point of the front-end control library
///
/// [`Lms7`](crate::chip::Lms7) is the hardware implementation; tests
/// substitute scripted tuners.
pub trait CgenTuner {
    /// Attempt one CGEN lock at `freq_hz` with the given clock select
    fn cgen_tune(&mut self, freq_hz: f64, clk_sel: ClkSel) -> Result<(), Lms7Error>;
}

/// Sweep `dividers` until one attempt locks the CGEN VCO at `freq_hz`
///
/// The caller supplies the candidate sequence; passing the same divider
/// `DEFAULT_TUNE_ATTEMPTS` times retries a fixed configuration, which is
/// what the stock bring-up flow does.
pub fn tune_cgen<T: CgenTuner>(
    tuner: &mut T,
    freq_hz: f64,
    dividers: &[u32],
) -> Result<(), TuneError> {
    for (attempt, &divider) in dividers.iter().enumerate() {
        let clk_sel = ClkSel::from_divider(divider);
        log::debug!(
            "cgen: attempt {}/{}, divider {} (select code {})",
            attempt + 1,
            dividers.len(),
            divider,
            clk_sel.code()
        );
        match tuner.cgen_tune(freq_hz, clk_sel) {
            Ok(()) => {
                log::info!("cgen: locked at {} Hz on attempt {}", freq_hz, attempt + 1);
                return Ok(());
            }
            Err(e) => log::warn!("cgen: attempt {} failed: {}", attempt + 1, e),
        }
    }
    Err(TuneError::Exhausted {
        attempts: dividers.len(),
    })
}
