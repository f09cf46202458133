//! Error types for LMS7002M control

use thiserror::Error;

/// Errors from chip bring-up and CGEN programming
#[derive(Debug, Error)]
pub enum Lms7Error {
    /// The version word read back over SPI is not the expected silicon
    #[error("unexpected chip version word 0x{found:04X} (expected 0x{expected:04X})")]
    UnexpectedChipVersion {
        /// Value read from the version register
        found: u16,
        /// Version word of supported silicon
        expected: u16,
    },

    /// The capacitor search exhausted the bank without the comparators
    /// reporting lock
    #[error("CGEN VCO would not lock at {freq_hz} Hz")]
    VcoNotLocked { freq_hz: f64 },

    /// No output-divider setting puts the VCO into its usable band
    #[error("no CGEN divider puts the VCO in band for {freq_hz} Hz")]
    FrequencyOutOfRange { freq_hz: f64 },

    /// A SPI transaction failed underneath
    #[error(transparent)]
    Spi(#[from] rftune_core::Error),
}
