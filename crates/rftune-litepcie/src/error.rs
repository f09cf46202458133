//! Error types for LitePCIe device access

use thiserror::Error;

/// LitePCIe specific errors
#[derive(Debug, Error)]
pub enum LitePcieError {
    /// Failed to open the device node
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A CSR register ioctl failed
    #[error("Register access at 0x{addr:08X} failed: {source}")]
    RegAccessFailed {
        addr: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for LitePCIe operations
pub type Result<T> = std::result::Result<T, LitePcieError>;
