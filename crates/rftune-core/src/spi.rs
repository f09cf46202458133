//! SPI operation model and 32-bit wire format
//!
//! An operation is kept as a tagged value ([`SpiOp`]) for as long as
//! possible; packing into the bridge's single command word happens only at
//! the [`RegisterBus`](crate::bus::RegisterBus) boundary.
//!
//! Wire layout of one command word:
//!
//! ```text
//! bit 31      : 1 = write, 0 = read
//! bits 30..16 : register address (15 bits)
//! bits 15..0  : write payload (zero for reads)
//! ```

use crate::error::{Error, Result};
use bitflags::bitflags;

/// Write tag in the command word
const OP_WRITE: u32 = 1 << 31;
/// Widest address the command word can carry
const ADDR_MASK: u32 = (1 << 15) - 1;
const ADDR_SHIFT: u32 = 16;
const VALUE_MASK: u32 = 0xFFFF;

/// Number of bits clocked per transfer; MOSI and MISO are single 32-bit
/// registers, so this is fixed.
pub const XFER_BITS: u32 = 32;

bitflags! {
    /// Fields of the bridge's control register (low byte)
    ///
    /// The transfer length in bits occupies the bits above the flag byte;
    /// see [`control_word`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpiControl: u32 {
        /// Start the transfer latched in MOSI
        const START = 1 << 0;
    }
}

bitflags! {
    /// Fields of the bridge's status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpiStatus: u32 {
        /// The last transfer has completed; MISO is valid
        const DONE = 1 << 0;
    }
}

/// Shift of the transfer-length field in the control register
const LENGTH_SHIFT: u32 = 8;

/// Build the control word requesting a transfer of `bits` bits
pub fn control_word(bits: u32) -> u32 {
    (bits << LENGTH_SHIFT) | SpiControl::START.bits()
}

/// One SPI register transaction, before wire encoding
///
/// Immutable once constructed; the constructors enforce the field-width
/// invariants. The 16-bit payload bound is carried by the `u16` type, the
/// 15-bit address bound is checked at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiOp {
    /// Write `value` to chip register `addr`
    Write {
        /// Chip register address (15 bits)
        addr: u16,
        /// Payload
        value: u16,
    },
    /// Read chip register `addr`
    Read {
        /// Chip register address (15 bits)
        addr: u16,
    },
}

impl SpiOp {
    /// Construct a register write
    ///
    /// Fails with [`Error::AddressOutOfRange`] if `addr` does not fit in
    /// the 15-bit address field. Failing here, rather than truncating at
    /// encode time, keeps a bad address from silently landing on an
    /// unrelated register.
    pub fn write(addr: u16, value: u16) -> Result<Self> {
        check_addr(addr)?;
        Ok(Self::Write { addr, value })
    }

    /// Construct a register read
    pub fn read(addr: u16) -> Result<Self> {
        check_addr(addr)?;
        Ok(Self::Read { addr })
    }

    /// The chip register address this operation targets
    pub fn addr(self) -> u16 {
        match self {
            Self::Write { addr, .. } | Self::Read { addr } => addr,
        }
    }

    /// Returns true for the write variant
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write { .. })
    }

    /// Pack into the bridge's 32-bit command word
    pub fn to_word(self) -> u32 {
        match self {
            Self::Write { addr, value } => {
                OP_WRITE | (u32::from(addr) << ADDR_SHIFT) | u32::from(value)
            }
            Self::Read { addr } => u32::from(addr) << ADDR_SHIFT,
        }
    }

    /// Decode a 32-bit command word
    ///
    /// Used by device emulators and diagnostics; `to_word` followed by
    /// `from_word` is the identity on valid operations.
    pub fn from_word(word: u32) -> Self {
        let addr = ((word >> ADDR_SHIFT) & ADDR_MASK) as u16;
        if word & OP_WRITE != 0 {
            Self::Write {
                addr,
                value: (word & VALUE_MASK) as u16,
            }
        } else {
            Self::Read { addr }
        }
    }
}

/// The response to one SPI transaction
///
/// Writes complete with no payload; `Written` is the defined "no payload"
/// reply rather than an unspecified value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiReply {
    /// The 16-bit value a read returned
    Data(u16),
    /// A write completed
    Written,
}

impl SpiReply {
    /// The read payload, if this reply carries one
    pub fn data(self) -> Option<u16> {
        match self {
            Self::Data(value) => Some(value),
            Self::Written => None,
        }
    }
}

fn check_addr(addr: u16) -> Result<()> {
    if u32::from(addr) > ADDR_MASK {
        return Err(Error::AddressOutOfRange {
            addr: u32::from(addr),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_roundtrips_through_wire_word() {
        for &(addr, value) in &[(0u16, 0u16), (0x002F, 0x3841), (0x7FFF, 0xFFFF)] {
            let op = SpiOp::write(addr, value).unwrap();
            let word = op.to_word();
            assert_eq!(word & OP_WRITE, OP_WRITE);
            assert_eq!(SpiOp::from_word(word), SpiOp::Write { addr, value });
        }
    }

    #[test]
    fn read_encodes_zero_payload() {
        for &addr in &[0u16, 0x0020, 0x7FFF] {
            let op = SpiOp::read(addr).unwrap();
            let word = op.to_word();
            assert_eq!(word & OP_WRITE, 0);
            assert_eq!(word & VALUE_MASK, 0);
            assert_eq!(SpiOp::from_word(word), SpiOp::Read { addr });
        }
    }

    #[test]
    fn wide_addresses_are_rejected() {
        assert_eq!(
            SpiOp::write(0x8000, 0),
            Err(Error::AddressOutOfRange { addr: 0x8000 })
        );
        assert_eq!(
            SpiOp::read(0xFFFF),
            Err(Error::AddressOutOfRange { addr: 0xFFFF })
        );
        assert!(SpiOp::read(0x7FFF).is_ok());
    }

    #[test]
    fn control_word_layout() {
        assert_eq!(control_word(XFER_BITS), 32 << 8 | 1);
    }
}
