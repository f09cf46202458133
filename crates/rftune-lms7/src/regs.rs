//! LMS7002M register addresses and fields used by rftune
//!
//! Only the registers this tool touches; the chip has hundreds more.
//! Addresses and field positions follow the LMS7002M programming manual.

/// Top-level channel/module enable word (MAC bits plus module enables)
pub const CONFIG: u16 = 0x0020;
/// `CONFIG` value during soft reset: everything held off
pub const CONFIG_RESET: u16 = 0x0000;
/// `CONFIG` value after bring-up: modules on, both channels addressed
pub const CONFIG_ENABLE: u16 = 0xFFFD;

/// Version/revision/mask word, read-only
pub const VERSION: u16 = 0x002F;
/// Version word of mask 1 silicon
pub const EXPECTED_VERSION: u16 = 0x3841;

/// CGEN block power/reset control
pub const CGEN_CFG: u16 = 0x0086;
/// `CGEN_CFG` value powering the block: EN_G_CGEN with the SDM clock on
/// and reset released
pub const CGEN_CFG_ENABLE: u16 = 0x0025;

/// FRAC_SDM_CGEN low 16 bits
pub const CGEN_SDM_FRAC_LO: u16 = 0x0087;
/// INT_SDM_CGEN \[13:4\] plus FRAC_SDM_CGEN \[19:16\] in \[3:0\]
pub const CGEN_SDM_HI: u16 = 0x0088;
/// Output divider and CLKH/CLKL clock-select fields
pub const CGEN_DIV: u16 = 0x0089;
/// VCO capacitor bank word, CSW_VCO_CGEN in \[8:1\]
pub const CGEN_VCO_CSW: u16 = 0x008B;
/// VCO comparator readback: VCO_CMPHO \[13\], VCO_CMPLO \[12\]
pub const CGEN_VCO_CMP: u16 = 0x008C;

/// Shift of INT_SDM_CGEN within `CGEN_SDM_HI`
pub const INT_SDM_SHIFT: u32 = 4;
/// Mask of the FRAC_SDM_CGEN high nibble within `CGEN_SDM_HI`
pub const FRAC_SDM_HI_MASK: u16 = 0x000F;
/// Shift of DIV_OUTCH_CGEN within `CGEN_DIV`
pub const DIV_OUTCH_SHIFT: u32 = 3;
/// Shift of the 2-bit CLKH_OV_CLKL clock-select code within `CGEN_DIV`
pub const CLKH_OV_CLKL_SHIFT: u32 = 13;
/// Shift of CSW_VCO_CGEN within `CGEN_VCO_CSW`
pub const CSW_VCO_SHIFT: u32 = 1;
/// Shift of the comparator pair within `CGEN_VCO_CMP`
pub const VCO_CMP_SHIFT: u32 = 12;
/// Mask of the comparator pair after shifting
pub const VCO_CMP_MASK: u16 = 0x3;
