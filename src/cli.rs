//! CLI argument parsing

use clap::Parser;

#[derive(Parser)]
#[command(name = "rftune")]
#[command(author, version, about = "LMS7002M bring-up and CGEN tuning", long_about = None)]
pub struct Cli {
    /// LitePCIe device node (e.g. /dev/litepcie0)
    pub device: String,

    /// Target CGEN frequency in Hz
    #[arg(long, default_value_t = 801e6)]
    pub freq_hz: f64,

    /// Clock divider candidate (1, 2, 4 or 8)
    #[arg(long, default_value_t = 1)]
    pub dacdiv: u32,

    /// Tuning attempt budget
    #[arg(long, default_value_t = rftune_lms7::DEFAULT_TUNE_ATTEMPTS)]
    pub attempts: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
