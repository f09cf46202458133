//! SPI transaction engine
//!
//! Drives the bridge's single transaction slot: latch the command word
//! into MOSI, strobe the control register, busy-poll the status register
//! for the done flag, then collect MISO for reads.
//!
//! The completion wait is a pure spin. The bus transfer finishes in a
//! small, bounded number of cycles, so there is no yielding or sleeping,
//! only a poll budget that turns a stuck link into
//! [`Error::TransferTimeout`](crate::error::Error::TransferTimeout)
//! instead of an indefinite hang.

use crate::bus::{Csr, RegisterBus};
use crate::error::{Error, Result};
use crate::spi::{control_word, SpiOp, SpiReply, SpiStatus, XFER_BITS};

/// Default completion poll budget
///
/// Orders of magnitude above the transfer latency of working hardware;
/// only a dead link ever reaches it.
pub const DEFAULT_POLL_BUDGET: u32 = 100_000;

/// The SPI transaction engine
///
/// Owns (or mutably borrows, via the blanket `RegisterBus` impl for
/// `&mut B`) the register bus it drives. One engine per device handle;
/// transactions issued through the same engine observe strict program
/// order, the bridge has no pipelining.
pub struct SpiEngine<B> {
    bus: B,
    poll_budget: u32,
}

impl<B: RegisterBus> SpiEngine<B> {
    /// Create an engine with the default poll budget
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            poll_budget: DEFAULT_POLL_BUDGET,
        }
    }

    /// Override the completion poll budget
    ///
    /// Mainly for tests, which simulate both prompt and stuck hardware
    /// without real timing.
    pub fn with_poll_budget(mut self, poll_budget: u32) -> Self {
        self.poll_budget = poll_budget;
        self
    }

    /// Access the underlying bus, e.g. for the scratch-register check
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Execute one SPI transaction and return its reply
    ///
    /// Blocks until the bridge reports completion or the poll budget runs
    /// out. For a read the reply carries the low 16 bits of MISO; a write
    /// completes with [`SpiReply::Written`].
    pub fn transact(&mut self, op: SpiOp) -> Result<SpiReply> {
        let word = op.to_word();
        match op {
            SpiOp::Write { addr, value } => {
                log::trace!("spi request 0x{:08X} (write 0x{:04X} at 0x{:04X})", word, value, addr)
            }
            SpiOp::Read { addr } => {
                log::trace!("spi request 0x{:08X} (read from 0x{:04X})", word, addr)
            }
        }

        self.bus.write32(Csr::SpiMosi, word)?;
        self.bus.write32(Csr::SpiControl, control_word(XFER_BITS))?;
        self.wait_done()?;

        if op.is_write() {
            return Ok(SpiReply::Written);
        }

        let data = (self.bus.read32(Csr::SpiMiso)? & 0xFFFF) as u16;
        log::trace!("spi reply 0x{:04X} ({:#018b})", data, data);
        Ok(SpiReply::Data(data))
    }

    /// Execute a batch of transactions in order
    ///
    /// A sequential fold, not a parallel dispatch: each transfer's done
    /// flag is awaited before the next command is latched. The reply
    /// sequence has the same length and order as `ops`. The first error
    /// aborts the rest of the batch.
    pub fn transact_many(&mut self, ops: &[SpiOp]) -> Result<Vec<SpiReply>> {
        let mut replies = Vec::with_capacity(ops.len());
        for &op in ops {
            replies.push(self.transact(op)?);
        }
        Ok(replies)
    }

    /// Read a 16-bit chip register
    pub fn read_reg(&mut self, addr: u16) -> Result<u16> {
        match self.transact(SpiOp::read(addr)?)? {
            SpiReply::Data(value) => Ok(value),
            SpiReply::Written => unreachable!("read op produced a write reply"),
        }
    }

    /// Write a 16-bit chip register
    pub fn write_reg(&mut self, addr: u16, value: u16) -> Result<()> {
        self.transact(SpiOp::write(addr, value)?)?;
        Ok(())
    }

    fn wait_done(&mut self) -> Result<()> {
        let mut polls = 0u32;
        loop {
            let status = SpiStatus::from_bits_truncate(self.bus.read32(Csr::SpiStatus)?);
            if status.contains(SpiStatus::DONE) {
                return Ok(());
            }
            polls += 1;
            if polls >= self.poll_budget {
                return Err(Error::TransferTimeout { polls });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted register bus: records every access, reports DONE only
    /// after a configurable number of not-done status reads per transfer.
    struct MockBus {
        done_after: u32,
        not_done_reads: u32,
        status_reads: u32,
        mosi: Vec<u32>,
        miso: u16,
        control_writes: Vec<u32>,
    }

    impl MockBus {
        fn new(done_after: u32) -> Self {
            Self {
                done_after,
                not_done_reads: 0,
                status_reads: 0,
                mosi: Vec::new(),
                miso: 0,
                control_writes: Vec::new(),
            }
        }
    }

    impl RegisterBus for MockBus {
        fn read32(&mut self, reg: Csr) -> Result<u32> {
            match reg {
                Csr::SpiStatus => {
                    self.status_reads += 1;
                    if self.not_done_reads < self.done_after {
                        self.not_done_reads += 1;
                        Ok(0)
                    } else {
                        self.not_done_reads = 0;
                        Ok(SpiStatus::DONE.bits())
                    }
                }
                Csr::SpiMiso => Ok(u32::from(self.miso)),
                _ => Ok(0),
            }
        }

        fn write32(&mut self, reg: Csr, value: u32) -> Result<()> {
            match reg {
                Csr::SpiMosi => self.mosi.push(value),
                Csr::SpiControl => self.control_writes.push(value),
                _ => {}
            }
            Ok(())
        }
    }

    #[test]
    fn write_transaction_sequence() {
        let mut engine = SpiEngine::new(MockBus::new(0));
        let reply = engine.transact(SpiOp::write(0x0020, 0xFFFD).unwrap()).unwrap();
        assert_eq!(reply, SpiReply::Written);

        let bus = engine.bus_mut();
        assert_eq!(bus.mosi, vec![0x8020_FFFD]);
        assert_eq!(bus.control_writes, vec![control_word(XFER_BITS)]);
    }

    #[test]
    fn read_transaction_returns_miso_low_half() {
        let mut bus = MockBus::new(0);
        bus.miso = 0x3841;
        let mut engine = SpiEngine::new(bus);
        let reply = engine.transact(SpiOp::read(0x002F).unwrap()).unwrap();
        assert_eq!(reply, SpiReply::Data(0x3841));
        assert_eq!(reply.data(), Some(0x3841));
    }

    #[test]
    fn status_poll_counts() {
        for done_after in [0u32, 1, 100] {
            let mut engine = SpiEngine::new(MockBus::new(done_after));
            engine.transact(SpiOp::read(0x0001).unwrap()).unwrap();
            // one extra read observes the done flag itself
            assert_eq!(engine.bus_mut().status_reads, done_after + 1);
        }
    }

    #[test]
    fn stuck_link_times_out() {
        let mut engine = SpiEngine::new(MockBus::new(u32::MAX)).with_poll_budget(64);
        let err = engine.transact(SpiOp::read(0x0001).unwrap()).unwrap_err();
        assert_eq!(err, Error::TransferTimeout { polls: 64 });
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let ops = [
            SpiOp::write(0x0010, 0xAAAA).unwrap(),
            SpiOp::read(0x0011).unwrap(),
            SpiOp::write(0x0012, 0x5555).unwrap(),
            SpiOp::read(0x0013).unwrap(),
        ];
        let mut engine = SpiEngine::new(MockBus::new(1));
        let replies = engine.transact_many(&ops).unwrap();

        assert_eq!(replies.len(), ops.len());
        assert_eq!(replies[0], SpiReply::Written);
        assert_eq!(replies[2], SpiReply::Written);
        assert!(replies[1].data().is_some());

        let words: Vec<u32> = ops.iter().map(|op| op.to_word()).collect();
        assert_eq!(engine.bus_mut().mosi, words);
        // one start strobe per command, in order
        assert_eq!(engine.bus_mut().control_writes.len(), ops.len());
    }
}
