//! Support for the user project's Direct Memory Access (DMA) engine. The engine streams the
//! sample window into the FIR block, and writes each filter output back over the sample it
//! came from, so the last output ends up in the transfer's last word. Completion is reported either in the control register's `done` bit
//! (poll mode) or on the user project's IRQ 0 line (interrupt mode).

use crate::{
    error::{Error, Result},
    pac,
    traits::RegisterBus,
    util::word_addr,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Transfer length of zero, or past the end of the sample window.
    Length(u32),
    /// The engine was still running a previous transfer when a new one was armed.
    NotIdle,
}

/// Bits of the DMA control register.
pub struct Control;

impl Control {
    pub const START: u32 = 1 << 0;
    pub const IDLE: u32 = 1 << 1;
    pub const DONE: u32 = 1 << 2;
    /// Clear for interrupt completion, set for poll completion.
    pub const POLL: u32 = 1 << 3;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// How the end of a transfer is signalled.
pub enum Completion {
    /// Spin on the `done` bit.
    Poll,
    /// Wait for the user IRQ 0 event.
    Interrupt,
}

impl Completion {
    /// Control word that starts a transfer in this mode.
    pub fn control_word(&self) -> u32 {
        match self {
            Self::Poll => Control::START | Control::POLL,
            Self::Interrupt => Control::START,
        }
    }
}

#[derive(Clone, Copy, Debug)]
/// Addresses and length of a transfer.
pub struct Transfer {
    pub source: u32,
    pub destination: u32,
    /// In 32-bit words.
    pub len: u32,
}

impl Default for Transfer {
    fn default() -> Self {
        Self {
            source: pac::DMA_MEM_BASE,
            destination: pac::DMA_BASE,
            len: pac::DMA_MEM_WORDS as u32,
        }
    }
}

/// Represents the DMA engine.
pub struct Dma<B> {
    pub regs: B,
}

impl<B: RegisterBus> Dma<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Configure a transfer: length, source, destination, in that order. Doesn't start it.
    pub fn cfg_transfer(&mut self, transfer: &Transfer) -> Result<()> {
        if transfer.len == 0 || transfer.len as usize > pac::DMA_MEM_WORDS {
            return Err(DmaError::Length(transfer.len).into());
        }

        self.regs.write(pac::DMA_LEN, transfer.len);
        self.regs.write(pac::DMA_SOURCE, transfer.source);
        self.regs.write(pac::DMA_DESTINATION, transfer.destination);
        Ok(())
    }

    /// Kick off the configured transfer.
    pub fn start(&mut self, completion: Completion) {
        self.regs.write(pac::DMA_CONTROL, completion.control_word());
    }

    pub fn is_idle(&mut self) -> bool {
        self.regs.read(pac::DMA_CONTROL) & Control::IDLE != 0
    }

    pub fn transfer_is_complete(&mut self) -> bool {
        self.regs.read(pac::DMA_CONTROL) & Control::DONE != 0
    }

    /// Spin on the `done` bit, up to `max_iters` reads.
    pub fn wait_done(&mut self, max_iters: u32) -> Result<()> {
        bounded_loop!(
            !self.transfer_is_complete(),
            Error::RegisterUnchanged,
            max_iters,
            {}
        );
        Ok(())
    }

    /// Copy samples into the memory the engine reads from, starting at `source`.
    pub fn load_samples(&mut self, source: u32, samples: &[i32]) -> Result<()> {
        if samples.len() > pac::DMA_MEM_WORDS {
            return Err(DmaError::Length(samples.len() as u32).into());
        }

        for (i, x) in samples.iter().enumerate() {
            self.regs.write(word_addr(source, i), *x as u32);
        }
        Ok(())
    }

    /// The filter's last output: the final word of `transfer`'s source window. For the default
    /// 64-word transfer that's `DMA_MEM_BASE + 0xFC`.
    pub fn read_output(&mut self, transfer: &Transfer) -> i32 {
        let last = transfer.len.saturating_sub(1) as usize;
        self.regs.read(word_addr(transfer.source, last)) as i32
    }
}
