//! Logic analyzer (LA) probes: 128 signals between the management SoC and the user project,
//! in four 32-bit banks. Each probe is either driven by the CPU (output) or observed by it
//! (input).

use paste::paste;

use crate::{
    error::{Error, Result},
    pac,
    traits::RegisterBus,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Probe bank; `La0` holds probes 31:0, `La3` probes 127:96.
pub enum LaBank {
    La0,
    La1,
    La2,
    La3,
}

macro_rules! bank_regs {
    ($($bank:literal),+) => {
        paste! {
            impl LaBank {
                pub const ALL: [Self; 4] = [$(Self::[<La $bank>]),+];

                /// Input-enable register.
                fn iena(&self) -> u32 {
                    match self {
                        $(Self::[<La $bank>] => pac::[<LA $bank _IENA>],)+
                    }
                }

                /// Output-enable register (active low).
                fn oenb(&self) -> u32 {
                    match self {
                        $(Self::[<La $bank>] => pac::[<LA $bank _OENB>],)+
                    }
                }

                fn data(&self) -> u32 {
                    match self {
                        $(Self::[<La $bank>] => pac::[<LA $bank _DATA>],)+
                    }
                }

                fn data_in(&self) -> u32 {
                    match self {
                        $(Self::[<La $bank>] => pac::[<LA $bank _DATA_IN>],)+
                    }
                }
            }
        }
    };
}

bank_regs!(0, 1, 2, 3);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Direction of a whole bank, from the CPU's point of view.
pub enum LaDir {
    /// The user project drives the probes; the CPU observes them.
    Input,
    /// The CPU drives the probes.
    Output,
}

impl LaDir {
    /// Value written to both the input-enable and output-enable registers.
    pub fn val(&self) -> u32 {
        match self {
            Self::Input => 0,
            Self::Output => 0xFFFF_FFFF,
        }
    }
}

#[derive(Clone, Copy, Debug)]
/// Probe setup for a run.
pub struct LaConfig {
    /// Direction of banks 0 through 3, applied in bank order.
    pub dirs: [LaDir; 4],
    /// Written to `seed_bank` once the directions are applied. The bank is then turned back
    /// into an input, so the user project is only driven for that one write.
    pub seed: Option<(LaBank, u32)>,
}

impl Default for LaConfig {
    /// Probes 31:0 and 127:64 are inputs to the CPU, 63:32 outputs. Probes 63:32 seed the user
    /// project's counter with 0, then are released.
    fn default() -> Self {
        Self {
            dirs: [LaDir::Input, LaDir::Output, LaDir::Input, LaDir::Input],
            seed: Some((LaBank::La1, 0)),
        }
    }
}

/// Represents the logic analyzer block.
pub struct La<B> {
    pub regs: B,
}

impl<B: RegisterBus> La<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Set a bank's direction. Input-enable is written before output-enable.
    pub fn set_direction(&mut self, bank: LaBank, dir: LaDir) {
        let val = dir.val();
        self.regs.write(bank.iena(), val);
        self.regs.write(bank.oenb(), val);
    }

    /// Drive a bank's output probes.
    pub fn write(&mut self, bank: LaBank, val: u32) {
        self.regs.write(bank.data(), val);
    }

    /// Sample a bank's input probes.
    pub fn read_input(&mut self, bank: LaBank) -> u32 {
        self.regs.read(bank.data_in())
    }

    /// Apply directions to every bank, then the seed write if there is one.
    pub fn configure(&mut self, cfg: &LaConfig) {
        for (bank, dir) in LaBank::ALL.iter().zip(cfg.dirs) {
            self.set_direction(*bank, dir);
        }

        if let Some((bank, val)) = cfg.seed {
            self.write(bank, val);
            self.set_direction(bank, LaDir::Input);
        }
    }

    /// Wait until a bank's input reads above `threshold`, up to `max_iters` reads. Returns the
    /// value that crossed it.
    pub fn wait_input_above(&mut self, bank: LaBank, threshold: u32, max_iters: u32) -> Result<u32> {
        let mut val = self.read_input(bank);
        bounded_loop!(val <= threshold, Error::RegisterUnchanged, max_iters, {
            val = self.read_input(bank);
        });
        Ok(val)
    }
}
