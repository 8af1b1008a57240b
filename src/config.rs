//! Configuration of a harness run. `TestConfig::default()` is the `counter_la_fir` test as
//! the testbench expects it; modify fields from there for other scenarios.

use crate::{
    dma::{Completion, Transfer},
    fir::DEFAULT_COEFFS,
    gpio::PadConfig,
    la::{LaBank, LaConfig},
    pac,
    util::MAX_ITERS,
};

/// Input stream of the default test: a ramp, 0 through 63.
pub const DEFAULT_SAMPLES: [i32; pac::DMA_MEM_WORDS] = ramp();

const fn ramp() -> [i32; pac::DMA_MEM_WORDS] {
    let mut result = [0; pac::DMA_MEM_WORDS];
    let mut i = 0;
    while i < pac::DMA_MEM_WORDS {
        result[i] = i as i32;
        i += 1;
    }
    result
}

#[derive(Clone, Copy, Debug)]
/// Watch an LA input bank before starting the accelerator, and flag on the data pads when it
/// crosses a threshold. Used with user projects that expose a counter on the probes.
pub struct CounterWatch {
    pub bank: LaBank,
    pub threshold: u32,
}

impl Default for CounterWatch {
    fn default() -> Self {
        Self {
            bank: LaBank::La0,
            threshold: 500,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TestConfig<'a> {
    pub pads: PadConfig,
    pub la: LaConfig,
    /// FIR tap coefficients, from tap 0.
    pub coeffs: &'a [i32],
    /// Loaded into DMA memory at `transfer.source`. Its length is the FIR data length, and must
    /// match `transfer.len`.
    pub samples: &'a [i32],
    pub transfer: Transfer,
    pub completion: Completion,
    /// Off by default.
    pub counter_watch: Option<CounterWatch>,
    /// Iteration budget of each wait.
    pub max_iters: u32,
}

impl Default for TestConfig<'static> {
    fn default() -> Self {
        Self {
            pads: PadConfig::default(),
            la: LaConfig::default(),
            coeffs: &DEFAULT_COEFFS,
            samples: &DEFAULT_SAMPLES,
            transfer: Transfer::default(),
            completion: if cfg!(feature = "user-irq0") {
                Completion::Interrupt
            } else {
                Completion::Poll
            },
            counter_watch: None,
            max_iters: MAX_ITERS,
        }
    }
}
