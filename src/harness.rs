//! The single-shot test sequence: configure the pads and the probes, arm the FIR and the DMA
//! engine, wait for completion, and report the result to the testbench.
//!
//! The testbench watches `reg_mprj_datal` through pads 31:16. It sees `0x00A5_0000` when the
//! accelerator starts, then `{y[7:0], 0x5A, 16'h0000}` once the result is in.

use crate::{
    config::TestConfig,
    dma::{Completion, Dma, DmaError},
    error::{Error, Result},
    fir::{self, Fir},
    gpio::Gpio,
    isr::{self, IsrMode, IsrState, UserIrq0},
    la::La,
    traits::{IrqController, RegisterBus},
};

/// Marker byte written to data bits 23:16 when the accelerator is started.
pub const START_MARKER: u8 = 0xA5;
/// Marker byte written to data bits 23:16 alongside the result.
pub const END_MARKER: u8 = 0x5A;
/// Written when a watched LA counter crosses its threshold.
pub const COUNTER_FLAG: u32 = 0xAB41_0000;

/// Data word signalling the start of the test.
pub const fn start_word() -> u32 {
    (START_MARKER as u32) << 16
}

/// Data word carrying a result: its low byte in bits 31:24, the end marker in bits 23:16.
pub const fn report_word(value: i32) -> u32 {
    ((value as u32) << 24) | ((END_MARKER as u32) << 16)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Result of a run.
pub struct Outcome {
    /// What the accelerator left in DMA memory.
    pub value: i32,
    /// What the software reference filter computes for the same input.
    pub expected: i32,
    /// What was reported on the data pads.
    pub word: u32,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.value == self.expected
    }
}

/// Log how a run ended. Returns whether it passed.
pub fn log_result(result: &Result<Outcome>) -> bool {
    match result {
        Ok(outcome) if outcome.passed() => {
            info!("FIR output {=i32} matches reference", outcome.value);
            true
        }
        Ok(outcome) => {
            warn!(
                "FIR output {=i32}, reference {=i32}",
                outcome.value,
                outcome.expected
            );
            false
        }
        Err(e) => {
            error!("Run failed: {}", e);
            false
        }
    }
}

/// Drives one run of the test against a register bus and an interrupt controller.
pub struct Harness<'s, B, I> {
    bus: B,
    irq: I,
    isr: &'s IsrState,
}

impl<'s, B, I> Harness<'s, B, I>
where
    B: RegisterBus,
    I: IrqController,
{
    /// `isr` must be the state the trap handler passes to [`isr::handle`].
    pub fn new(bus: B, irq: I, isr: &'s IsrState) -> Self {
        Self { bus, irq, isr }
    }

    /// Release the bus and the interrupt controller.
    pub fn free(self) -> (B, I) {
        (self.bus, self.irq)
    }

    /// Run the whole sequence.
    pub fn run(&mut self, cfg: &TestConfig) -> Result<Outcome> {
        if cfg.completion == Completion::Interrupt && self.isr.mode() != IsrMode::AckUserIrq0 {
            return Err(Error::IsrMismatch);
        }

        self.configure_io(cfg)?;
        self.program_fir(cfg)?;

        if let Some(watch) = cfg.counter_watch {
            let val = La::new(&mut self.bus).wait_input_above(
                watch.bank,
                watch.threshold,
                cfg.max_iters,
            )?;
            debug!("LA counter crossed threshold: {=u32}", val);
            Gpio::new(&mut self.bus).write_data_low(COUNTER_FLAG);
        }

        if cfg.completion == Completion::Interrupt {
            self.arm_interrupt();
        }

        self.program_dma(cfg)?;
        self.start(cfg.completion);
        self.wait_completion(cfg.completion, cfg.max_iters)?;

        let value = Dma::new(&mut self.bus).read_output(&cfg.transfer);
        let expected = fir::reference(cfg.coeffs, cfg.samples);
        let word = self.report(value);

        Ok(Outcome {
            value,
            expected,
            word,
        })
    }

    /// Pads first, so the testbench can observe everything after; then the LA probes.
    pub fn configure_io(&mut self, cfg: &TestConfig) -> Result<()> {
        Gpio::new(&mut self.bus).configure(&cfg.pads)?;
        La::new(&mut self.bus).configure(&cfg.la);
        Ok(())
    }

    /// Data length, then the tap coefficients.
    pub fn program_fir(&mut self, cfg: &TestConfig) -> Result<()> {
        let mut fir = Fir::new(&mut self.bus);
        fir.set_len(cfg.samples.len() as u32)?;
        fir.set_coeffs(cfg.coeffs)
    }

    /// Unmask user IRQ 0 in the CPU, then enable the event at the source.
    pub fn arm_interrupt(&mut self) {
        self.isr.clear_flag();
        isr::unmask_user_irq0(&mut self.irq);
        UserIrq0::new(&mut self.bus).enable_event();
    }

    /// Load the samples and configure the transfer. Refuses to touch an engine that's still
    /// running.
    pub fn program_dma(&mut self, cfg: &TestConfig) -> Result<()> {
        if cfg.samples.len() != cfg.transfer.len as usize {
            return Err(DmaError::Length(cfg.samples.len() as u32).into());
        }

        let mut dma = Dma::new(&mut self.bus);
        if !dma.is_idle() {
            return Err(DmaError::NotIdle.into());
        }

        dma.load_samples(cfg.transfer.source, cfg.samples)?;
        dma.cfg_transfer(&cfg.transfer)
    }

    /// Start the FIR, then the DMA engine, then tell the testbench.
    pub fn start(&mut self, completion: Completion) {
        Fir::new(&mut self.bus).start();
        Dma::new(&mut self.bus).start(completion);
        Gpio::new(&mut self.bus).write_data_low(start_word());

        debug!("Accelerator started, completion: {}", completion);
    }

    /// Block until the transfer is done, or the budget runs out.
    pub fn wait_completion(&mut self, completion: Completion, max_iters: u32) -> Result<()> {
        match completion {
            Completion::Poll => Dma::new(&mut self.bus).wait_done(max_iters),
            Completion::Interrupt => {
                bounded_loop!(!self.isr.flag(), Error::RegisterUnchanged, max_iters, {
                    self.irq.wait_for_interrupt();
                });
                Ok(())
            }
        }
    }

    /// Put the result on the data pads. Returns the word written.
    pub fn report(&mut self, value: i32) -> u32 {
        let word = report_word(value);
        Gpio::new(&mut self.bus).write_data_low(word);
        word
    }
}
