//! Firmware for the `counter_la_fir` test. Runs once from reset, reports on the data pads,
//! then parks the core. Build with `--features rt`, and `user-irq0` for interrupt completion.

#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;
use panic_halt as _;
use riscv_rt::entry;

use caravel_fir_harness::{
    dma::Completion,
    harness::log_result,
    isr::{self, IsrMode, IsrState, VexIrq},
    pac::Mmio,
    Harness, TestConfig,
};

static ISR: IsrState = IsrState::new(IsrMode::from_features());

/// Every interrupt lands here.
#[export_name = "DefaultHandler"]
fn irq_handler() {
    isr::handle(&mut Mmio, &mut VexIrq, &ISR);
}

#[entry]
fn main() -> ! {
    let cfg = TestConfig::default();

    let mut irq = VexIrq;
    if cfg.completion == Completion::Interrupt {
        irq.set_ie(true);
    }

    let mut harness = Harness::new(Mmio, irq, &ISR);
    let result = harness.run(&cfg);

    // A failed run never writes the end marker, which the testbench reports as a timeout.
    log_result(&result);

    loop {
        core::hint::spin_loop();
    }
}
