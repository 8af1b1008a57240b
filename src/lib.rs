//! Test harness for the FIR filter + DMA user project on the Caravel management SoC.
//!
//! The harness configures the MPRJ pads and the logic analyzer probes, programs the FIR
//! coefficients and a DMA transfer, starts the accelerator, waits for completion either by
//! polling the DMA status or on the user project's IRQ 0 line, and reports the result on
//! `reg_mprj_datal` where the testbench picks it up.
//!
//! All hardware access goes through [`traits::RegisterBus`] and [`traits::IrqController`].
//! On the management core these are [`pac::Mmio`] and [`isr::VexIrq`]; host builds run the
//! same code against a simulated SoC.
//!
//! Build the firmware image with the `rt` feature, and `user-irq0` to take the interrupt path:
//! `cargo build --release --features rt,user-irq0 --target riscv32i-unknown-none-elf`

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

#[macro_use]
pub mod util;

pub mod config;
pub mod dma;
pub mod error;
pub mod fir;
pub mod gpio;
pub mod harness;
pub mod isr;
pub mod la;
pub mod pac;
pub mod traits;

#[cfg(test)]
pub(crate) mod sim;

pub use crate::{
    config::TestConfig,
    error::{Error, Result},
    harness::{Harness, Outcome},
};
