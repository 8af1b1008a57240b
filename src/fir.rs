//! This module supports the FIR filter accelerator in the user project: a fixed 11-tap
//! convolution block fed by the DMA engine. It also carries a software reference of the
//! same filter, used to check what the hardware reports.

use crate::{error::Result, pac, traits::RegisterBus, util::word_addr};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirError {
    /// More coefficients than the block has taps.
    TooManyTaps(usize),
    /// A data length of zero never starts a stream.
    ZeroLength,
}

/// `ap_start` in the FIR control register.
pub const AP_START: u32 = 1;

/// Tap coefficients of the `counter_la_fir` test: a symmetric low-pass kernel.
pub const DEFAULT_COEFFS: [i32; pac::FIR_NUM_TAPS] = [0, -10, -9, 23, 56, 63, 56, 23, -9, -10, 0];

/// Represents the FIR accelerator.
pub struct Fir<B> {
    pub regs: B,
}

impl<B: RegisterBus> Fir<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Set the number of samples in the stream.
    pub fn set_len(&mut self, len: u32) -> Result<()> {
        if len == 0 {
            return Err(FirError::ZeroLength.into());
        }
        self.regs.write(pac::FIR_LEN, len);
        Ok(())
    }

    /// Load tap coefficients, starting at tap 0. Taps past `coeffs.len()` are left as they are.
    pub fn set_coeffs(&mut self, coeffs: &[i32]) -> Result<()> {
        if coeffs.len() > pac::FIR_NUM_TAPS {
            return Err(FirError::TooManyTaps(coeffs.len()).into());
        }

        for (k, c) in coeffs.iter().enumerate() {
            self.regs.write(word_addr(pac::FIR_COEFF0, k), *c as u32);
        }
        Ok(())
    }

    /// Set `ap_start`. The block then consumes samples as the DMA engine delivers them.
    pub fn start(&mut self) {
        self.regs.write(pac::FIR_CONTROL, AP_START);
    }
}

/// The filter's last output, `y[N-1] = sum(h[k] * x[N-1-k])`, with the wrapping 32-bit
/// arithmetic of the hardware datapath. Samples before the start of the stream count as 0.
pub fn reference(coeffs: &[i32], samples: &[i32]) -> i32 {
    coeffs
        .iter()
        .zip(samples.iter().rev())
        .fold(0i32, |acc, (h, x)| acc.wrapping_add(h.wrapping_mul(*x)))
}
