//! Common error definitions.

use crate::{dma::DmaError, fir::FirError, gpio::GpioError};

macro_rules! impl_from_error {
    ($error:ident) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                Self::$error(error)
            }
        }
    };
}

/// Alias for Result<T, Error>.
pub type Result<T> = core::result::Result<T, Error>;

/// Collection of all errors that can occur.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Occurs when an expected change of a register does not happen in time.
    ///
    /// This is returned when a bounded loop exceeds its allotted iteration count: the pad
    /// configuration never committed, or the accelerator never signalled completion.
    RegisterUnchanged,
    /// Interrupt completion was requested, but the service routine is the mask-all stub, so
    /// the completion event would never be seen.
    IsrMismatch,
    /// Direct Memory Access (DMA) error
    DmaError(DmaError),
    /// FIR accelerator programming errors.
    FirError(FirError),
    GpioError(GpioError),
}

impl_from_error!(DmaError);
impl_from_error!(FirError);
impl_from_error!(GpioError);

