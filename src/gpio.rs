//! This module provides functionality for the MPRJ pads: per-pad mode selection (direction
//! and owner, management SoC or user project), the transfer that commits a new pad
//! configuration, and the management data registers the testbench watches.
//! It includes an `embedded-hal` output pin over one bit of the data register.

use crate::{
    error::{Error, Result},
    pac,
    traits::RegisterBus,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pad index past the last MPRJ pad.
    InvalidPin(u8),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
/// Values for `reg_mprj_io_n`. `Mgmt*` modes hand the pad to the management SoC, `User*`
/// modes to the user project.
pub enum PinMode {
    MgmtStdInputNoPull = 0x0403,
    MgmtStdInputPullDown = 0x0c01,
    MgmtStdInputPullUp = 0x0801,
    MgmtStdOutput = 0x1809,
    MgmtStdBidirectional = 0x1801,
    MgmtStdAnalog = 0x000b,
    UserStdInputNoPull = 0x0402,
    UserStdInputPullDown = 0x0c00,
    UserStdInputPullUp = 0x0800,
    UserStdOutput = 0x1808,
    UserStdBidirectional = 0x1800,
    UserStdOutMonitored = 0x1802,
    UserStdAnalog = 0x000a,
}

impl PinMode {
    /// Bit 0 of the mode word selects the management SoC as the pad's owner.
    pub fn is_mgmt(&self) -> bool {
        (*self as u32) & 1 != 0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// One pad's mode, as written during configuration.
pub struct PadAssignment {
    pub pin: u8,
    pub mode: PinMode,
}

impl PadAssignment {
    pub const fn new(pin: u8, mode: PinMode) -> Self {
        Self { pin, mode }
    }
}

/// Number of pads the default configuration touches.
pub const DEFAULT_NUM_PADS: usize = 32;

/// Pads 31:16 flag the start and end of the test to the testbench and belong to the
/// management SoC. Pads 15:7 and 5:0 show the user project's outputs. Pad 6 is the
/// management UART TX line, and is written last.
pub const DEFAULT_PADS: [PadAssignment; DEFAULT_NUM_PADS] = default_pads();

const fn default_pads() -> [PadAssignment; DEFAULT_NUM_PADS] {
    let mut result = [PadAssignment::new(0, PinMode::UserStdOutput); DEFAULT_NUM_PADS];

    let mut i = 0;
    let mut pin = 31;
    while pin >= 16 {
        result[i] = PadAssignment::new(pin, PinMode::MgmtStdOutput);
        i += 1;
        pin -= 1;
    }

    pin = 15;
    loop {
        if pin != 6 {
            result[i] = PadAssignment::new(pin, PinMode::UserStdOutput);
            i += 1;
        }
        if pin == 0 {
            break;
        }
        pin -= 1;
    }

    result[i] = PadAssignment::new(6, PinMode::MgmtStdOutput);
    result
}

/// Pad configuration for a run, applied in order.
#[derive(Clone, Copy, Debug)]
pub struct PadConfig {
    pub pads: &'static [PadAssignment],
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            pads: &DEFAULT_PADS,
        }
    }
}

/// Represents the housekeeping pad control block.
pub struct Gpio<B> {
    pub regs: B,
}

impl<B: RegisterBus> Gpio<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Set a pad's mode. This only takes effect on the pad after [`Gpio::apply`].
    pub fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        if pin >= pac::MPRJ_NUM_PADS {
            return Err(GpioError::InvalidPin(pin).into());
        }
        self.regs.write(mode_reg(pin), mode as u32);
        Ok(())
    }

    /// Shift the pad configuration out to the pads, and wait for the transfer to finish.
    pub fn apply(&mut self) -> Result<()> {
        self.regs.write(pac::MPRJ_XFER, 1);
        bounded_loop!(
            self.regs.read(pac::MPRJ_XFER) == 1,
            Error::RegisterUnchanged
        );
        Ok(())
    }

    /// Write every pad of `cfg` in order, then apply.
    pub fn configure(&mut self, cfg: &PadConfig) -> Result<()> {
        for pad in cfg.pads {
            self.set_mode(pad.pin, pad.mode)?;
        }
        self.apply()?;

        debug!("Pad configuration applied ({=usize} pads)", cfg.pads.len());
        Ok(())
    }

    /// Drive the low 32 management-owned pads.
    pub fn write_data_low(&mut self, word: u32) {
        self.regs.write(pac::MPRJ_DATAL, word);
    }

    /// Drive pads 37:32.
    pub fn write_data_high(&mut self, word: u32) {
        self.regs.write(pac::MPRJ_DATAH, word & 0x3f);
    }

    /// A single bit of `reg_mprj_datal`, as a pin. `bit` must be below 32.
    pub fn data_pin(self, bit: u8) -> Result<DataPin<B>> {
        if bit >= 32 {
            return Err(GpioError::InvalidPin(bit).into());
        }
        Ok(DataPin {
            regs: self.regs,
            bit,
        })
    }
}

/// Address of pad `pin`'s mode register.
pub fn mode_reg(pin: u8) -> u32 {
    pac::MPRJ_IO0 + 4 * pin as u32
}

/// One management-owned pad, driven through `reg_mprj_datal`.
pub struct DataPin<B> {
    regs: B,
    bit: u8,
}

impl<B: RegisterBus> DataPin<B> {
    pub fn set_high(&mut self) {
        let bit = self.bit;
        self.regs.modify(pac::MPRJ_DATAL, |v| v | (1 << bit));
    }

    pub fn set_low(&mut self) {
        let bit = self.bit;
        self.regs.modify(pac::MPRJ_DATAL, |v| v & !(1 << bit));
    }

    pub fn is_set_high(&mut self) -> bool {
        self.regs.read(pac::MPRJ_DATAL) & (1 << self.bit) != 0
    }
}

#[cfg(feature = "embedded_hal")]
mod embedded_hal_impl {
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

    use super::DataPin;
    use crate::traits::RegisterBus;

    impl<B: RegisterBus> ErrorType for DataPin<B> {
        type Error = Infallible;
    }

    impl<B: RegisterBus> OutputPin for DataPin<B> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            DataPin::set_low(self);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            DataPin::set_high(self);
            Ok(())
        }
    }

    impl<B: RegisterBus> StatefulOutputPin for DataPin<B> {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(DataPin::is_set_high(self))
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!DataPin::is_set_high(self))
        }
    }
}
