//! Interrupt service routine, and the state it shares with the test sequence.
//!
//! The management core takes a single trap for every enabled, pending line. The routine has
//! two configurations. The default one clears the whole interrupt mask and returns, so a
//! stray interrupt can't fire again. The extended one acknowledges the user project's IRQ 0
//! line by clearing its pending event, and records the acknowledgement for the wait loop.

use core::cell::Cell;

use cfg_if::cfg_if;
use critical_section::Mutex;

use crate::{
    pac,
    traits::{IrqController, RegisterBus},
};

/// Value of the interrupt counter before the first acknowledgement.
pub const COUNTER_INIT: u32 = 0xFFFF_0000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IsrMode {
    /// Disable every interrupt on the first trap.
    MaskAll,
    /// Acknowledge user IRQ 0.
    AckUserIrq0,
}

impl IsrMode {
    /// The configuration selected at build time by the `user-irq0` feature.
    pub const fn from_features() -> Self {
        if cfg!(feature = "user-irq0") {
            Self::AckUserIrq0
        } else {
            Self::MaskAll
        }
    }
}

/// State written by the service routine and read by the test sequence. Place one in a
/// `static` so the trap handler can reach it.
pub struct IsrState {
    mode: IsrMode,
    counter: Mutex<Cell<u32>>,
    flag: Mutex<Cell<u8>>,
}

impl IsrState {
    pub const fn new(mode: IsrMode) -> Self {
        Self {
            mode,
            counter: Mutex::new(Cell::new(COUNTER_INIT)),
            flag: Mutex::new(Cell::new(0)),
        }
    }

    pub fn mode(&self) -> IsrMode {
        self.mode
    }

    /// Number of acknowledged interrupts, counted up from `COUNTER_INIT`.
    pub fn counter(&self) -> u32 {
        critical_section::with(|cs| self.counter.borrow(cs).get())
    }

    /// Whether an acknowledgement happened since the flag was last cleared.
    pub fn flag(&self) -> bool {
        critical_section::with(|cs| self.flag.borrow(cs).get() != 0)
    }

    pub fn clear_flag(&self) {
        critical_section::with(|cs| self.flag.borrow(cs).set(0));
    }

    fn record_ack(&self) {
        critical_section::with(|cs| {
            let counter = self.counter.borrow(cs);
            counter.set(counter.get().wrapping_add(1));
            self.flag.borrow(cs).set(1);
        });
    }
}

/// The service routine. Call this from the trap handler; it can't fail.
pub fn handle<B, I>(bus: &mut B, irq: &mut I, state: &IsrState)
where
    B: RegisterBus,
    I: IrqController,
{
    match state.mode {
        IsrMode::MaskAll => irq.set_mask(0),
        IsrMode::AckUserIrq0 => {
            let irqs = irq.pending() & irq.mask();

            if irqs & (1 << pac::USER_IRQ_0_INTERRUPT) != 0 {
                UserIrq0::new(&mut *bus).clear_pending();
                state.record_ack();
            }
        }
    }
}

/// Enable user IRQ 0 in the CPU's interrupt mask, leaving other lines as they are.
pub fn unmask_user_irq0<I: IrqController>(irq: &mut I) {
    let mask = irq.mask() | (1 << pac::USER_IRQ_0_INTERRUPT);
    irq.set_mask(mask);
}

/// The event registers behind the user project's IRQ 0 line.
pub struct UserIrq0<B> {
    pub regs: B,
}

impl<B: RegisterBus> UserIrq0<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Route the event to the CPU's interrupt line.
    pub fn enable_event(&mut self) {
        self.regs.write(pac::USER_IRQ_0_EV_ENABLE, 1);
    }

    /// Clear the pending event. This drops the interrupt line.
    pub fn clear_pending(&mut self) {
        self.regs.write(pac::USER_IRQ_0_EV_PENDING, 1);
    }

    pub fn is_pending(&mut self) -> bool {
        self.regs.read(pac::USER_IRQ_0_EV_PENDING) & 1 != 0
    }
}

/// The VexRiscv interrupt controller: a mask CSR and a pending CSR, one bit per line.
#[derive(Clone, Copy, Default)]
pub struct VexIrq;

cfg_if! {
    if #[cfg(vexriscv)] {
        use core::arch::asm;

        use riscv::{interrupt, register::mie};

        impl VexIrq {
            /// Enable or disable interrupt delivery. Enabling also sets `mie.MEIE`, since the
            /// VexRiscv controller raises every line as a machine external interrupt.
            pub fn set_ie(&mut self, enabled: bool) {
                if enabled {
                    unsafe {
                        mie::set_mext();
                        interrupt::enable();
                    }
                } else {
                    interrupt::disable();
                }
            }
        }

        impl IrqController for VexIrq {
            fn mask(&self) -> u32 {
                let mask: u32;
                unsafe { asm!("csrr {0}, 0xBC0", out(reg) mask, options(nomem, nostack)) };
                mask
            }

            fn set_mask(&mut self, mask: u32) {
                unsafe { asm!("csrw 0xBC0, {0}", in(reg) mask, options(nomem, nostack)) };
            }

            fn pending(&self) -> u32 {
                let pending: u32;
                unsafe { asm!("csrr {0}, 0xFC0", out(reg) pending, options(nomem, nostack)) };
                pending
            }

            fn wait_for_interrupt(&mut self) {
                // Spin rather than `wfi`, so a wait's budget counts iterations the same way
                // in both completion modes.
                core::hint::spin_loop();
            }
        }
    }
}
