//! Host-side model of the management SoC and the FIR + DMA user project, for tests.
//!
//! `SimSoc` records every bus access in order. It models the pad transfer handshake, the DMA
//! engine running the FIR over the sample window, and the user IRQ 0 event the engine raises
//! in interrupt mode. `SimIrq` is the matching VexRiscv interrupt controller; it runs the
//! service routine when an enabled line is pending.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    dma::Control,
    isr::{self, IsrState},
    pac,
    traits::{IrqController, RegisterBus},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Read(u32, u32),
    Write(u32, u32),
}

struct State {
    mem: HashMap<u32, u32>,
    log: Vec<Access>,
    xfer_stuck: bool,
    dma_hang: bool,
    /// Ticks left before a started transfer completes.
    dma_remaining: Option<u32>,
    dma_latency: u32,
    irq_mask: u32,
    irq_enabled: bool,
}

impl State {
    fn get(&self, addr: u32) -> u32 {
        self.mem.get(&addr).copied().unwrap_or(0)
    }

    fn read(&mut self, addr: u32) -> u32 {
        let val = self.get(addr);
        match addr {
            pac::MPRJ_XFER if val == 1 && !self.xfer_stuck => {
                self.mem.insert(addr, 0);
            }
            pac::DMA_CONTROL => self.tick(),
            _ => (),
        }
        self.log.push(Access::Read(addr, val));
        val
    }

    fn write(&mut self, addr: u32, val: u32) {
        self.log.push(Access::Write(addr, val));
        match addr {
            pac::USER_IRQ_0_EV_PENDING => {
                // Write-one-to-clear.
                let pending = self.get(addr) & !val;
                self.mem.insert(addr, pending);
            }
            pac::DMA_CONTROL => {
                self.mem.insert(addr, val & !(Control::DONE | Control::IDLE));
                if val & Control::START != 0 && !self.dma_hang {
                    self.dma_remaining = Some(self.dma_latency);
                }
            }
            _ => {
                self.mem.insert(addr, val);
            }
        }
    }

    /// Advance a running transfer by one step.
    fn tick(&mut self) {
        match self.dma_remaining {
            Some(0) => {
                self.dma_remaining = None;
                self.finish_transfer();
            }
            Some(n) => self.dma_remaining = Some(n - 1),
            None => (),
        }
    }

    /// Stream the sample window through the FIR taps, writing each output back in place.
    fn finish_transfer(&mut self) {
        let len = self.get(pac::DMA_LEN) as usize;
        let src = self.get(pac::DMA_SOURCE);
        let taps: Vec<i32> = (0..pac::FIR_NUM_TAPS)
            .map(|k| self.get(pac::FIR_COEFF0 + 4 * k as u32) as i32)
            .collect();

        let mut shift = [0i32; pac::FIR_NUM_TAPS];
        for i in 0..len {
            shift.copy_within(0..pac::FIR_NUM_TAPS - 1, 1);
            shift[0] = self.get(src + 4 * i as u32) as i32;

            let y = shift
                .iter()
                .zip(&taps)
                .fold(0i32, |acc, (x, h)| acc.wrapping_add(x.wrapping_mul(*h)));
            self.mem.insert(src + 4 * i as u32, y as u32);
        }

        let control = self.get(pac::DMA_CONTROL);
        self.mem.insert(
            pac::DMA_CONTROL,
            (control & !Control::START) | Control::IDLE | Control::DONE,
        );
        if control & Control::POLL == 0 {
            let pending = self.get(pac::USER_IRQ_0_EV_PENDING) | 1;
            self.mem.insert(pac::USER_IRQ_0_EV_PENDING, pending);
        }
    }

    fn irq_pending(&self) -> u32 {
        let ev = self.get(pac::USER_IRQ_0_EV_PENDING) & self.get(pac::USER_IRQ_0_EV_ENABLE);
        if ev & 1 != 0 {
            1 << pac::USER_IRQ_0_INTERRUPT
        } else {
            0
        }
    }
}

/// Bus side of the simulated SoC. Clones share the same state.
#[derive(Clone)]
pub struct SimSoc {
    state: Rc<RefCell<State>>,
}

impl SimSoc {
    pub fn new() -> Self {
        let mut mem = HashMap::new();
        mem.insert(pac::DMA_CONTROL, Control::IDLE);

        Self {
            state: Rc::new(RefCell::new(State {
                mem,
                log: Vec::new(),
                xfer_stuck: false,
                dma_hang: false,
                dma_remaining: None,
                dma_latency: 3,
                irq_mask: 0,
                irq_enabled: true,
            })),
        }
    }

    /// The interrupt controller of this SoC, running `isr` as its trap handler.
    pub fn irq<'a>(&self, isr: &'a IsrState) -> SimIrq<'a> {
        SimIrq {
            soc: self.clone(),
            isr,
        }
    }

    /// The pad transfer never completes.
    pub fn stick_xfer(&mut self) {
        self.state.borrow_mut().xfer_stuck = true;
    }

    /// Started transfers never complete.
    pub fn hang_dma(&mut self) {
        self.state.borrow_mut().dma_hang = true;
    }

    /// Leave the engine mid-transfer, as if a previous run hadn't finished.
    pub fn set_busy(&mut self) {
        self.state.borrow_mut().mem.insert(pac::DMA_CONTROL, Control::START);
    }

    /// Set a register or memory word without logging it.
    pub fn poke(&mut self, addr: u32, val: u32) {
        self.state.borrow_mut().mem.insert(addr, val);
    }

    /// Current value of a register or memory word, without logging the access.
    pub fn peek(&self, addr: u32) -> u32 {
        self.state.borrow().get(addr)
    }

    pub fn log(&self) -> Vec<Access> {
        self.state.borrow().log.clone()
    }

    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.state
            .borrow()
            .log
            .iter()
            .filter_map(|a| match a {
                Access::Write(addr, val) => Some((*addr, *val)),
                Access::Read(..) => None,
            })
            .collect()
    }
}

impl RegisterBus for SimSoc {
    fn read(&mut self, addr: u32) -> u32 {
        self.state.borrow_mut().read(addr)
    }

    fn write(&mut self, addr: u32, val: u32) {
        self.state.borrow_mut().write(addr, val)
    }
}

/// VexRiscv interrupt controller of a [`SimSoc`].
pub struct SimIrq<'a> {
    soc: SimSoc,
    isr: &'a IsrState,
}

impl SimIrq<'_> {
    /// Globally enable or disable interrupt delivery (`mstatus.MIE`).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.soc.state.borrow_mut().irq_enabled = enabled;
    }
}

impl IrqController for SimIrq<'_> {
    fn mask(&self) -> u32 {
        self.soc.state.borrow().irq_mask
    }

    fn set_mask(&mut self, mask: u32) {
        self.soc.state.borrow_mut().irq_mask = mask;
    }

    fn pending(&self) -> u32 {
        self.soc.state.borrow().irq_pending()
    }

    fn wait_for_interrupt(&mut self) {
        self.soc.state.borrow_mut().tick();

        let take_trap = {
            let state = self.soc.state.borrow();
            state.irq_enabled && state.irq_pending() & state.irq_mask != 0
        };
        if take_trap {
            let mut bus = self.soc.clone();
            let state = self.isr;
            isr::handle(&mut bus, self, state);
        }
    }
}
