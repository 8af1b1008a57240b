//! Register map of the management SoC and the FIR + DMA user project.
//!
//! Housekeeping (MPRJ) registers and the user project's Wishbone window sit at fixed
//! addresses. The logic analyzer and user IRQ event registers live in the LiteX CSR block;
//! their addresses are those of the SoC's generated `csr.h`.

use paste::paste;

use crate::traits::RegisterBus;

// --- FIR accelerator, Wishbone slave at the base of the user project window ---

pub const FIR_BASE: u32 = 0x3000_0000;
/// `ap_start` = bit 0.
pub const FIR_CONTROL: u32 = FIR_BASE;
/// Number of samples in the stream.
pub const FIR_LEN: u32 = FIR_BASE + 0x10;
/// First tap coefficient. Tap `k` is at `FIR_COEFF0 + 4k`.
pub const FIR_COEFF0: u32 = FIR_BASE + 0x20;
/// Number of taps the block implements.
pub const FIR_NUM_TAPS: usize = 11;

// --- DMA engine ---

pub const DMA_BASE: u32 = 0x3860_0000;
/// start = bit 0, idle = bit 1, done = bit 2, irq(0)/poll(1) = bit 3
pub const DMA_CONTROL: u32 = DMA_BASE;
pub const DMA_SOURCE: u32 = DMA_BASE + 0x10;
pub const DMA_DESTINATION: u32 = DMA_BASE + 0x20;
/// Transfer length, in 32-bit words.
pub const DMA_LEN: u32 = DMA_BASE + 0x30;

/// Sample memory the DMA engine reads from.
pub const DMA_MEM_BASE: u32 = 0x3850_0000;
/// Size of the sample memory window, in 32-bit words.
pub const DMA_MEM_WORDS: usize = 64;

// --- Housekeeping: MPRJ pad control ---

pub const MPRJ_BASE: u32 = 0x2600_0000;
/// Write 1 to shift the pad configuration out; reads back 1 until done.
pub const MPRJ_XFER: u32 = MPRJ_BASE;
pub const MPRJ_DATAL: u32 = MPRJ_BASE + 0x0C;
pub const MPRJ_DATAH: u32 = MPRJ_BASE + 0x10;
/// Mode register of pad 0. Pad `n` is at `MPRJ_IO0 + 4n`.
pub const MPRJ_IO0: u32 = MPRJ_BASE + 0x24;
pub const MPRJ_NUM_PADS: u8 = 38;

// --- LiteX CSR block ---

pub const CSR_BASE: u32 = 0xF000_0000;

/// Each LA register group is 4 words wide, bank 3 (probes 127:96) first.
macro_rules! la_group {
    ($name:ident, $offset:expr) => {
        paste! {
            pub const [<LA_ $name _ADDR>]: u32 = CSR_BASE + $offset;
            pub const [<LA0_ $name>]: u32 = [<LA_ $name _ADDR>] + 12;
            pub const [<LA1_ $name>]: u32 = [<LA_ $name _ADDR>] + 8;
            pub const [<LA2_ $name>]: u32 = [<LA_ $name _ADDR>] + 4;
            pub const [<LA3_ $name>]: u32 = [<LA_ $name _ADDR>];
        }
    };
}

la_group!(IENA, 0x3000);
la_group!(DATA_IN, 0x3010);
la_group!(OENB, 0x3020);
la_group!(DATA, 0x3030);

pub const USER_IRQ_0_EV_STATUS: u32 = CSR_BASE + 0x5800;
/// Write 1 to clear the pending event.
pub const USER_IRQ_0_EV_PENDING: u32 = CSR_BASE + 0x5804;
pub const USER_IRQ_0_EV_ENABLE: u32 = CSR_BASE + 0x5808;

/// Line of the user project's IRQ 0 in the VexRiscv interrupt mask.
pub const USER_IRQ_0_INTERRUPT: u32 = 2;

// --- VexRiscv interrupt CSRs ---

pub const CSR_IRQ_MASK: u16 = 0xBC0;
pub const CSR_IRQ_PENDING: u16 = 0xFC0;

/// Direct, volatile access to the physical address space. Only meaningful on the management
/// core itself.
#[derive(Clone, Copy, Default)]
pub struct Mmio;

impl RegisterBus for Mmio {
    fn read(&mut self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write(&mut self, addr: u32, val: u32) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, val) }
    }
}
