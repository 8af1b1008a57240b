// Traits used across the library. These are the seams between the test sequence and the hardware.

/// Word-wide access to the memory-mapped register space.
///
/// Addresses are physical bus addresses, as listed in [`crate::pac`]. Implementations must not
/// reorder or merge accesses: the harness relies on the order of writes reaching the bus.
pub trait RegisterBus {
    /// Read a 32-bit register.
    fn read(&mut self, addr: u32) -> u32;

    /// Write a 32-bit register.
    fn write(&mut self, addr: u32, val: u32);

    /// Read-modify-write a 32-bit register.
    fn modify<F>(&mut self, addr: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let val = self.read(addr);
        self.write(addr, f(val));
    }
}

/// The CPU's interrupt controller: an enable mask and a pending register, one bit per line.
pub trait IrqController {
    /// Currently enabled interrupt lines.
    fn mask(&self) -> u32;

    /// Set the enabled interrupt lines.
    fn set_mask(&mut self, mask: u32);

    /// Lines with an interrupt pending, whether or not they're enabled.
    fn pending(&self) -> u32;

    /// Idle until an interrupt may have been serviced. Called from inside wait loops.
    fn wait_for_interrupt(&mut self);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read(&mut self, addr: u32) -> u32 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u32, val: u32) {
        (**self).write(addr, val)
    }
}
