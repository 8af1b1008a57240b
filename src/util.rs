//! This is an internal module that contains utility functionality used by other modules.

/// Default iteration budget for register waits. The DMA + FIR pass over 64 samples finishes
/// well inside this on the 40MHz management clock.
pub const MAX_ITERS: u32 = 1_000_000;

/// Spin while `$cond` holds, giving up with `Err($err)` after `MAX_ITERS` iterations.
/// An optional block runs on every iteration, eg to sleep or check error flags.
///
/// Example: `bounded_loop!(bus.read(pac::MPRJ_XFER) == 1, Error::RegisterUnchanged);`
#[macro_export]
macro_rules! bounded_loop {
    ($cond:expr, $err:expr $(,)?) => {
        $crate::bounded_loop!($cond, $err, $crate::util::MAX_ITERS, {})
    };
    ($cond:expr, $err:expr, $body:block $(,)?) => {
        $crate::bounded_loop!($cond, $err, $crate::util::MAX_ITERS, $body)
    };
    ($cond:expr, $err:expr, $max_iters:expr, $body:block $(,)?) => {
        let mut i: u32 = 0;
        while $cond {
            i += 1;
            if i >= $max_iters {
                return Err($err.into());
            }
            $body
        }
    };
}

/// Address of the `index`th 32-bit word past `base`.
pub(crate) fn word_addr(base: u32, index: usize) -> u32 {
    base + 4 * index as u32
}
