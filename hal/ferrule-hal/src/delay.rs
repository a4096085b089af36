//! Blocking delay abstraction
//!
//! The only suspension point drivers have. Every timing requirement,
//! from a 3 µs bit slot to a 750 ms conversion, goes through this trait.

/// Blocking delay provider
pub trait Delay {
    /// Block for at least `us` microseconds
    ///
    /// Implementations should be accurate to a few microseconds for short
    /// durations; bit-banged protocols depend on it.
    fn sleep_us(&mut self, us: u32);

    /// Block for at least `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.sleep_us(1_000);
        }
    }
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn sleep_us(&mut self, us: u32) {
        (**self).sleep_us(us)
    }

    fn sleep_ms(&mut self, ms: u32) {
        (**self).sleep_ms(ms)
    }
}
