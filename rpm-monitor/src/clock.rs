//! Monotonic time source.

/// Milliseconds since boot
pub trait Clock {
    /// Current monotonic time in ms since an arbitrary epoch (usually boot).
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        T::now_ms(self)
    }
}
