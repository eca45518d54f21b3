//! Shim atomics dan cell: `std` untuk build normal, `loom` untuk model checking.
//!
//! Isi slot juga lewat `UnsafeCell` di sini supaya loom bisa mendeteksi
//! data race pada slot jika pasangan release/acquire di head/tail rusak.
//!
//! Jalankan model checker dengan:
//!   RUSTFLAGS="--cfg loom" cargo test --release --test loom

#[cfg(loom)]
pub(crate) use loom::cell::UnsafeCell;
#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};

/// Wrapper tipis di atas `std::cell::UnsafeCell` dengan API `with_mut`
/// yang sama seperti `loom::cell::UnsafeCell`.
#[cfg(not(loom))]
#[derive(Debug)]
pub(crate) struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

#[cfg(not(loom))]
impl<T> UnsafeCell<T> {
    #[inline(always)]
    pub(crate) const fn new(data: T) -> Self {
        Self(std::cell::UnsafeCell::new(data))
    }

    #[inline(always)]
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
        f(self.0.get())
    }
}
