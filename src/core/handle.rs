//! Producer dan Consumer handle
//!
//! Masing-masing handle memegang cached index milik thread lawan, sehingga
//! hot path tidak perlu atomic load selama buffer tidak terlihat penuh/kosong.
//! Semua method mutasi mengambil `&mut self`: satu handle = satu thread.

use std::fmt;

use super::ring_buffer::RingBuffer;
use crate::error::Full;

/// Sisi producer dari [`RingBuffer`]. `Send`, tidak bisa di-clone.
pub struct Producer<'a, T> {
    ring: &'a RingBuffer<T>,
    // Cached head milik consumer
    head_cache: usize,
}

impl<'a, T> Producer<'a, T> {
    pub(crate) fn new(ring: &'a RingBuffer<T>, head_cache: usize) -> Self {
        Self { ring, head_cache }
    }

    /// Push data ke buffer.
    ///
    /// Returns `true` jika berhasil, `false` jika buffer penuh (value di-drop).
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> bool {
        self.try_push(value).is_ok()
    }

    /// Push data ke buffer, mengembalikan value lewat [`Full`] jika penuh.
    #[inline(always)]
    pub fn try_push(&mut self, value: T) -> Result<(), Full<T>> {
        // SAFETY: Producer hanya ada satu per split dan dipinjam eksklusif
        unsafe { self.ring.push_with(&mut self.head_cache, value) }
    }

    /// Kapasitas buffer (tanpa sentinel slot)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Jumlah elemen dalam buffer (advisory)
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Cek apakah buffer kosong (advisory)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Cek apakah buffer penuh (advisory)
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<T> fmt::Debug for Producer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("ring", self.ring)
            .field("head_cache", &self.head_cache)
            .finish()
    }
}

/// Sisi consumer dari [`RingBuffer`]. `Send`, tidak bisa di-clone.
pub struct Consumer<'a, T> {
    ring: &'a RingBuffer<T>,
    // Cached tail milik producer
    tail_cache: usize,
}

impl<'a, T> Consumer<'a, T> {
    pub(crate) fn new(ring: &'a RingBuffer<T>, tail_cache: usize) -> Self {
        Self { ring, tail_cache }
    }

    /// Pop data dari buffer.
    ///
    /// Returns `Some(T)` jika ada data, `None` jika buffer kosong.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: Consumer hanya ada satu per split dan dipinjam eksklusif
        unsafe { self.ring.pop_with(&mut self.tail_cache) }
    }

    /// Pop langsung ke `out`. Value lama di `out` di-drop.
    ///
    /// Returns `false` dan `out` tidak disentuh jika buffer kosong.
    #[inline(always)]
    pub fn pop_into(&mut self, out: &mut T) -> bool {
        match self.pop() {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Kapasitas buffer (tanpa sentinel slot)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Jumlah elemen dalam buffer (advisory)
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Cek apakah buffer kosong (advisory)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Cek apakah buffer penuh (advisory)
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<T> fmt::Debug for Consumer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("ring", self.ring)
            .field("tail_cache", &self.tail_cache)
            .finish()
    }
}
