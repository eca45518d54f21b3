//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer
//!
//! Implementasi Lamport Queue dengan cached index dan memory ordering yang tepat.
//! Tidak ada Mutex, tidak ada CAS, tidak ada alokasi setelah inisialisasi.
//!
//! Layout:
//! - `tail` (producer) dan `head` (consumer) di cache line terpisah
//! - Setiap slot 64-byte aligned, storage uninitialized (`MaybeUninit`)
//! - Index berjalan dalam rentang `2 * capacity`, slot = `index & mask`
//!
//! ```
//! use spsc_ring::RingBuffer;
//!
//! let mut rb: RingBuffer<u64> = RingBuffer::new(4);
//! let (mut tx, mut rx) = rb.split();
//!
//! assert!(tx.push(1));
//! assert!(tx.push(2));
//! assert_eq!(rx.pop(), Some(1));
//! assert_eq!(rx.pop(), Some(2));
//! assert_eq!(rx.pop(), None);
//! ```

use std::fmt;

use crossbeam_utils::CachePadded;

use super::handle::{Consumer, Producer};
use super::slot::{slot_count, Slot};
use crate::error::{Full, Result, RingBufferError};
use crate::sync::{AtomicUsize, Ordering};

/// Lock-Free SPSC Ring Buffer
///
/// Buffer hanya bisa dipakai lewat [`split`](RingBuffer::split), yang
/// meminjam buffer secara eksklusif. Selama [`Producer`] atau [`Consumer`]
/// masih hidup, buffer tidak bisa dipindah, di-split ulang, atau di-drop.
#[repr(C)]
pub struct RingBuffer<T> {
    // Producer side - hanya ditulis oleh producer
    tail: CachePadded<AtomicUsize>,
    // Consumer side - hanya ditulis oleh consumer
    head: CachePadded<AtomicUsize>,
    // Pre-allocated slot di heap - tidak ada alokasi setelah init
    slots: Box<[Slot<T>]>,
    // Jumlah slot internal (power of 2, termasuk sentinel)
    capacity: usize,
    // capacity - 1, untuk slot index
    mask: usize,
    // 2 * capacity - 1, untuk wraparound index
    index_mask: usize,
}

// SAFETY: RingBuffer aman untuk Send/Sync karena:
// - Hanya satu Producer (menulis tail dan slot kosong)
// - Hanya satu Consumer (menulis head dan memindahkan slot terisi)
// - Release/Acquire pada tail/head menjamin visibility isi slot
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Membuat ring buffer dengan kapasitas minimal `capacity`.
    ///
    /// Kapasitas internal dibulatkan ke power of 2 dari `capacity + 1`;
    /// [`capacity()`](RingBuffer::capacity) mengembalikan jumlah yang bisa dipakai.
    /// `capacity == 0` diperlakukan sebagai 1.
    ///
    /// # Panics
    /// Panic jika kapasitas overflow atau alokasi gagal. Gunakan
    /// [`try_new`](RingBuffer::try_new) untuk menangani error.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(rb) => rb,
            Err(e) => panic!("{e}"),
        }
    }

    /// Versi fallible dari [`new`](RingBuffer::new).
    pub fn try_new(requested: usize) -> Result<Self> {
        let capacity =
            slot_count(requested).ok_or(RingBufferError::CapacityOverflow { requested })?;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|source| RingBufferError::Alloc { capacity, source })?;
        slots.extend((0..capacity).map(|_| Slot::new()));

        log::debug!(
            "ring buffer allocated: requested={} slots={} usable={}",
            requested,
            capacity,
            capacity - 1
        );

        Ok(Self {
            tail: CachePadded::new(AtomicUsize::new(0)),
            head: CachePadded::new(AtomicUsize::new(0)),
            slots: slots.into_boxed_slice(),
            capacity,
            mask: capacity - 1,
            index_mask: 2 * capacity - 1,
        })
    }

    /// Pecah buffer menjadi satu producer dan satu consumer.
    ///
    /// Cached index kedua sisi diisi dari index asli, jadi split ulang
    /// setelah handle lama di-drop tetap melihat isi buffer yang tersisa.
    pub fn split(&mut self) -> (Producer<'_, T>, Consumer<'_, T>) {
        let this: &Self = self;
        let head_cache = this.head.load(Ordering::Acquire);
        let tail_cache = this.tail.load(Ordering::Acquire);
        (
            Producer::new(this, head_cache),
            Consumer::new(this, tail_cache),
        )
    }

    /// Kapasitas yang bisa dipakai (tanpa sentinel slot)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity - 1
    }

    /// Cek apakah buffer kosong.
    ///
    /// Advisory: hasilnya bisa langsung basi karena operasi thread lain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head == tail
    }

    /// Jumlah elemen dalam buffer (advisory)
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        self.distance(head, tail)
    }

    /// Cek apakah buffer penuh (advisory)
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    #[inline(always)]
    fn distance(&self, head: usize, tail: usize) -> usize {
        tail.wrapping_sub(head) & self.index_mask
    }

    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        (index + 1) & self.index_mask
    }

    /// Push dari sisi producer.
    ///
    /// # Safety
    /// Hanya boleh dipanggil oleh satu-satunya producer. `head_cache` adalah
    /// nilai `head` yang pernah dibaca producer tersebut.
    #[inline(always)]
    pub(crate) unsafe fn push_with(
        &self,
        head_cache: &mut usize,
        value: T,
    ) -> std::result::Result<(), Full<T>> {
        // Relaxed: producer adalah satu-satunya penulis tail
        let tail = self.tail.load(Ordering::Relaxed);

        // Fast path: cached head masih menunjukkan ada ruang
        if self.distance(*head_cache, tail) >= self.capacity() {
            // Acquire: lihat semua slot yang sudah dikosongkan consumer
            *head_cache = self.head.load(Ordering::Acquire);
            if self.distance(*head_cache, tail) >= self.capacity() {
                return Err(Full(value));
            }
        }

        // SAFETY: slot di tail berada di luar [head, tail), jadi kosong dan
        // consumer tidak akan menyentuhnya sebelum tail di-publish
        self.slots[tail & self.mask].write(value);

        // Release: isi slot visible sebelum consumer melihat tail baru
        self.tail.store(self.advance(tail), Ordering::Release);
        Ok(())
    }

    /// Pop dari sisi consumer.
    ///
    /// # Safety
    /// Hanya boleh dipanggil oleh satu-satunya consumer. `tail_cache` adalah
    /// nilai `tail` yang pernah dibaca consumer tersebut.
    #[inline(always)]
    pub(crate) unsafe fn pop_with(&self, tail_cache: &mut usize) -> Option<T> {
        // Relaxed: consumer adalah satu-satunya penulis head
        let head = self.head.load(Ordering::Relaxed);

        if head == *tail_cache {
            // Acquire: lihat isi slot yang sudah di-publish producer
            *tail_cache = self.tail.load(Ordering::Acquire);
            if head == *tail_cache {
                return None;
            }
        }

        // SAFETY: head berada di [head, tail), slot berisi value hidup dan
        // producer tidak akan menulisnya sebelum head di-publish
        let value = self.slots[head & self.mask].take();

        // Release: slot sudah kosong sebelum producer melihat head baru
        self.head.store(self.advance(head), Ordering::Release);
        Some(value)
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Tidak ada handle yang hidup (dijamin borrow checker), cukup relaxed
        let mut head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);

        let remaining = self.distance(head, tail);
        if remaining > 0 {
            log::trace!("ring buffer dropped with {} live elements", remaining);
        }

        while head != tail {
            // SAFETY: setiap index di [head, tail) berisi value hidup
            unsafe { self.slots[head & self.mask].drop_in_place() };
            head = self.advance(head);
        }
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}
