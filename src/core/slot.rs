//! Slot storage dan perhitungan kapasitas

use std::mem::MaybeUninit;

use crate::sync::UnsafeCell;

/// Slot dalam ring buffer - satu cell uninitialized untuk satu `T`
#[repr(C, align(64))] // Cache line alignment untuk menghindari false sharing antar slot
pub(crate) struct Slot<T> {
    data: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Konstruksi value in-place.
    ///
    /// # Safety
    /// Slot harus kosong dan hanya producer yang boleh menulis ke slot ini.
    #[inline(always)]
    pub(crate) unsafe fn write(&self, value: T) {
        self.data.with_mut(|ptr| {
            (*ptr).write(value);
        });
    }

    /// Pindahkan value keluar. Setelah ini slot kembali kosong.
    ///
    /// # Safety
    /// Slot harus berisi value hidup dan hanya consumer yang boleh membacanya.
    #[inline(always)]
    pub(crate) unsafe fn take(&self) -> T {
        self.data.with_mut(|ptr| (*ptr).assume_init_read())
    }

    /// Destroy value in-place tanpa memindahkannya.
    ///
    /// # Safety
    /// Slot harus berisi value hidup, dan tidak ada thread lain yang mengaksesnya.
    #[inline]
    pub(crate) unsafe fn drop_in_place(&self) {
        self.data.with_mut(|ptr| (*ptr).assume_init_drop());
    }
}

/// Kapasitas internal: power of 2 terkecil >= `requested + 1`.
///
/// Slot ekstra adalah sentinel sehingga `head == tail` selalu berarti kosong.
/// `None` jika hasilnya (atau rentang indeks `2 * capacity`) overflow.
pub(crate) fn slot_count(requested: usize) -> Option<usize> {
    let capacity = requested.max(1).checked_add(1)?.checked_next_power_of_two()?;
    capacity.checked_mul(2)?;
    Some(capacity)
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn test_slot_count_rounding() {
        assert_eq!(slot_count(0), Some(2));
        assert_eq!(slot_count(1), Some(2));
        assert_eq!(slot_count(2), Some(4));
        assert_eq!(slot_count(3), Some(4));
        assert_eq!(slot_count(4), Some(8));
        assert_eq!(slot_count(1024), Some(2048));
        assert_eq!(slot_count(1023), Some(1024));
    }

    #[test]
    fn test_slot_count_overflow() {
        assert_eq!(slot_count(usize::MAX), None);
        assert_eq!(slot_count(usize::MAX / 2), None);
        assert_eq!(slot_count(1 << (usize::BITS - 2)), None);
    }

    #[test]
    fn test_slot_is_cache_line_aligned() {
        assert_eq!(std::mem::align_of::<Slot<u8>>(), 64);
        assert_eq!(std::mem::size_of::<Slot<u64>>(), 64);
        assert_eq!(std::mem::size_of::<Slot<[u8; 100]>>(), 128);
    }
}
