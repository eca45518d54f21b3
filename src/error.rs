//! Error types untuk ring buffer
//!
//! Hanya konstruksi yang bisa gagal dengan error. Kondisi penuh/kosong
//! di hot path bukan error: dilaporkan lewat `bool`, `Option`, atau [`Full`].

use std::collections::TryReserveError;
use std::fmt;

/// Result alias untuk operasi konstruksi
pub type Result<T> = std::result::Result<T, RingBufferError>;

/// Kegagalan saat membuat [`RingBuffer`](crate::RingBuffer)
#[derive(Debug, thiserror::Error)]
pub enum RingBufferError {
    /// Pembulatan ke power of 2 (atau rentang indeks 2x kapasitas) overflow `usize`
    #[error("Capacity overflow: requested {requested} slots")]
    CapacityOverflow { requested: usize },

    /// Alokator tidak bisa menyediakan storage untuk slot
    #[error("Allocation failed for {capacity} slots")]
    Alloc {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Push ditolak karena buffer penuh. Value dikembalikan ke caller.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Ambil kembali value yang ditolak
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ring buffer is full")
    }
}

impl<T> std::error::Error for Full<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_returns_value() {
        let err = Full(String::from("payload"));
        assert_eq!(err.to_string(), "ring buffer is full");
        assert_eq!(err.into_inner(), "payload");
    }

    #[test]
    fn test_error_display() {
        let err = RingBufferError::CapacityOverflow { requested: usize::MAX };
        assert_eq!(
            err.to_string(),
            format!("Capacity overflow: requested {} slots", usize::MAX)
        );
    }
}
