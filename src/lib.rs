//! Lock-free single-producer single-consumer ring buffer.
//!
//! Arsitektur:
//! - Fixed capacity: power of 2 dengan satu sentinel slot
//! - Lock-Free: cached index + acquire/release, tanpa CAS
//! - Cache-aware: head/tail di cache line terpisah, slot 64-byte aligned
//! - Explicit lifetime: elemen dikonstruksi saat push, dipindah saat pop,
//!   sisa elemen di-drop bersama buffer

pub mod core;
pub mod error;
mod sync;

pub use crate::core::{Consumer, Producer, RingBuffer};
pub use crate::error::{Full, Result, RingBufferError};
