//! Core module: Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: Hanya atomic load/store acquire-release, tidak ada Mutex/CAS
//! - No-Allocation: Semua slot pre-allocated saat init
//! - Single-Writer: tail hanya ditulis Producer, head hanya ditulis Consumer

mod handle;
mod ring_buffer;
mod slot;

pub use handle::{Consumer, Producer};
pub use ring_buffer::RingBuffer;
