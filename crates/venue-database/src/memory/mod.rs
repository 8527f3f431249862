//! In-memory stores for single-process runs and tests.
//!
//! State sits behind a Tokio mutex, so check-then-insert sequences are
//! atomic within the process.

pub mod booking;
pub mod space;

pub use booking::MemoryBookingStore;
pub use space::MemorySpaceStore;
