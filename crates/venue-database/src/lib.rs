//! # venue-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! booking core, their sqlx repository implementations, and in-memory
//! stores for tests and database-less runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BookingFilter, BookingStore, SpaceFilter, SpaceStore};
