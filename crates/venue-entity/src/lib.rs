//! # venue-entity
//!
//! Domain entity models for the venue booking service. Every struct in this
//! crate represents a database row or a domain value object. Entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`; booking rows additionally
//! derive `sqlx::FromRow`.

pub mod booking;
pub mod pricing;
pub mod space;
pub mod user;
