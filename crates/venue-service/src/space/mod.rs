//! Space management.

pub mod service;

pub use service::{CreateSpaceRequest, QuoteRequest, SpaceService};
