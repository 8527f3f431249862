//! Space domain entities.

pub mod model;
pub mod policy;

pub use model::{CreateSpace, Space, SpaceType, UpdateSpace};
pub use policy::{BookingPolicy, CancellationPolicy};
