//! Concrete PostgreSQL repository implementations.

pub mod booking;
pub mod space;

pub use booking::BookingRepository;
pub use space::SpaceRepository;
