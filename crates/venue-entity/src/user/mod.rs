//! User-facing domain types.
//!
//! Users themselves live in the identity service; only the role carried in
//! access tokens is modelled here.

pub mod role;

pub use role::UserRole;
