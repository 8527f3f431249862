//! # venue-auth
//!
//! Verification of access tokens issued by the external identity service.
//! Token issuance, passwords, and sessions are handled elsewhere; this crate
//! only turns a bearer token into trusted [`Claims`].

pub mod jwt;

pub use jwt::{Claims, JwtDecoder};
