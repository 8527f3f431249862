//! Payment provider boundary.

pub mod verifier;

pub use verifier::{HmacPaymentVerifier, PaymentVerifier};
