//! Payment signature verification.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 and sends
//! the lowercase hex digest back with the payment callback.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use venue_core::error::AppError;
use venue_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Verifies that a payment callback really came from the gateway.
pub trait PaymentVerifier: Send + Sync + std::fmt::Debug {
    fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// [`PaymentVerifier`] checking hex HMAC-SHA256 signatures.
#[derive(Clone)]
pub struct HmacPaymentVerifier {
    keyed: HmacSha256,
}

impl std::fmt::Debug for HmacPaymentVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacPaymentVerifier").finish_non_exhaustive()
    }
}

impl HmacPaymentVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> AppResult<Self> {
        let keyed = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|e| AppError::configuration(format!("Invalid payment signature secret: {e}")))?;
        Ok(Self { keyed })
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac
    }

    /// Hex signature the gateway would send for this pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.mac(order_id, payment_id).finalize().into_bytes())
    }
}

impl PaymentVerifier for HmacPaymentVerifier {
    fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        self.mac(order_id, payment_id).verify_slice(&expected).is_ok()
    }
}
