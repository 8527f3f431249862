//! Payment provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying payment callbacks from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Secret used to verify `order_id|payment_id` signatures.
    #[serde(default = "default_signature_secret")]
    pub signature_secret: String,
    /// ISO currency code amounts are quoted in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            signature_secret: default_signature_secret(),
            currency: default_currency(),
        }
    }
}

fn default_signature_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}
