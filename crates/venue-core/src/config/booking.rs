//! Booking workflow configuration.

use serde::{Deserialize, Serialize};

/// Booking workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Serialize availability checks per (space, date) inside this process.
    ///
    /// The store re-checks capacity atomically regardless of this flag.
    #[serde(default = "default_true")]
    pub slot_locks: bool,
    /// Enforce the per-space booking policy (duration bounds, advance window).
    #[serde(default = "default_true")]
    pub enforce_policy: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_locks: true,
            enforce_policy: true,
        }
    }
}

fn default_true() -> bool {
    true
}
