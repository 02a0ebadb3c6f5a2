use serde::{Deserialize, Serialize};

/// Configuration for the class_booking module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassBookingConfig {
    /// Per-slot capacity ceiling used when the professor record carries
    /// none. Floored at 1 wherever it is applied.
    #[serde(default = "default_capacity")]
    pub default_capacity: u32,
    /// Whether reschedule destinations are checked against the destination
    /// slot's capacity before any write.
    #[serde(default = "default_enforce_reschedule_capacity")]
    pub enforce_reschedule_capacity: bool,
}

impl Default for ClassBookingConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_capacity(),
            enforce_reschedule_capacity: default_enforce_reschedule_capacity(),
        }
    }
}

fn default_capacity() -> u32 {
    10
}

fn default_enforce_reschedule_capacity() -> bool {
    true
}
