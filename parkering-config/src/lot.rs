//! Parking lot limits.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct LotConfig {
    /// Upper bound on the number of slots, across initialization and every expansion.
    #[validate(range(min = 1, max = 1_000_000))]
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
}

fn default_max_capacity() -> u32 {
    100_000
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}
