//! Retry Policy
//!
//! Attempt-indexed linear backoff shared by every extraction path. The delay
//! after the n-th failed attempt is `base_delay_ms * n`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Upper bound accepted for `base_delay_ms`.
pub const MAX_BASE_DELAY_MS: u64 = 60_000;

/// Bounded retry policy with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay in milliseconds, multiplied by the failed attempt number
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and base delay.
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(0, default_base_delay_ms())
    }

    /// Total number of attempts this policy allows, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether another attempt may follow the given failed attempt (1-indexed).
    pub fn should_retry(&self, failed_attempt: u32) -> bool {
        failed_attempt <= self.max_retries
    }

    /// Delay to wait after the given failed attempt (1-indexed).
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(failed_attempt)))
    }

    /// Validate the policy bounds.
    pub fn validate(&self) -> CoreResult<()> {
        if self.base_delay_ms > MAX_BASE_DELAY_MS {
            return Err(CoreError::validation(format!(
                "base_delay_ms cannot exceed {}",
                MAX_BASE_DELAY_MS
            )));
        }
        Ok(())
    }
}
