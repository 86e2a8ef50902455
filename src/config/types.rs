//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use super::backends::{BackendsConfig, ImageConfig};
use crate::analyzer::config::PrepareConfig;
use crate::analyzer::retry::RetryPolicy;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub limits: PrepareConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

impl Config {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), String> {
        self.limits.validate()?;
        self.retry.validate()?;
        self.backends.validate()?;
        self.image.validate()
    }
}

/// Retry contract for generation calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per generation (first try included)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Delay after the first failure; grows linearly with each attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single wait, including rate-limit hints
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

pub fn default_max_attempts() -> usize {
    3
}

pub fn default_base_delay_ms() -> u64 {
    1000
}

pub fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        if self.max_attempts > 10 {
            return Err(format!(
                "retry.max_attempts {} exceeds maximum (10)",
                self.max_attempts
            ));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err("retry.max_delay_ms must not be smaller than retry.base_delay_ms".to_string());
        }
        Ok(())
    }

    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.base_delay_ms, self.max_delay_ms)
    }
}
