//! Runtime configuration for text preparation.

use serde::{Deserialize, Serialize};

/// Default number of characters kept when truncating.
pub const DEFAULT_TRUNCATE_CHARS: usize = 100_000;
/// Default length above which splittable kinds are split.
pub const DEFAULT_SPLIT_THRESHOLD_CHARS: usize = 200_000;
/// Default number of characters kept in each split half.
pub const DEFAULT_SPLIT_HALF_CHARS: usize = 100_000;

/// Length budgets applied by the text preparer.
///
/// All lengths are counted in `char`s, never bytes. Stored as the `[limits]`
/// table of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Characters kept (from the end) when a transcript is truncated
    pub truncate_chars: usize,
    /// Splittable kinds are split when longer than this
    pub split_threshold_chars: usize,
    /// Characters kept from each end when splitting
    pub split_half_chars: usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            truncate_chars: DEFAULT_TRUNCATE_CHARS,
            split_threshold_chars: DEFAULT_SPLIT_THRESHOLD_CHARS,
            split_half_chars: DEFAULT_SPLIT_HALF_CHARS,
        }
    }
}

impl PrepareConfig {
    /// Check the budgets are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.truncate_chars == 0 {
            return Err("limits.truncate_chars must be greater than 0".to_string());
        }
        if self.split_half_chars == 0 {
            return Err("limits.split_half_chars must be greater than 0".to_string());
        }
        // Halves must not overlap, so a split always drops part of the middle
        let both_halves = self.split_half_chars.saturating_mul(2);
        if self.split_threshold_chars < both_halves {
            return Err(format!(
                "limits.split_threshold_chars ({}) must be at least twice limits.split_half_chars ({})",
                self.split_threshold_chars, self.split_half_chars
            ));
        }
        Ok(())
    }
}
