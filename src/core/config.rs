//! Engine configuration.
//!
//! All delays are measured in ticks of the engine's logical clock. The
//! host decides how long a tick lasts; the reference UI advances one tick
//! per second, which gives the classic timings:
//!
//! - preview: 3 ticks with every face shown
//! - miss: 1 tick before a mismatched pair flips back
//! - milestone: celebration at 10 pairs, lasting 5 ticks

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Default number of ticks all faces are shown after a new game.
pub const DEFAULT_PREVIEW_TICKS: u64 = 3;

/// Default number of ticks a missed pair stays face-up.
pub const DEFAULT_MISMATCH_TICKS: u64 = 1;

/// Default score at which the milestone celebration fires.
pub const DEFAULT_MILESTONE_SCORE: u32 = 10;

/// Default number of ticks the milestone celebration lasts.
pub const DEFAULT_MILESTONE_TICKS: u64 = 5;

/// Engine configuration.
///
/// Build with the `with_*` methods or deserialize from any serde format.
/// Missing fields fall back to their defaults.
///
/// ```
/// use memory_pairs::core::EngineConfig;
///
/// let config = EngineConfig::new().with_seed(42).with_mismatch_ticks(2);
/// assert_eq!(config.mismatch_ticks, 2);
/// assert_eq!(config.preview_ticks, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks the whole deck is shown face-up after `new_game`.
    pub preview_ticks: u64,

    /// Ticks a mismatched pair stays revealed before flipping back.
    pub mismatch_ticks: u64,

    /// Score that triggers the milestone celebration.
    pub milestone_score: u32,

    /// Ticks the milestone celebration lasts.
    pub milestone_ticks: u64,

    /// Shuffle seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_ticks: DEFAULT_PREVIEW_TICKS,
            mismatch_ticks: DEFAULT_MISMATCH_TICKS,
            milestone_score: DEFAULT_MILESTONE_SCORE,
            milestone_ticks: DEFAULT_MILESTONE_TICKS,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default timings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preview duration.
    #[must_use]
    pub fn with_preview_ticks(mut self, ticks: u64) -> Self {
        self.preview_ticks = ticks;
        self
    }

    /// Set the mismatch flip-back delay.
    #[must_use]
    pub fn with_mismatch_ticks(mut self, ticks: u64) -> Self {
        self.mismatch_ticks = ticks;
        self
    }

    /// Set the milestone score threshold.
    #[must_use]
    pub fn with_milestone_score(mut self, score: u32) -> Self {
        self.milestone_score = score;
        self
    }

    /// Set the milestone celebration duration.
    #[must_use]
    pub fn with_milestone_ticks(mut self, ticks: u64) -> Self {
        self.milestone_ticks = ticks;
        self
    }

    /// Fix the shuffle seed for reproducible decks.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration for values the engine cannot honor.
    ///
    /// A milestone at score 0 would fire before any pair is found.
    pub fn validate(&self) -> Result<()> {
        if self.milestone_score == 0 {
            return Err(EngineError::InvalidConfig(
                "milestone_score must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.preview_ticks, 3);
        assert_eq!(config.mismatch_ticks, 1);
        assert_eq!(config.milestone_score, 10);
        assert_eq!(config.milestone_ticks, 5);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_preview_ticks(0)
            .with_mismatch_ticks(4)
            .with_milestone_score(2)
            .with_milestone_ticks(1)
            .with_seed(7);

        assert_eq!(config.preview_ticks, 0);
        assert_eq!(config.mismatch_ticks, 4);
        assert_eq!(config.milestone_score, 2);
        assert_eq!(config.milestone_ticks, 1);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_zero_milestone() {
        let config = EngineConfig::new().with_milestone_score(0);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_serde_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"mismatch_ticks": 2, "seed": 9}"#).unwrap();

        assert_eq!(config.mismatch_ticks, 2);
        assert_eq!(config.seed, Some(9));
        // Unspecified fields keep their defaults
        assert_eq!(config.preview_ticks, DEFAULT_PREVIEW_TICKS);
        assert_eq!(config.milestone_score, DEFAULT_MILESTONE_SCORE);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = EngineConfig::new().with_seed(123).with_milestone_ticks(8);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
