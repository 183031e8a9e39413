//! Classifier configuration with builder pattern.
//!
//! ```
//! use sigmatree::TreeConfig;
//!
//! let config = TreeConfig::builder()
//!     .n_classes(3)
//!     .purity_threshold(0.9)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.n_threads, 1);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::training::TrainerParams;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("n_classes must be at least 2, got {0}")]
    TooFewClasses(u32),

    #[error("purity_threshold must be in (0, 1], got {0}")]
    InvalidPurityThreshold(f64),

    #[error("sentinel_entropy {sentinel} must exceed the maximum entropy {max_entropy}")]
    SentinelTooSmall { sentinel: f64, max_entropy: f64 },
}

// =============================================================================
// TreeConfig
// =============================================================================

/// Configuration for training a [`DecisionTreeClassifier`](super::DecisionTreeClassifier).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct TreeConfig {
    /// Number of class labels; records use labels `1..=n_classes`.
    pub n_classes: u32,

    /// A node becomes a leaf once its dominant class makes up at least this
    /// fraction of its records. Default: 0.84.
    #[builder(default = 0.84)]
    pub purity_threshold: f64,

    /// Entropy assigned to features that may not be split on. Must exceed
    /// `log2(n_classes)`. Default: 1e9.
    #[builder(default = 1.0e9)]
    pub sentinel_entropy: f64,

    /// Thread count: 0 = auto, 1 = sequential, >1 = exact count. Default: 1.
    #[builder(default = 1)]
    pub n_threads: usize,
}

/// Custom finishing function that validates the config.
impl<S: tree_config_builder::IsComplete> TreeConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `n_classes < 2`
    /// - `purity_threshold` is outside `(0, 1]`
    /// - `sentinel_entropy <= log2(n_classes)`
    pub fn build(self) -> Result<TreeConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl TreeConfig {
    /// Check every parameter. Also used for configs that were deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_classes < 2 {
            return Err(ConfigError::TooFewClasses(self.n_classes));
        }

        // NaN fails the range check.
        if !(self.purity_threshold > 0.0 && self.purity_threshold <= 1.0) {
            return Err(ConfigError::InvalidPurityThreshold(self.purity_threshold));
        }

        let max_entropy = f64::from(self.n_classes).log2();
        if !self.sentinel_entropy.is_finite() || self.sentinel_entropy <= max_entropy {
            return Err(ConfigError::SentinelTooSmall {
                sentinel: self.sentinel_entropy,
                max_entropy,
            });
        }

        Ok(())
    }

    /// Convert to the trainer's parameter set.
    pub fn to_trainer_params(&self) -> TrainerParams {
        TrainerParams {
            n_classes: self.n_classes,
            purity_threshold: self.purity_threshold,
            sentinel_entropy: self.sentinel_entropy,
        }
    }
}

impl Default for TreeConfig {
    /// Binary classification with default parameters.
    fn default() -> Self {
        Self::builder()
            .n_classes(2)
            .build()
            .expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let config = TreeConfig::builder().n_classes(4).build().unwrap();
        assert_eq!(config.n_classes, 4);
        assert_eq!(config.purity_threshold, 0.84);
        assert_eq!(config.sentinel_entropy, 1.0e9);
        assert_eq!(config.n_threads, 1);
        assert_eq!(TreeConfig::default().n_classes, 2);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.5)]
    #[case(1.01)]
    #[case(f64::NAN)]
    fn invalid_purity_threshold(#[case] value: f64) {
        let result = TreeConfig::builder().n_classes(2).purity_threshold(value).build();
        assert!(matches!(result, Err(ConfigError::InvalidPurityThreshold(_))));
    }

    #[test]
    fn purity_threshold_of_one_is_valid() {
        assert!(TreeConfig::builder().n_classes(2).purity_threshold(1.0).build().is_ok());
    }

    #[test]
    fn too_few_classes() {
        let result = TreeConfig::builder().n_classes(1).build();
        assert_eq!(result, Err(ConfigError::TooFewClasses(1)));
    }

    #[rstest]
    #[case(2, 1.0)]
    #[case(8, 2.5)]
    #[case(2, f64::INFINITY)]
    fn sentinel_must_exceed_max_entropy(#[case] n_classes: u32, #[case] sentinel: f64) {
        let result = TreeConfig::builder()
            .n_classes(n_classes)
            .sentinel_entropy(sentinel)
            .build();
        assert!(matches!(result, Err(ConfigError::SentinelTooSmall { .. })));
    }

    #[test]
    fn serde_round_trip_and_trainer_params() {
        let config = TreeConfig::builder().n_classes(3).n_threads(0).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: TreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let params = config.to_trainer_params();
        assert_eq!(params.n_classes, 3);
        assert_eq!(params.purity_threshold, 0.84);
    }
}
