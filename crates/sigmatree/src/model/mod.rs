//! High-level model API.
//!
//! - [`TreeConfig`]: validated training configuration (builder)
//! - [`DecisionTreeClassifier`]: train, predict, evaluate, save and load

mod classifier;
mod config;

pub use classifier::DecisionTreeClassifier;
pub use config::{ConfigError, TreeConfig};
