//! Labeled feature vectors.

use serde::{Deserialize, Serialize};

/// A single raw feature value as produced by a record source.
///
/// Values are resolved to `f64` once, when a [`Record`] is constructed, via
/// the total conversion [`FeatureValue::to_numeric`]. Categorical strings
/// carry no order, so they all resolve to `0.0`; encode them as numbers
/// upstream if they should take part in splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FeatureValue {
    /// Continuous value.
    Numeric(f64),
    /// Boolean flag, coerced to `0.0` / `1.0`.
    Bool(bool),
    /// Categorical string such as a protocol name.
    Categorical(String),
}

impl FeatureValue {
    /// Convert to the numeric value used by split search and routing.
    #[inline]
    pub fn to_numeric(&self) -> f64 {
        match *self {
            FeatureValue::Numeric(v) => v,
            FeatureValue::Bool(true) => 1.0,
            FeatureValue::Bool(false) | FeatureValue::Categorical(_) => 0.0,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Numeric(value)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Categorical(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Categorical(value.to_owned())
    }
}

/// A labeled feature vector.
///
/// `class` is a 1-based label; it is checked against the class count when the
/// record joins a [`RecordSet`](super::RecordSet). Records are immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    class: u32,
    features: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
}

impl Record {
    /// Build a record from raw feature values.
    pub fn new<I>(class: u32, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FeatureValue>,
    {
        let features = values.into_iter().map(|v| v.into().to_numeric()).collect();
        Self { class, features, uid: None }
    }

    /// Build a record from already-numeric features.
    pub fn from_numeric(class: u32, features: Vec<f64>) -> Self {
        Self { class, features, uid: None }
    }

    /// Attach an opaque identifier (reported alongside predictions).
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[inline]
    pub fn class(&self) -> u32 {
        self.class
    }

    #[inline]
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    #[inline]
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }
}
