//! Record data model.
//!
//! - [`FeatureValue`]: tagged raw feature value with a total numeric conversion
//! - [`Record`]: labeled feature vector (1-based class label, optional uid)
//! - [`RecordSet`]: validated collection used for training and evaluation
//! - [`FeatureAccessor`]: read-only numeric access used by tree traversal

mod accessor;
mod dataset;
mod record;

pub use accessor::FeatureAccessor;
pub use dataset::{DatasetError, RecordSet};
pub use record::{FeatureValue, Record};
