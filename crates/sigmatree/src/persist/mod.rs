//! Tree persistence.
//!
//! Two formats:
//!
//! - **Text** ([`text`]): the canonical interchange format. One node per
//!   line in pre-order, `is_leaf,split_index,threshold,class`. The reader
//!   rebuilds the shape from the `is_leaf` flags alone; there is no header or
//!   node count.
//! - **JSON** ([`json`]): a versioned structure-of-arrays document
//!   ([`schema::TreeSchema`]) for tooling that prefers a self-describing
//!   format.
//!
//! Every loaded tree is validated before it is returned, so a successful
//! load always yields a complete, routable tree.

mod convert;
mod error;
pub mod json;
pub mod schema;
pub mod text;

pub use error::PersistError;
pub use json::{from_json, read_json, to_json, write_json};
pub use schema::{TreeDocument, TreeSchema, SCHEMA_VERSION};
pub use text::{load_text, read_tree, save_text, write_tree};
