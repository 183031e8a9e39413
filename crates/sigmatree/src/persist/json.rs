//! JSON persistence via [`TreeDocument`].

use std::io::{Read, Write};

use tracing::debug;

use crate::repr::{Tree, TreeView};

use super::error::PersistError;
use super::schema::{TreeDocument, TreeSchema, SCHEMA_VERSION};

fn document(tree: &Tree, n_classes: Option<u32>) -> TreeDocument {
    TreeDocument {
        version: SCHEMA_VERSION,
        n_classes,
        tree: TreeSchema::from(tree),
    }
}

fn from_document(doc: TreeDocument) -> Result<(Tree, Option<u32>), PersistError> {
    if doc.version != SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: doc.version,
            supported: SCHEMA_VERSION,
        });
    }
    let tree = Tree::try_from(doc.tree)?;
    debug!(nodes = tree.n_nodes(), version = doc.version, "decoded JSON tree");
    Ok((tree, doc.n_classes))
}

/// Pretty-printed JSON document for `tree`.
pub fn to_json(tree: &Tree, n_classes: Option<u32>) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&document(tree, n_classes))?)
}

/// Decode a document produced by [`to_json`]. Returns the tree and the
/// recorded class count, if any.
pub fn from_json(json: &str) -> Result<(Tree, Option<u32>), PersistError> {
    from_document(serde_json::from_str(json)?)
}

/// Write a JSON document for `tree` to `writer`.
pub fn write_json<W: Write>(
    tree: &Tree,
    n_classes: Option<u32>,
    mut writer: W,
) -> Result<(), PersistError> {
    serde_json::to_writer_pretty(&mut writer, &document(tree, n_classes))?;
    writer.flush()?;
    Ok(())
}

/// Read a JSON document from `reader`.
pub fn read_json<R: Read>(reader: R) -> Result<(Tree, Option<u32>), PersistError> {
    from_document(serde_json::from_reader(reader)?)
}
