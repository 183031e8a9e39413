//! Line-oriented text format.
//!
//! ```text
//! false,0,1.25,0
//! true,0,0,1
//! true,0,0,2
//! ```
//!
//! Each line is `is_leaf,split_index,threshold,class`, nodes in pre-order
//! (node, left subtree, right subtree). Interior nodes carry class `0`;
//! leaves carry `0,0` for the split fields. Thresholds use the shortest
//! representation that parses back to the same `f64`, so a round trip is
//! bit-exact.
//!
//! The reader accepts the boolean literals `1 t T TRUE true True` and
//! `0 f F FALSE false False`, trims whitespace around fields and skips blank
//! lines.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::repr::{MutableTree, NodeId, Tree, TreeView};

use super::error::PersistError;

const N_FIELDS: usize = 4;

// =============================================================================
// Writing
// =============================================================================

/// Text rendering of a tree, shared by the `io` and `String` writers.
struct TextLines<'a>(&'a Tree);

impl fmt::Display for TextLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        for node in tree.preorder() {
            if tree.is_leaf(node) {
                writeln!(f, "true,0,0,{}", tree.leaf_class(node))?;
            } else {
                writeln!(
                    f,
                    "false,{},{},0",
                    tree.split_index(node),
                    tree.split_threshold(node)
                )?;
            }
        }
        Ok(())
    }
}

/// Write `tree` in pre-order, one node per line.
pub fn write_tree<W: Write>(tree: &Tree, mut writer: W) -> Result<(), PersistError> {
    write!(writer, "{}", TextLines(tree))?;
    writer.flush()?;
    Ok(())
}

/// Save `tree` to `path` in the text format, replacing any existing file.
pub fn save_text(tree: &Tree, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_tree(tree, BufWriter::new(file))?;
    debug!(path = %path.display(), nodes = tree.n_nodes(), "saved tree");
    Ok(())
}

// =============================================================================
// Reading
// =============================================================================

/// One parsed line.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Line {
    Leaf { class: u32 },
    Split { feature: u32, threshold: f64 },
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_field<T: std::str::FromStr>(
    token: &str,
    line: usize,
    field: &'static str,
) -> Result<T, PersistError> {
    token.parse().map_err(|_| PersistError::Parse {
        line,
        field,
        value: token.to_owned(),
    })
}

fn parse_line(text: &str, line: usize) -> Result<Line, PersistError> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() != N_FIELDS {
        return Err(PersistError::FieldCount { line, expected: N_FIELDS, got: fields.len() });
    }

    let is_leaf = parse_bool(fields[0]).ok_or_else(|| PersistError::Parse {
        line,
        field: "is_leaf",
        value: fields[0].to_owned(),
    })?;
    let feature: u32 = parse_field(fields[1], line, "split_index")?;
    let threshold: f64 = parse_field(fields[2], line, "threshold")?;
    if !threshold.is_finite() {
        return Err(PersistError::Parse {
            line,
            field: "threshold",
            value: fields[2].to_owned(),
        });
    }
    let class: u32 = parse_field(fields[3], line, "class")?;

    if is_leaf {
        if class == 0 {
            return Err(PersistError::InvalidLeafClass { line });
        }
        Ok(Line::Leaf { class })
    } else {
        Ok(Line::Split { feature, threshold })
    }
}

/// Rebuild a tree from its text form.
///
/// Nodes awaiting a line sit on an explicit stack: a split line pushes its
/// right then left child, so the next line always describes the left
/// subtree. The tree is complete when the stack empties.
pub fn read_tree<R: BufRead>(reader: R) -> Result<Tree, PersistError> {
    let mut tree = MutableTree::new();
    let mut pending: Vec<NodeId> = Vec::new();
    let mut started = false;

    for (index, text) in reader.lines().enumerate() {
        let line = index + 1;
        let text = text?;
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let node = if !started {
            started = true;
            tree.init_root()
        } else {
            match pending.pop() {
                Some(node) => node,
                None => return Err(PersistError::TrailingData { line }),
            }
        };

        match parse_line(text, line)? {
            Line::Leaf { class } => tree.make_leaf(node, class),
            Line::Split { feature, threshold } => {
                let (left, right) = tree.apply_split(node, feature, threshold);
                pending.push(right);
                pending.push(left);
            }
        }
    }

    if !started {
        return Err(PersistError::Truncated { missing: 1 });
    }
    if !pending.is_empty() {
        return Err(PersistError::Truncated { missing: pending.len() });
    }

    Ok(tree.freeze()?)
}

/// Load a tree saved with [`save_text`].
pub fn load_text(path: impl AsRef<Path>) -> Result<Tree, PersistError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let tree = read_tree(BufReader::new(file))?;
    debug!(path = %path.display(), nodes = tree.n_nodes(), "loaded tree");
    Ok(tree)
}

impl Tree {
    /// Text form of this tree.
    pub fn to_text(&self) -> String {
        TextLines(self).to_string()
    }

    /// Parse a tree from its text form.
    pub fn from_text(text: &str) -> Result<Self, PersistError> {
        read_tree(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tree {
        let mut tree = MutableTree::new();
        let root = tree.init_root();
        let (left, right) = tree.apply_split(root, 0, 1.25);
        tree.make_leaf(left, 1);
        let (rl, rr) = tree.apply_split(right, 2, -0.125);
        tree.make_leaf(rl, 2);
        tree.make_leaf(rr, 3);
        tree.freeze().unwrap()
    }

    #[test]
    fn writes_preorder_lines() {
        let text = sample_tree().to_text();
        assert_eq!(
            text,
            "false,0,1.25,0\n\
             true,0,0,1\n\
             false,2,-0.125,0\n\
             true,0,0,2\n\
             true,0,0,3\n"
        );
    }

    #[test]
    fn round_trip_is_exact() {
        let mut tree = MutableTree::new();
        let root = tree.init_root();
        let (left, right) = tree.apply_split(root, 1, 1.5 + (1.0f64 / 6.0).sqrt());
        tree.make_leaf(left, 1);
        tree.make_leaf(right, 2);
        let tree = tree.freeze().unwrap();

        let loaded = Tree::from_text(&tree.to_text()).unwrap();
        assert_eq!(loaded, tree);
        assert_eq!(loaded.split_threshold(0).to_bits(), tree.split_threshold(0).to_bits());
    }

    #[test]
    fn accepts_boolean_variants_and_blank_lines() {
        let text = "F, 0, 2.5, 0\n\n  T,0,0,1\n1,0,0,2\n\n";
        let tree = Tree::from_text(text).unwrap();
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.split_threshold(0), 2.5);
        assert_eq!(tree.leaf_class(tree.left_child(0)), 1);
        assert_eq!(tree.leaf_class(tree.right_child(0)), 2);
    }

    #[test]
    fn single_leaf() {
        let tree = Tree::from_text("true,0,0,4\n").unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.leaf_class(0), 4);
    }

    #[test]
    fn errors_name_the_line() {
        let err = Tree::from_text("false,0,1.0,0\ntrue,0,zero,1\n").unwrap_err();
        assert!(matches!(err, PersistError::Parse { line: 2, field: "threshold", .. }));

        let err = Tree::from_text("false,0,1.0\n").unwrap_err();
        assert!(matches!(err, PersistError::FieldCount { line: 1, expected: 4, got: 3 }));

        let err = Tree::from_text("yes,0,0,1\n").unwrap_err();
        assert!(matches!(err, PersistError::Parse { line: 1, field: "is_leaf", .. }));
    }

    #[test]
    fn incomplete_and_overlong_input() {
        let err = Tree::from_text("false,0,1.0,0\ntrue,0,0,1\n").unwrap_err();
        assert!(matches!(err, PersistError::Truncated { missing: 1 }));

        let err = Tree::from_text("").unwrap_err();
        assert!(matches!(err, PersistError::Truncated { missing: 1 }));

        let err = Tree::from_text("true,0,0,1\ntrue,0,0,2\n").unwrap_err();
        assert!(matches!(err, PersistError::TrailingData { line: 2 }));
    }

    #[test]
    fn non_finite_thresholds_are_rejected() {
        for value in ["NaN", "inf", "-infinity"] {
            let text = format!("false,0,{value},0\ntrue,0,0,1\ntrue,0,0,2\n");
            let err = Tree::from_text(&text).unwrap_err();
            assert!(
                matches!(&err, PersistError::Parse { line: 1, field: "threshold", value: v } if v == value),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn writer_and_string_agree() {
        let tree = sample_tree();
        let mut buf = Vec::new();
        write_tree(&tree, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), tree.to_text());
    }

    #[test]
    fn leaf_class_zero_is_rejected() {
        let err = Tree::from_text("true,0,0,0\n").unwrap_err();
        assert!(matches!(err, PersistError::InvalidLeafClass { line: 1 }));
    }
}
