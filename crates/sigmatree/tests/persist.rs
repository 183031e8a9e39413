//! Integration tests for tree persistence.

use std::fs;
use std::io::BufReader;

use rstest::rstest;
use tempfile::TempDir;

use sigmatree::persist::{self, PersistError};
use sigmatree::repr::{TreeValidationError, TreeView};
use sigmatree::testing::{gaussian_blobs, two_blob_example};
use sigmatree::{DecisionTreeClassifier, ReportError, Tree, TreeConfig};

fn trained(n_classes: u32, seed: u64) -> DecisionTreeClassifier {
    let data = gaussian_blobs(30, n_classes, 4, seed);
    let config = TreeConfig::builder()
        .n_classes(n_classes)
        .purity_threshold(0.95)
        .build()
        .unwrap();
    DecisionTreeClassifier::train(&data, config).unwrap()
}

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.txt");

    let model = trained(3, 17);
    model.save(&path).unwrap();
    let loaded = DecisionTreeClassifier::load(&path).unwrap();

    assert_eq!(loaded.tree(), model.tree());
    let data = gaussian_blobs(30, 3, 4, 18);
    assert_eq!(loaded.predict_batch(&data), model.predict_batch(&data));
}

#[test]
fn saved_file_is_one_line_per_node() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.txt");

    let data = two_blob_example();
    let model = DecisionTreeClassifier::train(&data, TreeConfig::default()).unwrap();
    model.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), model.tree().n_nodes());
    assert!(lines[0].starts_with("false,0,1.90824829046386"));
    assert_eq!(lines[1], "true,0,0,1");
    assert_eq!(lines[2], "true,0,0,2");
}

#[test]
fn load_infers_class_count_from_leaves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.txt");
    fs::write(&path, "false,1,0.5,0\ntrue,0,0,4\ntrue,0,0,2\n").unwrap();

    let model = DecisionTreeClassifier::load(&path).unwrap();
    assert_eq!(model.config().n_classes, 4);
    assert_eq!(model.predict(&[0.0, 0.5]), 4);
    assert_eq!(model.predict(&[0.0, 0.6]), 2);
}

#[test]
fn load_with_classes_rejects_out_of_range_leaves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.txt");
    fs::write(&path, "true,0,0,4294967295\n").unwrap();

    let err = DecisionTreeClassifier::load_with_classes(&path, 2).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Invalid(TreeValidationError::LeafClassOutOfRange {
            node: 0,
            class: u32::MAX,
            n_classes: 2,
        })
    ));

    // The class-agnostic loader accepts it, and evaluation reports the
    // mismatch instead of sizing a matrix from the leaf label.
    let model = DecisionTreeClassifier::load(&path).unwrap();
    assert!(matches!(
        model.evaluate(&two_blob_example()),
        Err(ReportError::LabelOutOfRange { class: u32::MAX, n_classes: 2, .. })
    ));
}

#[test]
fn load_with_classes_keeps_the_given_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.txt");
    fs::write(&path, "false,0,0.5,0\ntrue,0,0,1\ntrue,0,0,2\n").unwrap();

    let model = DecisionTreeClassifier::load_with_classes(&path, 5).unwrap();
    assert_eq!(model.config().n_classes, 5);
    assert_eq!(model.predict(&[0.5]), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = DecisionTreeClassifier::load(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}

#[test]
fn json_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.json");

    let model = trained(2, 3);
    persist::write_json(model.tree(), Some(2), fs::File::create(&path).unwrap()).unwrap();
    let (tree, n_classes) =
        persist::read_json(BufReader::new(fs::File::open(&path).unwrap())).unwrap();

    assert_eq!(&tree, model.tree());
    assert_eq!(n_classes, Some(2));
}

#[rstest]
#[case::too_few_fields("true,0,1\n", 1)]
#[case::too_many_fields("true,0,0,1,9\n", 1)]
#[case::bad_bool("false,0,1.0,0\nmaybe,0,0,1\ntrue,0,0,2\n", 2)]
#[case::bad_index("false,-1,1.0,0\ntrue,0,0,1\ntrue,0,0,2\n", 1)]
#[case::bad_threshold("false,0,1.0.0,0\ntrue,0,0,1\ntrue,0,0,2\n", 1)]
#[case::nan_threshold("false,0,NaN,0\ntrue,0,0,1\ntrue,0,0,2\n", 1)]
#[case::infinite_threshold("false,0,0,0\nfalse,1,inf,0\ntrue,0,0,1\ntrue,0,0,2\ntrue,0,0,3\n", 2)]
#[case::bad_class("false,0,1.0,0\ntrue,0,0,x\ntrue,0,0,2\n", 2)]
#[case::leaf_class_zero("false,0,1.0,0\ntrue,0,0,1\ntrue,0,0,0\n", 3)]
#[case::after_blank_line("false,0,1.0,0\n\ntrue,0,0,1\n,,,\n", 4)]
fn malformed_lines_report_their_position(#[case] text: &str, #[case] expected_line: usize) {
    let err = Tree::from_text(text).unwrap_err();
    let line = match err {
        PersistError::FieldCount { line, .. }
        | PersistError::Parse { line, .. }
        | PersistError::InvalidLeafClass { line } => line,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(line, expected_line);
}

#[rstest]
#[case::empty("", 1)]
#[case::only_blank("\n\n", 1)]
#[case::missing_right("false,0,1.0,0\ntrue,0,0,1\n", 1)]
#[case::missing_both("false,0,1.0,0\nfalse,1,2.0,0\n", 3)]
fn truncated_input(#[case] text: &str, #[case] missing: usize) {
    match Tree::from_text(text) {
        Err(PersistError::Truncated { missing: m }) => assert_eq!(m, missing),
        other => panic!("expected truncation, got {other:?}"),
    }
}

#[test]
fn data_after_a_complete_tree_is_rejected() {
    let err = Tree::from_text("true,0,0,1\n\ntrue,0,0,1\n").unwrap_err();
    assert!(matches!(err, PersistError::TrailingData { line: 3 }));
}
