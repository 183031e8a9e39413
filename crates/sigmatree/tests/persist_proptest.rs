//! Property-based tests for the persist module.
//!
//! Arbitrary trees are built with `MutableTree`, written out and read back;
//! the loaded tree must be structurally identical and route every sample the
//! same way.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use sigmatree::persist;
use sigmatree::repr::{MutableTree, NodeId, TreeView};
use sigmatree::Tree;

const N_FEATURES: u32 = 6;

// =============================================================================
// Arbitrary Tree Generators
// =============================================================================

/// Strategy for finite thresholds, including awkward decimal expansions.
fn arb_threshold() -> impl Strategy<Value = f64> {
    prop_oneof![
        prop::num::f64::NORMAL.prop_map(|x| x.clamp(-1e12, 1e12)),
        (-1000i32..1000).prop_map(|v| f64::from(v) / 7.0),
        Just(0.0),
        Just(-0.0),
    ]
}

/// One decision per node, consumed in pre-order: `None` = leaf (class from
/// the stream), `Some` = split.
#[derive(Debug, Clone)]
struct Blueprint {
    splits: Vec<Option<(u32, f64)>>,
    classes: Vec<u32>,
}

fn arb_blueprint() -> impl Strategy<Value = Blueprint> {
    (
        prop_vec(prop::option::weighted(0.55, (0..N_FEATURES, arb_threshold())), 1..40),
        prop_vec(1u32..=5, 1..40),
    )
        .prop_map(|(splits, classes)| Blueprint { splits, classes })
}

/// Build a tree from a blueprint. Splits beyond the blueprint become leaves,
/// so construction always terminates.
fn build(blueprint: &Blueprint) -> Tree {
    let mut tree = MutableTree::new();
    let root = tree.init_root();
    let mut pending: Vec<NodeId> = vec![root];
    let mut step = 0usize;

    while let Some(node) = pending.pop() {
        let decision = blueprint.splits.get(step).copied().flatten();
        let class = blueprint.classes[step % blueprint.classes.len()];
        step += 1;
        match decision {
            Some((feature, threshold)) if step < blueprint.splits.len() => {
                let (left, right) = tree.apply_split(node, feature, threshold);
                pending.push(right);
                pending.push(left);
            }
            _ => tree.make_leaf(node, class),
        }
    }
    tree.freeze().unwrap()
}

fn arb_sample() -> impl Strategy<Value = Vec<f64>> {
    prop_vec(arb_threshold(), N_FEATURES as usize)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn text_round_trip_preserves_structure(blueprint in arb_blueprint()) {
        let tree = build(&blueprint);
        let loaded = Tree::from_text(&tree.to_text()).unwrap();
        prop_assert_eq!(&loaded, &tree);
        prop_assert_eq!(loaded.to_text(), tree.to_text());
    }

    #[test]
    fn text_round_trip_preserves_predictions(
        blueprint in arb_blueprint(),
        samples in prop_vec(arb_sample(), 1..20),
    ) {
        let tree = build(&blueprint);
        let loaded = Tree::from_text(&tree.to_text()).unwrap();
        for sample in &samples {
            prop_assert_eq!(
                loaded.leaf_class(loaded.traverse_to_leaf(sample)),
                tree.leaf_class(tree.traverse_to_leaf(sample))
            );
        }
    }

    #[test]
    fn json_round_trip_preserves_structure(blueprint in arb_blueprint()) {
        let tree = build(&blueprint);
        let (loaded, n_classes) = persist::from_json(&persist::to_json(&tree, Some(5)).unwrap()).unwrap();
        prop_assert_eq!(&loaded, &tree);
        prop_assert_eq!(n_classes, Some(5));
    }
}
