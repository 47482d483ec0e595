//! Shape and search properties of generated trees

use abprune_engine::lifecycle::{check_answer, reset, reveal_solution};
use abprune_engine::node::{NodeKind, Side};
use abprune_engine::search::{minimax, solve};
use abprune_engine::snapshot::serialize;
use abprune_engine::verify::Mismatch;
use abprune_tree::{generate_seeded, TreeParams};
use rstest::rstest;

fn params(root_kind: Side, depth: u32, branching_factor: u32) -> TreeParams {
    TreeParams { root_kind, depth, branching_factor, ..TreeParams::default() }
}

// ============================================================
// Shape
// ============================================================

#[rstest]
#[case(1, 1)]
#[case(1, 4)]
#[case(2, 3)]
#[case(3, 2)]
#[case(4, 3)]
#[case(5, 4)]
#[case(6, 1)]
fn given_shape_when_generating_then_leaf_count_is_bf_pow_depth_minus_one(
    #[case] depth: u32,
    #[case] branching_factor: u32,
) {
    let tree = generate_seeded(&params(Side::Max, depth, branching_factor), 9).unwrap();
    assert_eq!(tree.leaf_count(), branching_factor.pow(depth - 1) as usize);
    for node in tree.nodes() {
        if node.is_leaf() {
            assert_eq!(node.depth(), depth);
        } else {
            assert!(node.depth() < depth);
            assert_eq!(node.arity(), branching_factor as usize);
        }
    }
}

#[rstest]
#[case(Side::Max)]
#[case(Side::Min)]
fn given_root_kind_when_generating_then_kinds_alternate(#[case] root_kind: Side) {
    let tree = generate_seeded(&params(root_kind, 5, 2), 4).unwrap();
    for node in tree.nodes() {
        let expected = if node.is_leaf() {
            NodeKind::Leaf
        } else if node.depth() % 2 == 1 {
            root_kind.into()
        } else {
            root_kind.opponent().into()
        };
        assert_eq!(node.kind(), expected, "node {}", node.id());
    }
}

// ============================================================
// Search properties
// ============================================================

#[rstest]
#[case(Side::Max, 3, 3)]
#[case(Side::Min, 3, 3)]
#[case(Side::Max, 4, 4)]
#[case(Side::Min, 5, 2)]
#[case(Side::Max, 5, 4)]
fn given_generated_tree_when_solving_then_value_matches_minimax_and_reveal_checks(
    #[case] root_kind: Side,
    #[case] depth: u32,
    #[case] branching_factor: u32,
) {
    for seed in 0..25 {
        let mut tree = generate_seeded(&params(root_kind, depth, branching_factor), seed).unwrap();
        let solution = solve(&tree);
        assert_eq!(solution.root_value(), minimax(&tree), "seed {}", seed);

        for id in solution.pruned_edges() {
            for &child in tree.get(id).unwrap().children() {
                assert!(solution.is_pruned(child), "seed {} child {}", seed, child);
            }
        }

        reveal_solution(&mut tree);
        assert!(check_answer(&tree).is_correct(), "seed {}", seed);
    }
}

#[test]
fn given_correct_values_when_one_pruned_edge_is_unmarked_then_check_fails() {
    let p = params(Side::Max, 4, 3);
    let mut found = 0;
    for seed in 0..50 {
        let mut tree = generate_seeded(&p, seed).unwrap();
        let solution = solve(&tree);
        let Some(first_pruned) = solution.pruned_edges().next() else {
            continue;
        };
        let internal: Vec<_> = tree.internal_ids().collect();
        for id in internal {
            if let Some(v) = solution.value(id) {
                tree.set_value(id, v).unwrap();
            }
        }
        let pruned: Vec<_> = solution.pruned_edges().filter(|&id| id != first_pruned).collect();
        for id in pruned {
            tree.set_pruned(id, true).unwrap();
        }
        let verdict = check_answer(&tree);
        assert_eq!(
            verdict.mismatch,
            Some(Mismatch::WrongPruning { node: first_pruned, expected: true, found: false }),
            "seed {}",
            seed
        );
        found += 1;
    }
    assert!(found > 0, "no seed produced a cutoff");
}

#[test]
fn given_revealed_tree_when_reset_then_snapshot_keeps_leaves_only() {
    let mut tree = generate_seeded(&TreeParams::default(), 17).unwrap();
    let leaves: Vec<_> = tree.leaves().collect();
    reveal_solution(&mut tree);
    reset(&mut tree);

    let snap = serialize(&tree);
    assert!(snap.root.value.is_none());
    assert!(!snap.root.pruned);
    assert_eq!(tree.leaves().collect::<Vec<_>>(), leaves);
    assert!(tree.nodes().iter().all(|n| !n.is_pruned()));
    assert!(tree.internal_ids().all(|id| tree.get(id).unwrap().value().is_none()));
}
