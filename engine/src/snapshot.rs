//! Tree snapshots for the scoring collaborator
//!
//! A snapshot is a nested, serde-friendly mirror of the annotated tree.
//! Bounds stay as [`Bound`] so infinities survive any JSON round trip.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::node::{shape_size, Bound, GameTree, Node, NodeId, NodeKind, Side};

/// Whole-tree snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root_kind: Side,
    pub depth: u32,
    pub branching_factor: u32,
    pub root: NodeSnapshot,
}

/// One node with its children in evaluation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub kind: NodeKind,
    pub depth: u32,
    pub arity: usize,
    /// Leaf value, or the user's value for internal nodes
    pub value: Option<i32>,
    pub alpha: Option<Bound>,
    pub beta: Option<Bound>,
    /// User's pruning mark on the edge to this node (false at the root)
    pub pruned: bool,
    pub children: Vec<NodeSnapshot>,
}

/// Export the tree as it currently stands, user annotation included.
pub fn serialize(tree: &GameTree) -> TreeSnapshot {
    TreeSnapshot {
        root_kind: tree.root_side(),
        depth: tree.depth(),
        branching_factor: tree.branching_factor(),
        root: snapshot_node(tree, tree.root().id()),
    }
}

fn snapshot_node(tree: &GameTree, id: NodeId) -> NodeSnapshot {
    let node = &tree.nodes()[id as usize];
    let (alpha, beta) = node.window();
    NodeSnapshot {
        kind: node.kind(),
        depth: node.depth(),
        arity: node.arity(),
        value: node.value(),
        alpha,
        beta,
        pruned: node.is_pruned(),
        children: node.children().iter().map(|&c| snapshot_node(tree, c)).collect(),
    }
}

/// Rebuild an editable tree from a snapshot.
///
/// The snapshot must describe exactly the uniform alternating tree its
/// header announces.
pub fn restore(snapshot: &TreeSnapshot) -> Result<GameTree> {
    shape_size(snapshot.depth, snapshot.branching_factor)
        .map_err(|e| EngineError::InvalidSnapshot(e.to_string()))?;
    let mut flat = Vec::new();
    flatten(&snapshot.root, &mut flat);

    let mut leaves = Vec::new();
    for (position, node) in flat.iter().enumerate() {
        if node.kind == NodeKind::Leaf {
            let value = node.value.ok_or_else(|| {
                EngineError::InvalidSnapshot(format!("leaf at position {} has no value", position))
            })?;
            leaves.push(value);
        }
    }

    let mut tree = GameTree::from_leaves(
        snapshot.root_kind,
        snapshot.depth,
        snapshot.branching_factor,
        &leaves,
    )
    .map_err(|e| EngineError::InvalidSnapshot(e.to_string()))?;

    if flat.len() != tree.len() {
        return Err(EngineError::InvalidSnapshot(format!(
            "expected {} nodes, snapshot holds {}",
            tree.len(),
            flat.len()
        )));
    }

    for (node, snap) in tree.nodes_mut().iter_mut().zip(&flat) {
        if snap.children.len() != snap.arity {
            return Err(EngineError::InvalidSnapshot(format!(
                "node {} declares {} children but holds {}",
                node.id(),
                snap.arity,
                snap.children.len()
            )));
        }
        if node.kind() != snap.kind || node.depth() != snap.depth || node.arity() != snap.arity {
            return Err(EngineError::InvalidSnapshot(format!(
                "node {} should be a {:?} at depth {} with {} children",
                node.id(),
                node.kind(),
                node.depth(),
                node.arity()
            )));
        }
        match node.parent_mut() {
            Some(edge) => edge.pruned = snap.pruned,
            None if snap.pruned => {
                return Err(EngineError::InvalidSnapshot("root cannot be pruned".to_string()));
            }
            None => {}
        }
        if let Node::Internal { value, alpha, beta, .. } = node {
            *value = snap.value;
            *alpha = snap.alpha;
            *beta = snap.beta;
        }
    }
    Ok(tree)
}

/// Pre-order listing without recursion; nesting depth is untrusted here.
fn flatten<'a>(root: &'a NodeSnapshot, out: &mut Vec<&'a NodeSnapshot>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{reset, reveal_solution};
    use crate::test_tree::{build_lecture_tree, build_reference_tree};

    #[test]
    fn test_snapshot_mirrors_tree() {
        let tree = build_reference_tree();
        let snap = serialize(&tree);
        assert_eq!(snap.root_kind, Side::Max);
        assert_eq!(snap.depth, 3);
        assert_eq!(snap.branching_factor, 3);
        assert_eq!(snap.root.kind, NodeKind::Max);
        assert_eq!(snap.root.arity, 3);
        assert!(!snap.root.pruned);
        let min2 = &snap.root.children[1];
        assert_eq!(min2.kind, NodeKind::Min);
        assert_eq!(min2.depth, 2);
        let leaf_values: Vec<Option<i32>> = min2.children.iter().map(|c| c.value).collect();
        assert_eq!(leaf_values, vec![Some(0), Some(7), Some(9)]);
        assert!(min2.children.iter().all(|c| c.kind == NodeKind::Leaf && c.arity == 0));
    }

    #[test]
    fn test_infinite_bounds_encoded_as_tags() {
        let mut tree = build_reference_tree();
        reveal_solution(&mut tree);
        let json = serde_json::to_value(serialize(&tree)).unwrap();
        assert_eq!(json["root"]["alpha"], serde_json::json!({"kind": "finite", "value": 3}));
        assert_eq!(json["root"]["beta"], serde_json::json!({"kind": "pos_infinity"}));
        assert_eq!(
            json["root"]["children"][0]["alpha"],
            serde_json::json!({"kind": "neg_infinity"})
        );
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut tree = build_lecture_tree();
        reveal_solution(&mut tree);
        let snap = serialize(&tree);
        let text = serde_json::to_string(&snap).unwrap();
        let decoded: TreeSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, snap);

        let restored = restore(&decoded).unwrap();
        assert!(restored.is_editable());
        assert_eq!(serialize(&restored), snap);
    }

    #[test]
    fn test_reset_snapshot_keeps_leaves_and_clears_annotation() {
        let mut tree = build_lecture_tree();
        let leaves_before: Vec<(NodeId, i32)> = tree.leaves().collect();
        reveal_solution(&mut tree);
        reset(&mut tree);
        let snap = serialize(&tree);

        let mut flat = Vec::new();
        flatten(&snap.root, &mut flat);
        let mut leaf_values = Vec::new();
        for node in flat {
            assert!(!node.pruned);
            if node.kind == NodeKind::Leaf {
                leaf_values.push(node.value.unwrap());
            } else {
                assert_eq!(node.value, None);
                assert_eq!((node.alpha, node.beta), (None, None));
            }
        }
        let expected: Vec<i32> = leaves_before.into_iter().map(|(_, v)| v).collect();
        assert_eq!(leaf_values, expected);
    }

    #[test]
    fn test_restore_rejects_bad_shape() {
        let tree = build_reference_tree();

        let mut wrong_arity = serialize(&tree);
        wrong_arity.root.children.pop();
        assert!(matches!(restore(&wrong_arity), Err(EngineError::InvalidSnapshot(_))));

        let mut wrong_kind = serialize(&tree);
        wrong_kind.root.children[0].kind = NodeKind::Max;
        assert!(matches!(restore(&wrong_kind), Err(EngineError::InvalidSnapshot(_))));

        let mut missing_leaf = serialize(&tree);
        missing_leaf.root.children[2].children[0].value = None;
        assert!(matches!(restore(&missing_leaf), Err(EngineError::InvalidSnapshot(_))));

        // Second leaf re-hung under the first: pre-order kinds still line up
        let mut regrafted = serialize(&GameTree::from_leaves(Side::Max, 2, 2, &[1, 2]).unwrap());
        let second = regrafted.root.children.pop().unwrap();
        regrafted.root.children[0].children.push(second);
        assert!(matches!(restore(&regrafted), Err(EngineError::InvalidSnapshot(_))));

        let mut too_deep = serialize(&tree);
        too_deep.depth = 200_000;
        assert!(matches!(restore(&too_deep), Err(EngineError::InvalidSnapshot(_))));

        let mut pruned_root = serialize(&tree);
        pruned_root.root.pruned = true;
        assert!(matches!(restore(&pruned_root), Err(EngineError::InvalidSnapshot(_))));
    }
}
