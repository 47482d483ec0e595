//! Answer verification
//!
//! Recomputes the canonical search from scratch at every internal node and
//! compares it with what the user entered. Nothing from a previous
//! [`crate::search::solve`] run is consulted, and the tree is never mutated.
//!
//! Children the search prunes are not descended into: whatever the user
//! wrote below a pruned edge does not affect the verdict.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::{Bound, GameTree, Node, NodeId, Side};

/// The first disagreement found between the user's annotation and the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mismatch", rename_all = "snake_case")]
pub enum Mismatch {
    /// Internal node has no value entered
    MissingValue { node: NodeId, expected: i32 },
    /// Internal node value differs from the search value
    WrongValue { node: NodeId, expected: i32, found: i32 },
    /// Pruning mark on the edge to `node` is wrong
    WrongPruning { node: NodeId, expected: bool, found: bool },
}

impl Mismatch {
    /// The node the mismatch refers to
    pub fn node(&self) -> NodeId {
        match self {
            Mismatch::MissingValue { node, .. }
            | Mismatch::WrongValue { node, .. }
            | Mismatch::WrongPruning { node, .. } => *node,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::MissingValue { node, expected } => {
                write!(f, "node {} has no value, expected {}", node, expected)
            }
            Mismatch::WrongValue { node, expected, found } => {
                write!(f, "node {} has value {}, expected {}", node, found, expected)
            }
            Mismatch::WrongPruning { node, expected: true, .. } => {
                write!(f, "edge to node {} should be pruned", node)
            }
            Mismatch::WrongPruning { node, expected: false, .. } => {
                write!(f, "edge to node {} should not be pruned", node)
            }
        }
    }
}

/// Outcome of checking an annotated tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// First mismatch in search order, if any
    pub mismatch: Option<Mismatch>,
    /// Internal nodes inspected before stopping
    pub nodes_checked: usize,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Check the user's annotation against a fresh search.
pub fn check(tree: &GameTree) -> Verdict {
    let mut nodes_checked = 0;
    let mismatch = check_node(
        tree,
        tree.root().id(),
        Bound::NegInfinity,
        Bound::PosInfinity,
        &mut nodes_checked,
    );
    match &mismatch {
        Some(m) => debug!(%m, nodes_checked, "answer rejected"),
        None => debug!(nodes_checked, "answer accepted"),
    }
    Verdict { mismatch, nodes_checked }
}

/// Boolean form of [`check`].
pub fn verify(tree: &GameTree) -> bool {
    check(tree).is_correct()
}

fn check_node(
    tree: &GameTree,
    id: NodeId,
    alpha: Bound,
    beta: Bound,
    nodes_checked: &mut usize,
) -> Option<Mismatch> {
    let node = &tree.nodes()[id as usize];
    if node.is_leaf() {
        return None;
    }
    *nodes_checked += 1;

    let expected = probe(tree, id, alpha, beta);
    match node.value() {
        None => {
            return Some(Mismatch::MissingValue { node: id, expected: expected.value });
        }
        Some(found) if found != expected.value => {
            return Some(Mismatch::WrongValue { node: id, expected: expected.value, found });
        }
        Some(_) => {}
    }

    for (&child, outcome) in node.children().iter().zip(&expected.children) {
        let found = tree.nodes()[child as usize].is_pruned();
        if found != outcome.pruned {
            return Some(Mismatch::WrongPruning { node: child, expected: outcome.pruned, found });
        }
        if !outcome.pruned {
            let (child_alpha, child_beta) = outcome.window;
            if let Some(m) = check_node(tree, child, child_alpha, child_beta, nodes_checked) {
                return Some(m);
            }
        }
    }
    None
}

/// How the search treats one child of a node
struct ChildOutcome {
    /// Window in force when the search reached the child
    window: (Bound, Bound),
    pruned: bool,
}

struct Probe {
    value: i32,
    children: Vec<ChildOutcome>,
}

/// Search the subtree at `id` with the given window, reporting per-child
/// outcomes. Pure; shares no state with [`crate::search`].
fn probe(tree: &GameTree, id: NodeId, mut alpha: Bound, mut beta: Bound) -> Probe {
    let (side, children) = match &tree.nodes()[id as usize] {
        Node::Leaf { value, .. } => return Probe { value: *value, children: Vec::new() },
        Node::Internal { side, children, .. } => (*side, children),
    };

    let mut value = side.worst();
    let mut outcomes = Vec::with_capacity(children.len());
    let mut cut = false;
    for &child in children {
        if cut {
            outcomes.push(ChildOutcome { window: (alpha, beta), pruned: true });
            continue;
        }
        outcomes.push(ChildOutcome { window: (alpha, beta), pruned: false });

        value = side.better(value, probe(tree, child, alpha, beta).value);
        match side {
            Side::Max => alpha = alpha.max(Bound::Finite(value)),
            Side::Min => beta = beta.min(Bound::Finite(value)),
        }
        cut = beta <= alpha;
    }

    Probe { value, children: outcomes }
}
