//! Canonical alpha-beta search
//!
//! One left-to-right pass with window `(-inf, +inf)` at the root. The cutoff
//! test runs after each child, so the first child of every node is always
//! searched. Once `beta <= alpha`, every later sibling and its whole subtree
//! is marked pruned.
//!
//! Results go into a [`Solution`] indexed by node id; the tree itself is only
//! read for shape and leaf values.

use tracing::{debug, trace};

use crate::node::{Bound, GameTree, Node, NodeId, Side};

/// Canonical values, windows and pruning marks for one tree.
///
/// Nodes inside a pruned subtree are never visited and keep `None` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    root_value: i32,
    /// values[node_id]
    values: Vec<Option<i32>>,
    /// windows[node_id]: final (alpha, beta) at visited internal nodes
    windows: Vec<Option<(Bound, Bound)>>,
    /// pruned[node_id]: canonical mark on the edge to the node's parent
    pruned: Vec<bool>,
}

impl Solution {
    fn with_capacity(num_nodes: usize) -> Self {
        Solution {
            root_value: 0,
            values: vec![None; num_nodes],
            windows: vec![None; num_nodes],
            pruned: vec![false; num_nodes],
        }
    }

    pub fn root_value(&self) -> i32 {
        self.root_value
    }

    /// Canonical value of a node, if the search reached it
    pub fn value(&self, id: NodeId) -> Option<i32> {
        self.values.get(id as usize).copied().flatten()
    }

    /// Final `(alpha, beta)` window of a visited internal node
    pub fn window(&self, id: NodeId) -> Option<(Bound, Bound)> {
        self.windows.get(id as usize).copied().flatten()
    }

    /// Whether the edge to this node is canonically pruned
    pub fn is_pruned(&self, id: NodeId) -> bool {
        self.pruned.get(id as usize).copied().unwrap_or(false)
    }

    /// Ids whose parent edge is pruned, in pre-order
    pub fn pruned_edges(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.pruned
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(|(id, _)| id as NodeId)
    }

    /// Number of nodes the search actually reached
    pub fn visited_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Run the canonical alpha-beta search.
pub fn solve(tree: &GameTree) -> Solution {
    let mut solution = Solution::with_capacity(tree.len());
    let root = tree.root().id();
    solution.root_value = visit(tree, &mut solution, root, Bound::NegInfinity, Bound::PosInfinity);
    debug!(
        root_value = solution.root_value,
        visited = solution.visited_count(),
        pruned_edges = solution.pruned_edges().count(),
        "alpha-beta search finished"
    );
    solution
}

fn visit(tree: &GameTree, solution: &mut Solution, id: NodeId, mut alpha: Bound, mut beta: Bound) -> i32 {
    let (side, children) = match &tree.nodes()[id as usize] {
        Node::Leaf { value, .. } => {
            solution.values[id as usize] = Some(*value);
            return *value;
        }
        Node::Internal { side, children, .. } => (*side, children.as_slice()),
    };

    let mut value = side.worst();
    for (i, &child) in children.iter().enumerate() {
        let child_value = visit(tree, solution, child, alpha, beta);
        value = side.better(value, child_value);
        match side {
            Side::Max => alpha = alpha.max(Bound::Finite(value)),
            Side::Min => beta = beta.min(Bound::Finite(value)),
        }

        if beta <= alpha {
            let rest = &children[i + 1..];
            if !rest.is_empty() {
                trace!(node = id, %alpha, %beta, pruned = rest.len(), "cutoff");
            }
            for &sibling in rest {
                mark_subtree_pruned(tree, solution, sibling);
            }
            break;
        }
    }

    solution.values[id as usize] = Some(value);
    solution.windows[id as usize] = Some((alpha, beta));
    value
}

fn mark_subtree_pruned(tree: &GameTree, solution: &mut Solution, id: NodeId) {
    solution.pruned[id as usize] = true;
    for &child in tree.nodes()[id as usize].children() {
        mark_subtree_pruned(tree, solution, child);
    }
}

/// Plain minimax over every node, no pruning.
pub fn minimax(tree: &GameTree) -> i32 {
    fn walk(tree: &GameTree, id: NodeId) -> i32 {
        match &tree.nodes()[id as usize] {
            Node::Leaf { value, .. } => *value,
            Node::Internal { side, children, .. } => children
                .iter()
                .map(|&c| walk(tree, c))
                .fold(side.worst(), |acc, v| side.better(acc, v)),
        }
    }
    walk(tree, tree.root().id())
}
