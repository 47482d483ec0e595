//! Problem lifecycle: reset, reveal solution, check answer
//!
//! Each operation is idempotent for a given starting state. Reveal freezes the
//! tree; reset clears every annotation and makes it editable again. Leaf
//! values and tree shape are never touched.

use tracing::info;

use crate::error::Result;
use crate::node::{GameTree, Node, NodeId};
use crate::score::ScoreRecord;
use crate::search::{solve, Solution};
use crate::verify::{check, Verdict};

/// Clear all user values, windows and pruning marks.
pub fn reset(tree: &mut GameTree) {
    for node in tree.nodes_mut() {
        if let Node::Internal { value, alpha, beta, .. } = node {
            *value = None;
            *alpha = None;
            *beta = None;
        }
        if let Some(edge) = node.parent_mut() {
            edge.pruned = false;
        }
    }
    tree.set_editable(true);
}

/// Overwrite the user annotation with a fresh canonical solution and freeze
/// the tree. Returns the solution that was applied.
pub fn reveal_solution(tree: &mut GameTree) -> Solution {
    let solution = solve(tree);
    for node in tree.nodes_mut() {
        let id = node.id();
        if let Node::Internal { value, alpha, beta, .. } = node {
            let window = solution.window(id);
            *value = solution.value(id);
            *alpha = window.map(|(a, _)| a);
            *beta = window.map(|(_, b)| b);
        }
        if let Some(edge) = node.parent_mut() {
            edge.pruned = solution.is_pruned(id);
        }
    }
    tree.set_editable(false);
    info!(root_value = solution.root_value(), "solution revealed");
    solution
}

/// Verify the current annotation. Never mutates the tree.
pub fn check_answer(tree: &GameTree) -> Verdict {
    check(tree)
}

/// One interactive problem: a tree plus its canonical solution.
///
/// The solution is computed once on creation and refreshed by
/// [`Session::evaluate`] and [`Session::reveal_solution`]. It is never shown
/// through the tree itself until revealed.
#[derive(Debug, Clone)]
pub struct Session {
    tree: GameTree,
    solution: Solution,
}

impl Session {
    pub fn new(tree: GameTree) -> Self {
        let solution = solve(&tree);
        Session { tree, solution }
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn into_tree(self) -> GameTree {
        self.tree
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Re-run the search and return the root value.
    pub fn evaluate(&mut self) -> i32 {
        self.solution = solve(&self.tree);
        self.solution.root_value()
    }

    pub fn set_value(&mut self, id: NodeId, value: i32) -> Result<()> {
        self.tree.set_value(id, value)
    }

    pub fn clear_value(&mut self, id: NodeId) -> Result<()> {
        self.tree.clear_value(id)
    }

    pub fn toggle_pruned(&mut self, id: NodeId) -> Result<bool> {
        self.tree.toggle_pruned(id)
    }

    pub fn reset(&mut self) {
        reset(&mut self.tree);
    }

    pub fn reveal_solution(&mut self) {
        self.solution = reveal_solution(&mut self.tree);
    }

    pub fn check_answer(&self) -> Verdict {
        check_answer(&self.tree)
    }

    /// Record for the scoring collaborator
    pub fn score_record(&self, verdict: &Verdict) -> ScoreRecord {
        ScoreRecord::new(&self.tree, verdict)
    }
}
