//! Hardcoded trees for tests and benchmarks
//!
//! Reference tree (Max root, depth 3, branching 3):
//!   0: Max                         value 3
//!   1: Min  [2: 5, 3: 1, 4: 2]     value 1
//!   5: Min  [6: 0, 7: 7, 8: 9]     value 0, edges 7 and 8 pruned
//!   9: Min  [10: 4, 11: 3, 12: 6]  value 3
//!
//! Lecture tree (Max root, depth 4, branching 2):
//!   0: Max                            value 5
//!   1:   Min                          value 5
//!   2:     Max [3: 3, 4: 5]           value 5
//!   5:     Max [6: 6, 7: 9]           value 6, edge 7 pruned
//!   8:   Min                          value 2
//!   9:     Max [10: 1, 11: 2]         value 2
//!   12:    Max [13: 0, 14: -1]        edge 12 pruned with its whole subtree

use crate::node::{GameTree, Side};

/// Build the 13-node reference tree.
pub fn build_reference_tree() -> GameTree {
    GameTree::from_leaves(Side::Max, 3, 3, &[5, 1, 2, 0, 7, 9, 4, 3, 6])
        .expect("reference tree shape is valid")
}

/// Build the 15-node lecture tree, which prunes an internal subtree.
pub fn build_lecture_tree() -> GameTree {
    GameTree::from_leaves(Side::Max, 4, 2, &[3, 5, 6, 9, 1, 2, 0, -1])
        .expect("lecture tree shape is valid")
}

/// Leaf values in [-20, 20] from a seeded ChaCha stream.
#[cfg(test)]
pub(crate) fn seeded_leaves(count: usize, seed: u64) -> Vec<i32> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(-20..=20)).collect()
}
