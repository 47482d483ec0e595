//! Random practice-tree generation
//!
//! Leaves are drawn uniformly from `[min_leaf, max_leaf]` left to right and
//! handed to [`GameTree::from_leaves`], which lays the tree out top-down.

use abprune_engine::node::{shape_size, GameTree, Side};
use abprune_engine::{EngineError, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for a new problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Side to move at the root
    pub root_kind: Side,
    /// Number of levels including the leaf row
    pub depth: u32,
    /// Children per internal node
    pub branching_factor: u32,
    /// Smallest leaf value (inclusive)
    pub min_leaf: i32,
    /// Largest leaf value (inclusive)
    pub max_leaf: i32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            root_kind: Side::Max,
            depth: 4,
            branching_factor: 3,
            min_leaf: -20,
            max_leaf: 20,
        }
    }
}

impl TreeParams {
    /// Check the parameters and return the number of leaves they imply.
    pub fn validate(&self) -> Result<usize> {
        if self.min_leaf > self.max_leaf {
            return Err(EngineError::InvalidParameter(format!(
                "leaf range is empty: [{}, {}]",
                self.min_leaf, self.max_leaf
            )));
        }
        let (_, leaves) = shape_size(self.depth, self.branching_factor)?;
        Ok(leaves)
    }
}

/// Generate a tree, drawing leaf values from `rng`.
pub fn generate<R: Rng>(params: &TreeParams, rng: &mut R) -> Result<GameTree> {
    let leaf_count = params.validate()?;
    let leaves: Vec<i32> = (0..leaf_count)
        .map(|_| rng.gen_range(params.min_leaf..=params.max_leaf))
        .collect();
    let tree = GameTree::from_leaves(params.root_kind, params.depth, params.branching_factor, &leaves)?;
    debug!(
        root = %params.root_kind,
        depth = params.depth,
        branching_factor = params.branching_factor,
        nodes = tree.len(),
        "generated tree"
    );
    Ok(tree)
}

/// Generate a reproducible tree from a seed.
pub fn generate_seeded(params: &TreeParams, seed: u64) -> Result<GameTree> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(params, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abprune_engine::node::NodeKind;

    #[test]
    fn test_default_params() {
        let params = TreeParams::default();
        assert_eq!(params.validate().unwrap(), 27);
        let tree = generate_seeded(&params, 1).unwrap();
        assert_eq!(tree.len(), 40);
        assert_eq!(tree.root().kind(), NodeKind::Max);
    }

    #[test]
    fn test_leaves_within_range() {
        let params = TreeParams { min_leaf: -3, max_leaf: 3, ..TreeParams::default() };
        for seed in 0..20 {
            let tree = generate_seeded(&params, seed).unwrap();
            assert!(tree.leaves().all(|(_, v)| (-3..=3).contains(&v)));
        }
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let params = TreeParams { min_leaf: 7, max_leaf: 7, ..TreeParams::default() };
        let tree = generate_seeded(&params, 3).unwrap();
        assert!(tree.leaves().all(|(_, v)| v == 7));
    }

    #[test]
    fn test_seed_reproducibility() {
        let params = TreeParams::default();
        let a = generate_seeded(&params, 42).unwrap();
        let b = generate_seeded(&params, 42).unwrap();
        let c = generate_seeded(&params, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(
            a.leaves().collect::<Vec<_>>(),
            c.leaves().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_invalid_params() {
        let bad_depth = TreeParams { depth: 0, ..TreeParams::default() };
        assert!(matches!(generate_seeded(&bad_depth, 0), Err(EngineError::InvalidParameter(_))));

        let bad_bf = TreeParams { branching_factor: 0, ..TreeParams::default() };
        assert!(matches!(generate_seeded(&bad_bf, 0), Err(EngineError::InvalidParameter(_))));

        let bad_range = TreeParams { min_leaf: 5, max_leaf: -5, ..TreeParams::default() };
        assert!(matches!(generate_seeded(&bad_range, 0), Err(EngineError::InvalidParameter(_))));

        let huge = TreeParams { depth: 30, branching_factor: 8, ..TreeParams::default() };
        assert!(matches!(generate_seeded(&huge, 0), Err(EngineError::InvalidParameter(_))));

        let deep_chain = TreeParams { depth: 100_000, branching_factor: 1, ..TreeParams::default() };
        assert!(matches!(generate_seeded(&deep_chain, 1), Err(EngineError::InvalidParameter(_))));
    }
}
