//! Batch survey over many seeded problems
//!
//! Each seed is generated, solved, compared against plain minimax, checked for
//! pruning closure, revealed and re-checked. Seeds are independent, so the
//! batch runs on Rayon's pool and results are folded afterwards.

use std::ops::Range;
use std::time::{Duration, Instant};

use abprune_engine::lifecycle::{check_answer, reveal_solution};
use abprune_engine::search::{minimax, solve};
use abprune_engine::Result;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::generator::{generate_seeded, TreeParams};

/// Findings for a single seed
#[derive(Debug, Clone, Default)]
struct SeedOutcome {
    seed: u64,
    nodes: usize,
    visited: usize,
    pruned_edges: usize,
    value_mismatch: bool,
    open_pruned_subtree: bool,
    reveal_rejected: bool,
}

fn survey_one(params: &TreeParams, seed: u64) -> Result<SeedOutcome> {
    let mut tree = generate_seeded(params, seed)?;
    let solution = solve(&tree);

    let open_pruned_subtree = solution.pruned_edges().any(|id| {
        tree.get(id)
            .map_or(false, |node| node.children().iter().any(|&c| !solution.is_pruned(c)))
    });

    let value_mismatch = solution.root_value() != minimax(&tree);
    reveal_solution(&mut tree);
    let reveal_rejected = !check_answer(&tree).is_correct();

    Ok(SeedOutcome {
        seed,
        nodes: tree.len(),
        visited: solution.visited_count(),
        pruned_edges: solution.pruned_edges().count(),
        value_mismatch,
        open_pruned_subtree,
        reveal_rejected,
    })
}

/// Aggregated survey results
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurveyReport {
    pub trees: usize,
    pub total_nodes: usize,
    pub visited_nodes: usize,
    pub pruned_edges: usize,
    /// Seeds where alpha-beta and minimax disagree on the root value
    pub value_mismatches: Vec<u64>,
    /// Seeds where a pruned edge leads to an unpruned descendant
    pub open_pruned_subtrees: Vec<u64>,
    /// Seeds where the revealed solution failed its own check
    pub reveal_rejections: Vec<u64>,
    pub elapsed: Duration,
}

impl SurveyReport {
    /// True when every seed satisfied every property
    pub fn is_clean(&self) -> bool {
        self.value_mismatches.is_empty()
            && self.open_pruned_subtrees.is_empty()
            && self.reveal_rejections.is_empty()
    }

    /// Fraction of nodes the search never had to visit
    pub fn skipped_ratio(&self) -> f64 {
        if self.total_nodes == 0 {
            return 0.0;
        }
        1.0 - self.visited_nodes as f64 / self.total_nodes as f64
    }

    pub fn trees_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.trees as f64 / secs
        } else {
            0.0
        }
    }

    fn absorb(&mut self, outcome: SeedOutcome) {
        self.trees += 1;
        self.total_nodes += outcome.nodes;
        self.visited_nodes += outcome.visited;
        self.pruned_edges += outcome.pruned_edges;
        if outcome.value_mismatch {
            self.value_mismatches.push(outcome.seed);
        }
        if outcome.open_pruned_subtree {
            self.open_pruned_subtrees.push(outcome.seed);
        }
        if outcome.reveal_rejected {
            self.reveal_rejections.push(outcome.seed);
        }
    }
}

/// Survey every seed in `seeds` with the same shape parameters.
pub fn survey(params: &TreeParams, seeds: Range<u64>) -> Result<SurveyReport> {
    params.validate()?;
    let start = Instant::now();

    let mut outcomes: Vec<SeedOutcome> = seeds
        .into_par_iter()
        .map(|seed| survey_one(params, seed))
        .collect::<Result<Vec<_>>>()?;
    outcomes.sort_by_key(|o| o.seed);

    let mut report = SurveyReport::default();
    for outcome in outcomes {
        report.absorb(outcome);
    }
    report.elapsed = start.elapsed();

    if report.is_clean() {
        info!(trees = report.trees, skipped = report.skipped_ratio(), "survey clean");
    } else {
        warn!(
            value_mismatches = report.value_mismatches.len(),
            open_pruned_subtrees = report.open_pruned_subtrees.len(),
            reveal_rejections = report.reveal_rejections.len(),
            "survey found violations"
        );
    }
    Ok(report)
}
