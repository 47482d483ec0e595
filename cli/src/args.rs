//! CLI argument definitions using clap

use std::path::PathBuf;

use abprune_engine::node::Side;
use abprune_tree::TreeParams;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Practice alpha-beta pruning on generated game trees
#[derive(Parser, Debug)]
#[command(name = "abprune")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file (default: ./abprune.toml)
    #[arg(long, global = true, env = "ABPRUNE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a blank problem and print it as a JSON snapshot
    New {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Write the snapshot to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Generate a problem and show its solution
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Print the solved snapshot as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Check an annotated snapshot
    Check {
        /// Snapshot produced by `new` and filled in by hand
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Append the result to the score book
        #[arg(long)]
        record: bool,
    },

    /// List recorded attempts, newest first
    History {
        /// Maximum number of attempts to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Show one recorded attempt with the tree as it was submitted
    Show {
        /// Attempt id as listed by `history`
        id: u64,
    },

    /// Show aggregate statistics over recorded attempts
    Stats,

    /// Solve and self-check many seeded problems in parallel
    Survey {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Number of seeds to survey, starting at --seed (default 0)
        #[arg(long, default_value_t = 1000)]
        trees: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootArg {
    Max,
    Min,
}

impl From<RootArg> for Side {
    fn from(root: RootArg) -> Self {
        match root {
            RootArg::Max => Side::Max,
            RootArg::Min => Side::Min,
        }
    }
}

/// Problem shape overrides; unset flags fall back to settings
#[derive(Args, Debug, Clone, Default)]
pub struct ProblemArgs {
    /// Side to move at the root
    #[arg(long, value_enum)]
    pub root: Option<RootArg>,

    /// Tree depth including the leaf row
    #[arg(long)]
    pub depth: Option<u32>,

    /// Children per internal node
    #[arg(long)]
    pub branching: Option<u32>,

    /// Smallest leaf value
    #[arg(long, allow_hyphen_values = true)]
    pub min_leaf: Option<i32>,

    /// Largest leaf value
    #[arg(long, allow_hyphen_values = true)]
    pub max_leaf: Option<i32>,

    /// Seed for reproducible leaves (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ProblemArgs {
    /// Layer the flags that were given over `base`.
    pub fn apply(&self, base: TreeParams) -> TreeParams {
        TreeParams {
            root_kind: self.root.map(Side::from).unwrap_or(base.root_kind),
            depth: self.depth.unwrap_or(base.depth),
            branching_factor: self.branching.unwrap_or(base.branching_factor),
            min_leaf: self.min_leaf.unwrap_or(base.min_leaf),
            max_leaf: self.max_leaf.unwrap_or(base.max_leaf),
        }
    }
}
