//! abprune Engine - alpha-beta practice core
//!
//! This crate holds the tree model, the canonical alpha-beta search, the
//! answer verifier, the reset/reveal/check lifecycle and tree snapshots.
//!
//! The engine is synchronous, performs no I/O and has zero UI dependencies.

pub mod error;
pub mod lifecycle;
pub mod node;
pub mod score;
pub mod search;
pub mod snapshot;
pub mod test_tree;
pub mod verify;

pub use error::{EngineError, Result};
pub use lifecycle::{check_answer, reset, reveal_solution, Session};
pub use node::{Bound, Edge, GameTree, Node, NodeId, NodeKind, Side};
pub use search::{solve, Solution};
pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use verify::{verify, Mismatch, Verdict};
