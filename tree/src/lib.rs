//! abprune Tree Builder - practice tree construction
//!
//! This crate builds game trees from problem parameters (root side, depth,
//! branching factor, leaf range) and hands them to the engine. It also runs
//! batch surveys over many seeded trees.

pub mod generator;
pub mod survey;

pub use generator::{generate, generate_seeded, TreeParams};
pub use survey::{survey, SurveyReport};
