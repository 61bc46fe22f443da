//! Execution environment for synthesized programs.
//!
//! This crate provides:
//! - The stack-machine evaluator
//! - Grid probing of a program's output range
//! - The bounded-concurrency batch executor used for bulk generation

pub mod batch;
pub mod evaluator;
pub mod probe;

pub use batch::BatchExecutor;
pub use evaluator::{evaluate, Evaluator};
pub use probe::probe;
