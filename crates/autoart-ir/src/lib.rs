//! Stack-machine instruction set for randomly generated scalar expressions.
//!
//! A program is a postfix sequence of instructions over a value stack. The
//! representation is designed to be:
//! - Always valid: every constructed program is stack-balanced
//! - Evolvable: mutation and crossover preserve validity by construction
//! - Compact: a flat instruction vector, cheap to clone and serialize

pub mod instruction;
pub mod program;
pub mod synthesis;
pub mod mutation;
pub mod validation;

pub use instruction::{BinaryOp, Instruction, UnaryOp};
pub use program::Program;
pub use synthesis::{synthesize, Synthesizer};
pub use mutation::{breed, Mutator};
pub use validation::{validate_sequence, StackProfile};
pub use autoart_core::{MutationConfig, SynthesisConfig};
