//! Mutation and crossover operators for programs.

use crate::instruction::{BinaryOp, Instruction};
use crate::program::Program;
use autoart_core::{Error, MutationConfig, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub struct Mutator {
    config: MutationConfig,
    noise: Normal<f64>,
}

impl Mutator {
    pub fn new(config: MutationConfig) -> Result<Self> {
        if !config.std_dev.is_finite() || config.std_dev < 0.0 {
            return Err(Error::Validation(format!(
                "Mutation std_dev must be finite and non-negative, got {}",
                config.std_dev
            )));
        }
        let noise = Normal::new(0.0, config.std_dev).map_err(|e| {
            Error::Validation(format!("Invalid mutation std_dev {}: {}", config.std_dev, e))
        })?;
        Ok(Self { config, noise })
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Nudge constants in place, returning how many were changed.
    ///
    /// Only `Const` payloads are touched, so length, instruction kinds and
    /// stack balance are unchanged.
    pub fn mutate(&self, program: &mut Program, rng: &mut ChaCha8Rng) -> usize {
        let mut changed = 0;
        for value in program.constants_mut() {
            if rng.gen::<f64>() < self.config.rate {
                let nudged = *value + self.noise.sample(rng);
                // Constants must stay finite
                if nudged.is_finite() {
                    *value = nudged;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Perform crossover between two programs
    pub fn crossover(&self, parent1: &Program, parent2: &Program) -> Result<Program> {
        breed(parent1, parent2)
    }
}

/// Combine two programs into one computing their mean.
///
/// The child runs `a`, then `b` (leaving two values), then `+ 2 /`.
pub fn breed(a: &Program, b: &Program) -> Result<Program> {
    if a.arity() != b.arity() {
        return Err(Error::Validation(format!(
            "Cannot breed programs of arity {} and {}",
            a.arity(),
            b.arity()
        )));
    }

    let mut instructions = Vec::with_capacity(a.len() + b.len() + 3);
    instructions.extend_from_slice(a.instructions());
    instructions.extend_from_slice(b.instructions());
    instructions.extend_from_slice(&[
        Instruction::Binary(BinaryOp::Add),
        Instruction::Const(2.0),
        Instruction::Binary(BinaryOp::Div),
    ]);

    // b runs with a's result beneath it
    let max_depth = a.max_depth().max(b.max_depth() + 1);
    Ok(Program::from_balanced(a.arity(), instructions, max_depth))
}
