//! Random synthesis of stack-balanced programs.

use crate::instruction::{BinaryOp, Instruction, UnaryOp};
use crate::program::Program;
use autoart_core::{Error, Result, SynthesisConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// What kind of instruction to emit next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Var,
    Const,
    Unary,
    Binary,
}

impl Category {
    /// Pick a legal category for the current simulated depth.
    fn choose(depth: usize, rng: &mut ChaCha8Rng) -> Self {
        match depth {
            // Nothing to operate on yet: only a variable may start a program
            0 => Category::Var,
            1 => [Category::Var, Category::Const, Category::Unary][rng.gen_range(0..3)],
            _ => {
                [Category::Var, Category::Const, Category::Unary, Category::Binary]
                    [rng.gen_range(0..4)]
            }
        }
    }
}

/// Builds random programs of a fixed shape
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn synthesize(&self, rng: &mut ChaCha8Rng) -> Result<Program> {
        synthesize(self.config.arity, self.config.length, rng)
    }
}

fn random_unary(rng: &mut ChaCha8Rng) -> Instruction {
    Instruction::Unary(UnaryOp::ALL[rng.gen_range(0..UnaryOp::ALL.len())])
}

fn random_binary(rng: &mut ChaCha8Rng) -> Instruction {
    Instruction::Binary(BinaryOp::ALL[rng.gen_range(0..BinaryOp::ALL.len())])
}

/// Generate a random stack-balanced program of `length` instructions.
///
/// The main loop only emits an instruction while `depth + emitted < length`,
/// which leaves room for the tail to reduce the stack to a single value: one
/// unary filler when exactly one slot remains, then binary operators until
/// the depth reaches 1.
pub fn synthesize(arity: usize, length: usize, rng: &mut ChaCha8Rng) -> Result<Program> {
    if arity == 0 {
        return Err(Error::Validation(
            "Cannot synthesize a program with zero variables".to_string(),
        ));
    }
    if length == 0 {
        return Err(Error::Validation(
            "Cannot synthesize an empty program".to_string(),
        ));
    }

    let mut instructions = Vec::with_capacity(length + 1);
    let mut depth = 0usize;
    let mut max_depth = 0usize;

    while depth + instructions.len() < length {
        let inst = match Category::choose(depth, rng) {
            Category::Var => Instruction::Var(rng.gen_range(0..arity)),
            Category::Const => Instruction::Const(rng.gen::<f64>()),
            Category::Unary => random_unary(rng),
            Category::Binary => random_binary(rng),
        };
        depth = (depth as isize + inst.stack_effect()) as usize;
        max_depth = max_depth.max(depth);
        instructions.push(inst);
    }

    if depth + instructions.len() == length {
        instructions.push(random_unary(rng));
    }

    while depth > 1 {
        instructions.push(random_binary(rng));
        depth -= 1;
    }

    trace!(
        arity,
        length = instructions.len(),
        max_depth,
        "synthesized program"
    );

    Ok(Program::from_balanced(arity, instructions, max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_sequence;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_synthesize_rejects_degenerate_shapes() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(synthesize(0, 10, &mut rng).is_err());
        assert!(synthesize(2, 0, &mut rng).is_err());
    }

    #[test]
    fn test_single_instruction_program_is_a_variable() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let program = synthesize(3, 1, &mut rng).unwrap();
            assert_eq!(program.len(), 1);
            assert!(matches!(program.instructions()[0], Instruction::Var(i) if i < 3));
        }
    }

    #[test]
    fn test_programs_start_with_variable() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let program = synthesize(2, 40, &mut rng).unwrap();
            assert!(matches!(program.instructions()[0], Instruction::Var(_)));
        }
    }

    #[test]
    fn test_constants_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let program = synthesize(2, 500, &mut rng).unwrap();
        assert!(program.num_constants() > 0);
        for inst in program.instructions() {
            if let Instruction::Const(v) = inst {
                assert!((0.0..1.0).contains(v));
            }
        }
    }

    #[test]
    fn test_same_seed_same_program() {
        let synthesizer = Synthesizer::new(SynthesisConfig::default());
        let a = synthesizer.synthesize(&mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        let b = synthesizer.synthesize(&mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.arity(), 2);
    }

    #[test]
    fn test_all_operator_kinds_appear() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let program = synthesize(2, 2000, &mut rng).unwrap();
        for op in UnaryOp::ALL {
            assert!(program.instructions().contains(&Instruction::Unary(op)));
        }
        for op in BinaryOp::ALL {
            assert!(program.instructions().contains(&Instruction::Binary(op)));
        }
    }

    proptest! {
        #[test]
        fn prop_synthesized_programs_are_stack_balanced(
            seed in any::<u64>(),
            arity in 1usize..6,
            length in 1usize..200,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let program = synthesize(arity, length, &mut rng).unwrap();

            let mut depth: isize = 0;
            for inst in program.instructions() {
                depth -= inst.num_operands() as isize;
                prop_assert!(depth >= 0);
                depth += 1;
            }
            prop_assert_eq!(depth, 1);

            let profile = validate_sequence(arity, program.instructions()).unwrap();
            prop_assert_eq!(profile.max_depth, program.max_depth());
            prop_assert_eq!(program.len(), length);
        }
    }
}
