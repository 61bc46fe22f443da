//! Stack-balance validation for instruction sequences.

use crate::instruction::Instruction;
use autoart_core::{Error, Result};

/// Facts gathered while simulating a sequence's stack depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackProfile {
    /// Deepest simulated stack
    pub max_depth: usize,
    /// Depth after the final instruction (always 1 for a valid program)
    pub final_depth: usize,
}

/// Simulate execution and check that the sequence is well-formed.
///
/// A valid sequence is non-empty, only holds finite constants, only
/// references variables below `arity`, never pops from an empty stack and leaves exactly one value behind.
pub fn validate_sequence(arity: usize, instructions: &[Instruction]) -> Result<StackProfile> {
    if instructions.is_empty() {
        return Err(Error::Validation("Program has no instructions".to_string()));
    }

    let mut depth = 0usize;
    let mut max_depth = 0usize;

    for (idx, inst) in instructions.iter().enumerate() {
        match inst {
            Instruction::Var(index) if *index >= arity => {
                return Err(Error::Validation(format!(
                    "Instruction {} references v{} but arity is {}",
                    idx, index, arity
                )));
            }
            Instruction::Const(value) if !value.is_finite() => {
                return Err(Error::Validation(format!(
                    "Instruction {} holds non-finite constant {}",
                    idx, value
                )));
            }
            _ => {}
        }

        let needed = inst.num_operands();
        if depth < needed {
            return Err(Error::Validation(format!(
                "Stack underflow at instruction {} ({}): needs {} operands, depth is {}",
                idx, inst, needed, depth
            )));
        }
        depth = depth - needed + 1;
        max_depth = max_depth.max(depth);
    }

    if depth != 1 {
        return Err(Error::Validation(format!(
            "Program leaves {} values on the stack, expected 1",
            depth
        )));
    }

    Ok(StackProfile {
        max_depth,
        final_depth: depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{BinaryOp, UnaryOp};

    #[test]
    fn test_validate_empty_sequence() {
        assert!(validate_sequence(1, &[]).is_err());
    }

    #[test]
    fn test_validate_underflow() {
        let seq = [Instruction::Var(0), Instruction::Binary(BinaryOp::Add)];
        assert!(matches!(validate_sequence(1, &seq), Err(Error::Validation(_))));

        let seq = [Instruction::Unary(UnaryOp::Sin)];
        assert!(validate_sequence(1, &seq).is_err());
    }

    #[test]
    fn test_validate_leftover_values() {
        let seq = [Instruction::Var(0), Instruction::Const(1.0)];
        assert!(validate_sequence(1, &seq).is_err());
    }

    #[test]
    fn test_validate_variable_out_of_range() {
        let seq = [Instruction::Var(2)];
        assert!(validate_sequence(2, &seq).is_err());
        assert!(validate_sequence(3, &seq).is_ok());
    }

    #[test]
    fn test_validate_non_finite_constants() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let seq = [Instruction::Const(value)];
            assert!(matches!(validate_sequence(1, &seq), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_validate_valid_sequence() {
        // (v0 + 0.5) * sin(v1)
        let seq = [
            Instruction::Var(0),
            Instruction::Const(0.5),
            Instruction::Binary(BinaryOp::Add),
            Instruction::Var(1),
            Instruction::Unary(UnaryOp::Sin),
            Instruction::Binary(BinaryOp::Mul),
        ];
        let profile = validate_sequence(2, &seq).unwrap();
        assert_eq!(profile.max_depth, 2);
        assert_eq!(profile.final_depth, 1);
    }
}
