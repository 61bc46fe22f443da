//! Stack-machine evaluation of programs.

use autoart_core::{Error, Result};
use autoart_ir::{Instruction, Program};

/// Reusable evaluation state.
///
/// Holds the value stack between calls so evaluating a program at many
/// sample points does not allocate. A `Program` is never modified here, so
/// any number of evaluators may share one program across threads.
#[derive(Debug, Default)]
pub struct Evaluator {
    stack: Vec<f64>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator whose stack already fits `program`.
    pub fn for_program(program: &Program) -> Self {
        Self {
            stack: Vec::with_capacity(program.max_depth()),
        }
    }

    /// Run `program` with `vars` bound to its variables.
    ///
    /// `vars` must hold at least `program.arity()` values. A program that
    /// would underflow or leave extra values is reported as an internal
    /// consistency error instead of producing a result.
    pub fn evaluate(&mut self, program: &Program, vars: &[f64]) -> Result<f64> {
        if vars.len() < program.arity() {
            return Err(Error::Validation(format!(
                "Program has arity {} but only {} variables were bound",
                program.arity(),
                vars.len()
            )));
        }

        let stack = &mut self.stack;
        stack.clear();
        stack.reserve(program.max_depth());

        for (idx, inst) in program.instructions().iter().enumerate() {
            match *inst {
                Instruction::Const(value) => stack.push(value),
                Instruction::Var(index) => {
                    let value = vars.get(index).copied().ok_or_else(|| {
                        Error::InvalidState(format!(
                            "Instruction {} reads unbound variable v{}",
                            idx, index
                        ))
                    })?;
                    stack.push(value);
                }
                Instruction::Unary(op) => {
                    let top = stack.last_mut().ok_or_else(|| underflow(idx, inst))?;
                    *top = op.apply(*top);
                }
                Instruction::Binary(op) => {
                    let rhs = stack.pop().ok_or_else(|| underflow(idx, inst))?;
                    let lhs = stack.last_mut().ok_or_else(|| underflow(idx, inst))?;
                    *lhs = op.apply(*lhs, rhs);
                }
            }
        }

        match stack.as_slice() {
            [value] => Ok(*value),
            values => Err(Error::InvalidState(format!(
                "Evaluation finished with {} values on the stack",
                values.len()
            ))),
        }
    }
}

fn underflow(idx: usize, inst: &Instruction) -> Error {
    Error::InvalidState(format!("Stack underflow at instruction {} ({})", idx, inst))
}

/// Evaluate once with a fresh evaluator.
pub fn evaluate(program: &Program, vars: &[f64]) -> Result<f64> {
    Evaluator::for_program(program).evaluate(program, vars)
}
