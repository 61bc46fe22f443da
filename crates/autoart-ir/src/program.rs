//! Validated instruction sequences.

use crate::instruction::Instruction;
use crate::validation::validate_sequence;
use autoart_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stack-balanced instruction sequence over `arity` input variables.
///
/// Every `Program` value satisfies the stack-balance invariant: construction,
/// parsing and deserialization all validate, and the only in-place edits
/// allowed touch constant payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProgram", into = "RawProgram")]
pub struct Program {
    arity: usize,
    instructions: Vec<Instruction>,
    max_depth: usize,
}

/// Unvalidated wire form
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawProgram {
    arity: usize,
    instructions: Vec<Instruction>,
}

impl TryFrom<RawProgram> for Program {
    type Error = Error;

    fn try_from(raw: RawProgram) -> Result<Self> {
        Program::new(raw.arity, raw.instructions)
    }
}

impl From<Program> for RawProgram {
    fn from(program: Program) -> Self {
        Self {
            arity: program.arity,
            instructions: program.instructions,
        }
    }
}

impl Program {
    /// Validate and wrap an instruction sequence.
    pub fn new(arity: usize, instructions: Vec<Instruction>) -> Result<Self> {
        let profile = validate_sequence(arity, &instructions)?;
        Ok(Self {
            arity,
            instructions,
            max_depth: profile.max_depth,
        })
    }

    /// Wrap a sequence already known to be stack-balanced.
    pub(crate) fn from_balanced(arity: usize, instructions: Vec<Instruction>, max_depth: usize) -> Self {
        debug_assert_eq!(
            validate_sequence(arity, &instructions).ok().map(|p| p.max_depth),
            Some(max_depth)
        );
        Self {
            arity,
            instructions,
            max_depth,
        }
    }

    /// Parse space-separated reverse-Polish text such as `v0 v1 + sin`.
    pub fn parse(arity: usize, text: &str) -> Result<Self> {
        let instructions = text
            .split_whitespace()
            .map(|token| {
                Instruction::from_token(token)
                    .ok_or_else(|| Error::Parse(format!("Unknown token '{}'", token)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(arity, instructions)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Never true for a validated program.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Deepest value stack reached during evaluation
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Mutable access to every constant payload, in program order.
    ///
    /// Crate-private so outside callers cannot store a non-finite constant.
    pub(crate) fn constants_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.instructions.iter_mut().filter_map(|inst| match inst {
            Instruction::Const(value) => Some(value),
            _ => None,
        })
    }

    /// Count of constant instructions
    pub fn num_constants(&self) -> usize {
        self.instructions
            .iter()
            .filter(|inst| matches!(inst, Instruction::Const(_)))
            .count()
    }

    /// Serialize the program to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a program from bytes, re-validating it
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, inst) in self.instructions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", inst)?;
        }
        Ok(())
    }
}
