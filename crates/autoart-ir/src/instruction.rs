//! Instruction set for the expression stack machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisor substituted when a program divides by exactly zero
pub const ZERO_DIVISOR_SUBSTITUTE: f64 = 0.01;

/// Replace non-finite results so a value never leaves the finite range.
#[inline]
pub fn saturate(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else if x == f64::INFINITY {
        f64::MAX
    } else if x == f64::NEG_INFINITY {
        f64::MIN
    } else {
        x
    }
}

/// Two-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 6] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Min,
        BinaryOp::Max,
    ];

    /// Apply to `lhs` (pushed first) and `rhs` (top of stack).
    #[inline]
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        let value = match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => {
                let divisor = if rhs == 0.0 { ZERO_DIVISOR_SUBSTITUTE } else { rhs };
                lhs / divisor
            }
            BinaryOp::Min => lhs.min(rhs),
            BinaryOp::Max => lhs.max(rhs),
        };
        saturate(value)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }
}

/// One-operand operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log,
    Exp,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 6] = [
        UnaryOp::Sqrt,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Log,
        UnaryOp::Exp,
    ];

    /// Sqrt and Log act on the magnitude of their operand.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        let value = match self {
            UnaryOp::Sqrt => x.abs().sqrt(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Log => x.abs().ln(),
            UnaryOp::Exp => x.exp(),
        };
        saturate(value)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Log => "log",
            UnaryOp::Exp => "exp",
        }
    }
}

/// A single stack-machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Push a constant
    Const(f64),
    /// Pop two values, push one
    Binary(BinaryOp),
    /// Pop one value, push one
    Unary(UnaryOp),
    /// Push the bound value of variable `index`
    Var(usize),
}

impl Instruction {
    /// Net change in stack depth when this instruction executes
    pub fn stack_effect(&self) -> isize {
        match self {
            Instruction::Const(_) | Instruction::Var(_) => 1,
            Instruction::Unary(_) => 0,
            Instruction::Binary(_) => -1,
        }
    }

    /// Number of values popped before pushing the result
    pub fn num_operands(&self) -> usize {
        match self {
            Instruction::Const(_) | Instruction::Var(_) => 0,
            Instruction::Unary(_) => 1,
            Instruction::Binary(_) => 2,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.num_operands() == 0
    }

    /// Same variant, ignoring payloads
    pub fn same_kind(&self, other: &Instruction) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Parse a single RPN token.
    pub fn from_token(token: &str) -> Option<Instruction> {
        if let Some(op) = BinaryOp::ALL.iter().find(|op| op.symbol() == token) {
            return Some(Instruction::Binary(*op));
        }
        if let Some(op) = UnaryOp::ALL.iter().find(|op| op.symbol() == token) {
            return Some(Instruction::Unary(*op));
        }
        if let Some(index) = token.strip_prefix('v') {
            return index.parse().ok().map(Instruction::Var);
        }
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Instruction::Const)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Const(value) => write!(f, "{:?}", value),
            Instruction::Binary(op) => f.write_str(op.symbol()),
            Instruction::Unary(op) => f.write_str(op.symbol()),
            Instruction::Var(index) => write!(f, "v{}", index),
        }
    }
}
