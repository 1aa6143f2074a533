//! Error types for circuit arithmetic.

use qdiv_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors raised while wiring or composing arithmetic blocks.
///
/// All of these are detected at construction time; a circuit that builds
/// successfully has no runtime failure modes of its own.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArithError {
    /// Two registers that must have equal width do not.
    #[error("Width mismatch for {role}: expected {expected}, got {got}")]
    WidthMismatch {
        role: &'static str,
        expected: usize,
        got: usize,
    },

    /// Operand width outside the supported range.
    #[error("Invalid width: {0} (supported: 1..={max})", max = crate::MAX_WIDTH)]
    InvalidWidth(usize),

    /// The same qubit was wired into two roles of one block.
    #[error("Qubit {qubit} is used twice in {block}")]
    AliasedQubit { qubit: QubitId, block: &'static str },

    /// The divisor is zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// An operand does not fit in the operand width.
    #[error("Operand {value} does not fit in {width} bits")]
    OperandOutOfRange { value: u64, width: usize },

    /// Register index out of bounds.
    #[error("Index {index} out of bounds for register of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A sampled bit string cannot be decoded.
    #[error("Malformed sample '{sample}': expected {expected} binary digits")]
    MalformedSample { sample: String, expected: usize },

    /// Circuit construction failed.
    #[error(transparent)]
    Circuit(#[from] IrError),
}

/// Result type for arithmetic operations.
pub type ArithResult<T> = Result<T, ArithError>;
