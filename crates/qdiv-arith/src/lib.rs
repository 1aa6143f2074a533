//! qdiv Reversible Arithmetic
//!
//! Reversible building blocks over [`qdiv_ir::Circuit`] and the non-restoring
//! divider composed from them.
//!
//! # Building Blocks
//!
//! | Block | Effect | Control |
//! |-------|--------|---------|
//! | [`Adder`] | `target ← target + addend + c` | none |
//! | [`Subtractor`] | `target ← target − addend − c` | none |
//! | [`ControlledAddSub`] | add if control is 0, subtract if 1 | read-only qubit |
//! | [`ConditionalAdd`] | `target ← target + addend` if control is 1 | read-only qubit |
//!
//! All arithmetic is modulo `2^w` for `w`-bit registers. Every block
//! implements [`ReversibleBlock`], so it can also be undone with
//! [`ReversibleBlock::unapply`].
//!
//! # Division
//!
//! [`Divider`] generates the register layout from the operand width and
//! emits `n` subtract / add-or-subtract iterations followed by one restore.
//!
//! ```rust
//! use qdiv_arith::Divider;
//!
//! let built = Divider::new(3).unwrap().build(5, 2).unwrap();
//! assert_eq!(built.circuit().num_qubits(), 20);
//! assert_eq!(built.expected().to_string(), "Q 010 R 0001");
//! ```

pub mod adder;
pub mod addsub;
pub mod block;
pub mod cond_add;
pub mod divider;
pub mod error;
pub mod layout;
pub mod outcome;
pub mod register;
pub mod subtractor;

pub use adder::{Adder, AdderWiring, CarryOut};
pub use addsub::ControlledAddSub;
pub use block::ReversibleBlock;
pub use cond_add::ConditionalAdd;
pub use divider::{DivisionCircuit, Divider};
pub use error::{ArithError, ArithResult};
pub use layout::DividerLayout;
pub use outcome::{DivisionOutcome, expected_division};
pub use register::QubitRegister;
pub use subtractor::Subtractor;

/// Operand width used when none is given.
pub const DEFAULT_WIDTH: usize = 3;

/// Widest supported operands. The layout needs `6n + 2` qubits, which must
/// fit the 64-bit basis-state simulator.
pub const MAX_WIDTH: usize = 10;
