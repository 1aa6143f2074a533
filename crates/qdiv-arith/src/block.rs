//! The common interface of the arithmetic building blocks.

use qdiv_ir::{Circuit, QubitId};
use rustc_hash::FxHashSet;

use crate::error::{ArithError, ArithResult};

/// A reversible gate sequence over a fixed set of qubits.
///
/// Blocks are validated when they are constructed; `apply` only appends gates
/// to the circuit it is handed and never allocates qubits.
pub trait ReversibleBlock {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Every qubit the block reads or writes.
    fn qubits(&self) -> Vec<QubitId>;

    /// Append the block's gate sequence to `circuit`.
    fn apply(&self, circuit: &mut Circuit) -> ArithResult<()>;

    /// Append the inverse gate sequence, undoing a previous [`apply`](Self::apply).
    fn unapply(&self, circuit: &mut Circuit) -> ArithResult<()> {
        let num_qubits = self.qubits().iter().map(|q| q.0 + 1).max().unwrap_or(0);
        let mut scratch = Circuit::with_size(self.name(), num_qubits, 0);
        self.apply(&mut scratch)?;
        circuit.compose(&scratch.inverse()?)?;
        Ok(())
    }
}

/// Reject a wiring in which any qubit appears more than once.
pub(crate) fn ensure_distinct(
    block: &'static str,
    qubits: impl IntoIterator<Item = QubitId>,
) -> ArithResult<()> {
    let mut seen = FxHashSet::default();
    for qubit in qubits {
        if !seen.insert(qubit) {
            return Err(ArithError::AliasedQubit { qubit, block });
        }
    }
    Ok(())
}
