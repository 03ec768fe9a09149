//! Probe error taxonomy
//!
//! A step result that merely disagrees with its predicate is not an error: the scenario runner
//! records it as a `Fail` outcome and moves on. The variants here are the conditions that stop
//! a primitive from doing its job at all.

use thiserror_no_std::Error;

/// Errors surfaced by the probe primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The execution environment could not perform the trap, or rejected the request.
    #[error("trap rejected by the execution environment (code {code})")]
    TrapFault { code: isize },

    /// The target does not implement the requested CSR address.
    #[error("unsupported CSR 0x{0:03x}")]
    UnsupportedCsr(u16),

    /// The argument count does not match the fixed arity of the syscall. Detected before any
    /// trap is issued.
    #[error("syscall {nr} expects {expected} arguments, got {got}")]
    AbiMismatch {
        nr: usize,
        expected: usize,
        got: usize,
    },

    /// The memory region is not in the mapped state, releasing it is an error, not a no-op.
    #[error("memory region at 0x{base:x} is not mapped")]
    NotMapped { base: usize },
}
