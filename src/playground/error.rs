//! Engine error types.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The two fatal error categories of the engine.
///
/// Neither is recoverable: after an error the playground may be mid-edit and
/// the only supported operation is dropping it. Malformed or out-of-range
/// input never reaches the engine; the surrounding reader rejects it.
#[derive(Debug, Error)]
pub enum Error {
    /// A growth point failed to allocate: a new column node, a column's piece
    /// storage, or one of the auxiliary lists — or the configured column
    /// budget ran out.
    #[error("out of memory while {context}")]
    OutOfMemory { context: &'static str },

    /// The column chain reached an internally inconsistent state. This is an
    /// implementation defect, never an input condition.
    #[error("column chain corrupted: {0}")]
    CorruptChain(&'static str),
}
