use arrow::{datatypes::DataType, error::ArrowError};
use thiserror::Error;

use crate::scalar::ScalarValue;

/// Convenience alias used throughout the crate.
pub type Result<T, E = SelectError> = std::result::Result<T, E>;

/// Errors surfaced by the selection layer.
#[derive(Debug, Error)]
pub enum SelectError {
    /// Attribute-style lookup of a name that is neither a column, `index`,
    /// nor a table attribute.
    #[error("no attribute named '{0}'")]
    AttributeNotFound(String),
    /// Item-style lookup of a name that does not resolve.
    #[error("key not found: '{0}'")]
    KeyNotFound(String),
    /// A guarded sub-selector refused an operation that cannot yield a row selection.
    #[error("Boolean selection with `{kind}.{op}` does not make sense: {reason}")]
    UnsupportedOperation {
        /// Sub-selector kind (`str` or `dt`).
        kind: &'static str,
        /// Requested operation name.
        op: String,
        /// Why the operation is refused.
        reason: &'static str,
    },
    /// A typed sub-selector was requested on a column of the wrong type.
    #[error(
        "Can only use select.{accessor} accessor on {expected} values, column '{column}' has type {actual:?}"
    )]
    TypeMismatch {
        /// Sub-selector kind (`str` or `dt`).
        accessor: &'static str,
        /// Column the sub-selector was bound to.
        column: String,
        /// Description of the accepted value kinds.
        expected: &'static str,
        /// Actual Arrow type of the column.
        actual: DataType,
    },
    /// Wrong number of arguments passed to a named operation.
    #[error("Invalid arity for {op}: expected {expected}, got {got}")]
    InvalidArity {
        /// Operation name.
        op: String,
        /// Accepted argument count.
        expected: &'static str,
        /// Received argument count.
        got: usize,
    },
    /// A relational comparison against NULL was requested.
    #[error("Comparison with NULL is not allowed; use isna/notna")]
    NullLiteral,
    /// The literal cannot be represented in the compared column's type.
    #[error("cannot compare '{column}' of type {data_type:?} with {literal:?}")]
    IncompatibleLiteral {
        /// Column (or `index`) being compared.
        column: String,
        /// Arrow type of the compared values.
        data_type: DataType,
        /// Offending literal.
        literal: ScalarValue,
    },
    /// A boolean mask does not line up with the rows it filters.
    #[error("mask has {got} entries but the selection source has {expected} rows")]
    MaskLength {
        /// Rows of the filtered source.
        expected: usize,
        /// Entries in the mask.
        got: usize,
    },
    /// A row index does not line up with the rows of its table.
    #[error("index has {got} labels but the table has {expected} rows")]
    IndexLength {
        /// Rows of the table.
        expected: usize,
        /// Labels in the index.
        got: usize,
    },
    /// A derived per-row value is not aligned with its owner and cannot be re-selected.
    #[error("derived value '{name}' has {got} rows but its owner has {expected}")]
    Misaligned {
        /// Name of the derived value.
        name: String,
        /// Rows of the owner.
        expected: usize,
        /// Rows of the derived value.
        got: usize,
    },
    /// Error raised by an Arrow kernel, including invalid textual patterns.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

impl SelectError {
    /// Translates an attribute-style miss into its item-style counterpart.
    #[must_use]
    pub fn into_key_error(self) -> Self {
        match self {
            SelectError::AttributeNotFound(name) => SelectError::KeyNotFound(name),
            other => other,
        }
    }
}
