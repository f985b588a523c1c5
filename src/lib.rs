#![deny(missing_docs)]
//! Chainable row selection over Arrow-backed frames.
//!
//! Instead of building a boolean mask and indexing a table with it, callers go
//! through a selection façade whose comparisons and predicates return the
//! owning table already filtered:
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow::array::{ArrayRef, Int32Array, StringArray};
//! use selectable::{select, Frame, RowSelection};
//!
//! let frame = Frame::from_columns([
//!     ("A", Arc::new(Int32Array::from(vec![1, 6, 9])) as ArrayRef),
//!     ("C", Arc::new(StringArray::from(vec!["A", "B", "A"])) as ArrayRef),
//! ])?;
//! let facade = select(&frame);
//! let large = facade.get("A")?.into_column().expect("column").gt(5)?;
//! assert_eq!(large.num_rows(), 2);
//!
//! let a_rows = facade.column("C").expect("column").str()?.contains("A")?;
//! assert_eq!(a_rows.shape(), (2, 2));
//! # Ok::<(), selectable::SelectError>(())
//! ```
//!
//! Typed sub-selectors (`str`, `dt`) only expose operations that produce one
//! boolean per row; every other routine of their operation set is refused with
//! [`SelectError::UnsupportedOperation`].

mod logging;

/// Error type shared by every selection operation.
pub mod error;

/// Arrow-backed frame, series and row index host types.
pub mod frame;

/// Literal values and relational operators.
pub mod scalar;

/// Selection façade, selectors and typed sub-selectors.
pub mod select;

pub use crate::{
    error::{Result, SelectError},
    frame::{Frame, FrameAttribute, MaskFilter, RowIndex, Series},
    scalar::{ComparisonOp, ScalarValue},
    select::{
        select, ColumnSelector, FrameSelect, Inclusive, IndexSelector, PatternOptions, Resolved,
        RowSelection, SelectExt, TemporalAttr, TemporalKind, TemporalSelector, TextSelector,
        INDEX_KEYWORD,
    },
};
