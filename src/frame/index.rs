use std::sync::Arc;

use arrow::{
    array::{Array, ArrayRef, BooleanArray, Int64Array},
    compute::filter,
    datatypes::DataType,
};

use crate::error::{Result, SelectError};

/// Ordered row labels owned by a [`Frame`](crate::Frame) or [`Series`](crate::Series).
///
/// Labels may be of any Arrow type and need not be unique.
#[derive(Clone, Debug)]
pub struct RowIndex {
    labels: ArrayRef,
}

impl RowIndex {
    /// Wraps an existing label array.
    #[must_use]
    pub fn new(labels: ArrayRef) -> Self {
        Self { labels }
    }

    /// Default positional labels `0..len`.
    #[must_use]
    pub fn range(len: usize) -> Self {
        Self::new(Arc::new(Int64Array::from_iter_values(0..len as i64)))
    }

    /// Underlying label array.
    #[must_use]
    pub fn labels(&self) -> &ArrayRef {
        &self.labels
    }

    /// Arrow type of the labels.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        self.labels.data_type()
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true when there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Keeps the labels whose mask slot is `true`.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(SelectError::MaskLength {
                expected: self.len(),
                got: mask.len(),
            });
        }
        Ok(Self::new(filter(self.labels.as_ref(), mask)?))
    }
}

impl PartialEq for RowIndex {
    fn eq(&self, other: &Self) -> bool {
        self.labels.as_ref() == other.labels.as_ref()
    }
}
