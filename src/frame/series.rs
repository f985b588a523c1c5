use std::{fmt, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, BooleanArray},
    compute::filter,
    datatypes::{DataType, Field, FieldRef},
};

use crate::{
    error::{Result, SelectError},
    frame::{MaskFilter, RowIndex},
    select::PeriodFreq,
};

/// A single named column together with the row labels it is aligned to.
#[derive(Clone, Debug)]
pub struct Series {
    field: FieldRef,
    values: ArrayRef,
    index: RowIndex,
}

impl Series {
    /// Builds a series with positional row labels.
    #[must_use]
    pub fn new(name: impl Into<String>, values: ArrayRef) -> Self {
        let index = RowIndex::range(values.len());
        let field = Field::new(name, values.data_type().clone(), true);
        Self {
            field: Arc::new(field),
            values,
            index,
        }
    }

    /// Builds a series that shares an existing row index.
    pub fn with_index(field: FieldRef, values: ArrayRef, index: RowIndex) -> Result<Self> {
        if index.len() != values.len() {
            return Err(SelectError::IndexLength {
                expected: values.len(),
                got: index.len(),
            });
        }
        Ok(Self {
            field,
            values,
            index,
        })
    }

    // Callers pass an index taken from the same row set as `values`.
    pub(crate) fn from_parts(field: FieldRef, values: ArrayRef, index: RowIndex) -> Self {
        debug_assert_eq!(index.len(), values.len());
        Self {
            field,
            values,
            index,
        }
    }

    /// Builds a period-valued series: `starts` holds the first instant of each
    /// period and the field is tagged with `freq`.
    #[must_use]
    pub fn period(name: impl Into<String>, starts: ArrayRef, freq: PeriodFreq) -> Self {
        let index = RowIndex::range(starts.len());
        let field = freq.field(name, starts.data_type().clone());
        Self {
            field: Arc::new(field),
            values: starts,
            index,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// Arrow field describing the column, including metadata.
    #[must_use]
    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    /// Arrow type of the values.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        self.values.data_type()
    }

    /// Raw values.
    #[must_use]
    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the series holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same labels and name, new values; used for per-row derived projections.
    pub(crate) fn derive(&self, name: impl Into<String>, values: ArrayRef) -> Result<Self> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(SelectError::Misaligned {
                name,
                expected: self.len(),
                got: values.len(),
            });
        }
        let field = Field::new(name, values.data_type().clone(), true);
        Self::with_index(Arc::new(field), values, self.index.clone())
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.values.as_ref() == other.values.as_ref()
            && self.index == other.index
    }
}

impl MaskFilter for Series {
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn index(&self) -> &RowIndex {
        &self.index
    }

    fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        let index = self.index.filter(mask)?;
        let values = filter(self.values.as_ref(), mask)?;
        Ok(Self {
            field: Arc::clone(&self.field),
            values,
            index,
        })
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = crate::Frame::from_series(self).map_err(|_| fmt::Error)?;
        write!(f, "{frame}")
    }
}

#[cfg(test)]
mod tests {
    use arrow::{
        array::{AsArray, Int32Array},
        datatypes::{Int32Type, Int64Type},
    };

    use super::*;

    fn sample() -> Series {
        Series::new("a", Arc::new(Int32Array::from(vec![10, 20, 30])))
    }

    #[test]
    fn filter_keeps_labels_in_step() {
        let series = sample();
        let kept = series
            .filter(&BooleanArray::from(vec![false, true, true]))
            .expect("filter");
        assert_eq!(kept.name(), "a");
        assert_eq!(
            kept.values().as_primitive::<Int32Type>().values().to_vec(),
            vec![20, 30]
        );
        assert_eq!(
            kept.index()
                .labels()
                .as_primitive::<Int64Type>()
                .values()
                .to_vec(),
            vec![1, 2]
        );
    }

    #[test]
    fn derive_rejects_misaligned_values() {
        let series = sample();
        let err = series
            .derive("b", Arc::new(Int32Array::from(vec![1])))
            .expect_err("misaligned");
        assert!(matches!(err, SelectError::Misaligned { expected: 3, got: 1, .. }));
    }

    #[test]
    fn with_index_checks_length() {
        let series = sample();
        let err = Series::with_index(
            Arc::clone(series.field()),
            Arc::clone(series.values()),
            RowIndex::range(2),
        )
        .expect_err("short index");
        assert!(matches!(err, SelectError::IndexLength { .. }));
    }

    #[test]
    fn equality_covers_field_values_and_index() {
        let series = sample();
        assert_eq!(series, sample());
        let renamed = Series::new("b", Arc::clone(series.values()));
        assert_ne!(series, renamed);
        let relabelled = Series::with_index(
            Arc::clone(series.field()),
            Arc::clone(series.values()),
            RowIndex::new(Arc::new(Int32Array::from(vec![7, 8, 9]))),
        )
        .expect("relabelled");
        assert_ne!(series, relabelled);
        let period = Series::period("a", Arc::clone(series.values()), PeriodFreq::Year);
        assert_ne!(series, period);
    }
}
