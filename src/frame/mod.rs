//! Arrow-backed tabular host types and the boolean-mask filter primitive.
//!
//! A [`Frame`] is a `RecordBatch` paired with a [`RowIndex`]; a [`Series`] is one
//! of its columns carrying the same labels. The selection layer never mutates
//! either: every filter produces a new value.

mod index;
mod series;

use std::{fmt, sync::Arc};

use arrow::{
    array::{ArrayRef, BooleanArray},
    compute::filter_record_batch,
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};
pub use index::RowIndex;
pub use series::Series;

use crate::error::{Result, SelectError};

/// Anything a boolean mask can be applied to.
///
/// This is the single primitive the selection layer relies on: a mask aligned
/// with `num_rows()` yields the sub-value of rows whose slot is `true`. NULL
/// slots are treated as `false`.
pub trait MaskFilter: Sized {
    /// Number of rows the mask must line up with.
    fn num_rows(&self) -> usize;

    /// Row labels.
    fn index(&self) -> &RowIndex;

    /// Returns the rows selected by `mask`.
    fn filter(&self, mask: &BooleanArray) -> Result<Self>;
}

/// Rows of named, uniformly typed columns plus an ordered row index.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    batch: RecordBatch,
    index: RowIndex,
}

impl Frame {
    /// Wraps a batch with positional row labels.
    #[must_use]
    pub fn new(batch: RecordBatch) -> Self {
        let index = RowIndex::range(batch.num_rows());
        Self { batch, index }
    }

    /// Wraps a batch with explicit row labels.
    pub fn with_index(batch: RecordBatch, index: RowIndex) -> Result<Self> {
        if index.len() != batch.num_rows() {
            return Err(SelectError::IndexLength {
                expected: batch.num_rows(),
                got: index.len(),
            });
        }
        Ok(Self { batch, index })
    }

    /// Builds a frame from `(name, values)` pairs in column order.
    pub fn from_columns<I, N>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, ArrayRef)>,
        N: AsRef<str>,
    {
        Ok(Self::new(RecordBatch::try_from_iter(columns)?))
    }

    /// One-column frame holding `series`, keeping its field and labels.
    pub fn from_series(series: &Series) -> Result<Self> {
        let schema = Schema::new(vec![Arc::clone(series.field())]);
        let batch = RecordBatch::try_new(Arc::new(schema), vec![Arc::clone(series.values())])?;
        Self::with_index(batch, series.index().clone())
    }

    /// Underlying record batch.
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Arrow schema of the columns.
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    /// Column names in schema order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// The column at `position`, sharing this frame's labels.
    #[must_use]
    pub fn column_at(&self, position: usize) -> Option<Series> {
        if position >= self.num_columns() {
            return None;
        }
        let field = Arc::clone(&self.batch.schema().fields()[position]);
        let values = Arc::clone(self.batch.column(position));
        Some(Series::from_parts(field, values, self.index.clone()))
    }

    /// The first column called `name`, sharing this frame's labels.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Series> {
        let position = self.batch.schema().index_of(name).ok()?;
        self.column_at(position)
    }

    /// Resolves a non-column table attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<FrameAttribute> {
        let attribute = match name {
            "shape" => FrameAttribute::Shape(self.shape()),
            "columns" => FrameAttribute::Columns(self.column_names()),
            "dtypes" => FrameAttribute::Dtypes(
                self.batch
                    .schema()
                    .fields()
                    .iter()
                    .map(|field| (field.name().clone(), field.data_type().clone()))
                    .collect(),
            ),
            "size" => FrameAttribute::Size(self.num_rows() * self.num_columns()),
            "ndim" => FrameAttribute::Ndim(2),
            _ => return None,
        };
        Some(attribute)
    }
}

impl MaskFilter for Frame {
    fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    fn index(&self) -> &RowIndex {
        &self.index
    }

    fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        let index = self.index.filter(mask)?;
        let batch = filter_record_batch(&self.batch, mask)?;
        Ok(Self { batch, index })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The index is rendered as a leading, unnamed column.
        let index_field = Arc::new(Field::new("", self.index.data_type().clone(), true));
        let fields: Vec<_> = std::iter::once(index_field)
            .chain(self.batch.schema().fields().iter().cloned())
            .collect();
        let columns: Vec<ArrayRef> = std::iter::once(Arc::clone(self.index.labels()))
            .chain(self.batch.columns().iter().cloned())
            .collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .map_err(|_| fmt::Error)?;
        let table = pretty_format_batches(&[batch]).map_err(|_| fmt::Error)?;
        write!(f, "{table}")
    }
}

/// Table attributes reachable through the selection façade by name.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameAttribute {
    /// `(rows, columns)`.
    Shape((usize, usize)),
    /// Column names in order.
    Columns(Vec<String>),
    /// Column names with their Arrow types.
    Dtypes(Vec<(String, DataType)>),
    /// Total number of cells.
    Size(usize),
    /// Number of dimensions.
    Ndim(usize),
}

#[cfg(test)]
mod tests {
    use arrow::{
        array::{AsArray, Int32Array, StringArray},
        datatypes::Int64Type,
    };

    use super::*;

    fn frame() -> Frame {
        Frame::from_columns([
            (
                "a",
                Arc::new(Int32Array::from(vec![1, 2, 3, 4])) as ArrayRef,
            ),
            (
                "b",
                Arc::new(StringArray::from(vec!["w", "x", "y", "z"])) as ArrayRef,
            ),
        ])
        .expect("frame")
    }

    #[test]
    fn filter_applies_mask_to_rows_and_index() {
        let frame = frame();
        let mask = BooleanArray::from(vec![Some(true), None, Some(false), Some(true)]);
        let kept = frame.filter(&mask).expect("filter");
        assert_eq!(kept.shape(), (2, 2));
        assert_eq!(
            kept.index()
                .labels()
                .as_primitive::<Int64Type>()
                .values()
                .to_vec(),
            vec![0, 3]
        );
    }

    #[test]
    fn filter_with_all_true_mask_is_identity() {
        let frame = frame();
        let kept = frame
            .filter(&BooleanArray::from(vec![true; 4]))
            .expect("filter");
        assert_eq!(kept, frame);
    }

    #[test]
    fn filter_rejects_misaligned_mask() {
        let err = frame()
            .filter(&BooleanArray::from(vec![true, false]))
            .expect_err("short mask");
        assert!(matches!(err, SelectError::MaskLength { .. }));
    }

    #[test]
    fn column_shares_frame_index() {
        let frame = frame();
        let series = frame.column("b").expect("column b");
        assert_eq!(series.name(), "b");
        assert_eq!(series.index(), frame.index());
        assert!(frame.column("missing").is_none());
        assert!(frame.column_at(2).is_none());
    }

    #[test]
    fn column_keeps_explicit_labels_after_filtering() {
        let labelled = Frame::with_index(
            frame().batch().clone(),
            RowIndex::new(Arc::new(StringArray::from(vec!["w", "x", "y", "z"]))),
        )
        .expect("labelled");
        let kept = labelled
            .filter(&BooleanArray::from(vec![false, true, false, true]))
            .expect("filter");
        let series = kept.column_at(1).expect("column 1");
        assert_eq!(series.len(), 2);
        assert_eq!(series.index(), kept.index());
        assert_eq!(
            series.index().labels().as_string::<i32>().iter().collect::<Vec<_>>(),
            vec![Some("x"), Some("z")]
        );
    }

    #[test]
    fn attributes_resolve_by_name() {
        let frame = frame();
        assert_eq!(frame.attribute("shape"), Some(FrameAttribute::Shape((4, 2))));
        assert_eq!(
            frame.attribute("columns"),
            Some(FrameAttribute::Columns(vec!["a".into(), "b".into()]))
        );
        assert_eq!(frame.attribute("size"), Some(FrameAttribute::Size(8)));
        assert_eq!(frame.attribute("nope"), None);
    }

    #[test]
    fn with_index_checks_length() {
        let batch = frame().batch().clone();
        let err = Frame::with_index(batch, RowIndex::range(1)).expect_err("short index");
        assert!(matches!(err, SelectError::IndexLength { expected: 4, got: 1 }));
    }

    #[test]
    fn display_renders_index_column() {
        let rendered = frame().to_string();
        assert!(rendered.contains("| a"));
        assert!(rendered.contains("| z"));
    }
}
