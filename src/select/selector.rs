use std::ops::Deref;

use arrow::array::ArrayRef;

use crate::{
    error::{Result, SelectError},
    frame::{MaskFilter, RowIndex, Series},
    logging::select_log,
    scalar::{ComparisonOp, ScalarValue},
    select::{
        mask::{self, Inclusive},
        temporal::TemporalSelector,
        text::TextSelector,
    },
};

/// Relational, null and membership tests that filter an owner instead of
/// returning a raw mask.
///
/// Implemented by [`ColumnSelector`] and [`IndexSelector`]. The method names
/// mirror the operators they stand in for; selectors deliberately do not
/// implement `PartialEq`/`PartialOrd`.
pub trait RowSelection {
    /// Value the masks are applied to.
    type Owner: MaskFilter;

    /// The owner every result is expressed in.
    fn owner(&self) -> &Self::Owner;

    /// Name used in errors and logs.
    fn label(&self) -> &str;

    /// Values the masks are computed from.
    fn values(&self) -> &ArrayRef;

    /// Rows where `values <op> value`.
    fn compare<V: Into<ScalarValue>>(&self, op: ComparisonOp, value: V) -> Result<Self::Owner> {
        let mask = mask::compare(self.label(), self.values(), op, &value.into())?;
        mask::apply(self.owner(), op.as_str(), &mask)
    }

    /// Rows where `values < value`.
    fn lt<V: Into<ScalarValue>>(&self, value: V) -> Result<Self::Owner> {
        self.compare(ComparisonOp::LessThan, value)
    }

    /// Rows where `values <= value`.
    fn le<V: Into<ScalarValue>>(&self, value: V) -> Result<Self::Owner> {
        self.compare(ComparisonOp::LessThanOrEqual, value)
    }

    /// Rows where `values == value`.
    fn eq<V: Into<ScalarValue>>(&self, value: V) -> Result<Self::Owner> {
        self.compare(ComparisonOp::Equal, value)
    }

    /// Rows where `values != value`.
    fn ne<V: Into<ScalarValue>>(&self, value: V) -> Result<Self::Owner> {
        self.compare(ComparisonOp::NotEqual, value)
    }

    /// Rows where `values > value`.
    fn gt<V: Into<ScalarValue>>(&self, value: V) -> Result<Self::Owner> {
        self.compare(ComparisonOp::GreaterThan, value)
    }

    /// Rows where `values >= value`.
    fn ge<V: Into<ScalarValue>>(&self, value: V) -> Result<Self::Owner> {
        self.compare(ComparisonOp::GreaterThanOrEqual, value)
    }

    /// Rows whose value is missing (NULL or NaN).
    fn isna(&self) -> Result<Self::Owner> {
        let mask = mask::missing(self.values())?;
        mask::apply(self.owner(), "isna", &mask)
    }

    /// Alias of [`RowSelection::isna`].
    fn isnull(&self) -> Result<Self::Owner> {
        self.isna()
    }

    /// Rows whose value is present.
    fn notna(&self) -> Result<Self::Owner> {
        let mask = mask::present(self.values())?;
        mask::apply(self.owner(), "notna", &mask)
    }

    /// Alias of [`RowSelection::notna`].
    fn notnull(&self) -> Result<Self::Owner> {
        self.notna()
    }

    /// Rows whose value equals one of `candidates`.
    fn isin<I, V>(&self, candidates: I) -> Result<Self::Owner>
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        let candidates: Vec<ScalarValue> = candidates.into_iter().map(Into::into).collect();
        let mask = mask::membership(self.label(), self.values(), &candidates)?;
        mask::apply(self.owner(), "isin", &mask)
    }
}

/// One column bound to the owner its masks filter.
///
/// From a frame façade the owner is the frame; from a bare [`Series`] it is the
/// series itself. Anything outside the selection contract is reachable through
/// `Deref` to the bound series.
#[derive(Debug)]
pub struct ColumnSelector<'a, O> {
    owner: &'a O,
    series: Series,
}

impl<'a, O: MaskFilter> ColumnSelector<'a, O> {
    pub(crate) fn new(owner: &'a O, series: Series) -> Result<Self> {
        if series.len() != owner.num_rows() {
            return Err(SelectError::Misaligned {
                name: series.name().to_owned(),
                expected: owner.num_rows(),
                got: series.len(),
            });
        }
        Ok(Self::aligned(owner, series))
    }

    // `series` was read out of `owner`, so their rows already agree.
    pub(crate) fn aligned(owner: &'a O, series: Series) -> Self {
        debug_assert_eq!(series.len(), owner.num_rows());
        Self { owner, series }
    }

    /// The owner results are expressed in.
    #[must_use]
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// The bound column.
    #[must_use]
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Releases the bound column.
    #[must_use]
    pub fn into_series(self) -> Series {
        self.series
    }

    /// Rows where `low <= values <= high`.
    pub fn between<L, H>(&self, low: L, high: H) -> Result<O>
    where
        L: Into<ScalarValue>,
        H: Into<ScalarValue>,
    {
        self.between_with(low, high, Inclusive::Both)
    }

    /// Rows inside `low..high`, with the ends governed by `inclusive`.
    pub fn between_with<L, H>(&self, low: L, high: H, inclusive: Inclusive) -> Result<O>
    where
        L: Into<ScalarValue>,
        H: Into<ScalarValue>,
    {
        let mask = mask::between(
            self.series.name(),
            self.series.values(),
            &low.into(),
            &high.into(),
            inclusive,
        )?;
        mask::apply(self.owner, "between", &mask)
    }

    /// Textual sub-selector; fails unless the column holds strings.
    pub fn str(&self) -> Result<TextSelector<'a, O>> {
        TextSelector::new(self.owner, &self.series)
    }

    /// Temporal sub-selector; fails unless the column is date/time- or period-like.
    pub fn dt(&self) -> Result<TemporalSelector<'a, O>> {
        TemporalSelector::new(self.owner, &self.series)
    }

    /// Index selector over the same owner.
    #[must_use]
    pub fn index(&self) -> IndexSelector<'a, O> {
        IndexSelector::new(self.owner)
    }
}

impl<'a> ColumnSelector<'a, Series> {
    /// Selector over a bare series: the series is both the values and the owner.
    #[must_use]
    pub fn bare(series: &'a Series) -> Self {
        Self {
            owner: series,
            series: series.clone(),
        }
    }
}

impl<O: MaskFilter> RowSelection for ColumnSelector<'_, O> {
    type Owner = O;

    fn owner(&self) -> &O {
        self.owner
    }

    fn label(&self) -> &str {
        self.series.name()
    }

    fn values(&self) -> &ArrayRef {
        self.series.values()
    }
}

impl<O> Deref for ColumnSelector<'_, O> {
    type Target = Series;

    fn deref(&self) -> &Series {
        &self.series
    }
}

/// Binds a per-row derived value back into a selector over the same owner.
///
/// Every derived projection that is neither a mask nor a scalar goes through here,
/// so chained comparisons on it keep filtering the original owner. The derived
/// column is named after the projection (`year`, `day_of_week`, ...).
pub(crate) fn rewrap<'a, O: MaskFilter>(
    owner: &'a O,
    source: &Series,
    derivation: &str,
    values: ArrayRef,
) -> Result<ColumnSelector<'a, O>> {
    let series = source.derive(derivation, values)?;
    select_log!(
        log::Level::Trace,
        "derived_rewrapped",
        "column={} derivation={} rows={}",
        source.name(),
        derivation,
        series.len(),
    );
    ColumnSelector::new(owner, series)
}

/// The owner's row index bound to the owner.
#[derive(Debug)]
pub struct IndexSelector<'a, O> {
    owner: &'a O,
}

impl<'a, O: MaskFilter> IndexSelector<'a, O> {
    pub(crate) fn new(owner: &'a O) -> Self {
        Self { owner }
    }

    /// The owner results are expressed in.
    #[must_use]
    pub fn owner(&self) -> &'a O {
        self.owner
    }
}

impl<O: MaskFilter> RowSelection for IndexSelector<'_, O> {
    type Owner = O;

    fn owner(&self) -> &O {
        self.owner
    }

    fn label(&self) -> &str {
        crate::select::INDEX_KEYWORD
    }

    fn values(&self) -> &ArrayRef {
        self.owner.index().labels()
    }
}

impl<O: MaskFilter> Deref for IndexSelector<'_, O> {
    type Target = RowIndex;

    fn deref(&self) -> &RowIndex {
        self.owner.index()
    }
}
