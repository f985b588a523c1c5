//! Boolean-mask kernels shared by every selector.
//!
//! Each function produces a mask aligned with the bound values; [`apply`] is the
//! only place a mask meets its owner.

use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray},
    buffer::BooleanBuffer,
    compute::{
        cast,
        kernels::{
            boolean::{and_kleene, is_null, not, or, or_kleene},
            cmp,
        },
    },
    datatypes::{DataType, Float64Type},
};

use crate::{
    error::{Result, SelectError},
    frame::MaskFilter,
    logging::select_log,
    scalar::{coerce, ComparisonOp, ScalarValue},
};

/// Which ends of a `between` range are included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Inclusive {
    /// `low <= v <= high`.
    #[default]
    Both,
    /// `low < v < high`.
    Neither,
    /// `low <= v < high`.
    Left,
    /// `low < v <= high`.
    Right,
}

impl Inclusive {
    fn ops(self) -> (ComparisonOp, ComparisonOp) {
        match self {
            Inclusive::Both => (
                ComparisonOp::GreaterThanOrEqual,
                ComparisonOp::LessThanOrEqual,
            ),
            Inclusive::Neither => (ComparisonOp::GreaterThan, ComparisonOp::LessThan),
            Inclusive::Left => (ComparisonOp::GreaterThanOrEqual, ComparisonOp::LessThan),
            Inclusive::Right => (ComparisonOp::GreaterThan, ComparisonOp::LessThanOrEqual),
        }
    }
}

/// `values <op> literal`, after coercing both sides to a common type.
///
/// NaN is unordered: it only ever satisfies `!=`, on either side.
pub(crate) fn compare(
    label: &str,
    values: &ArrayRef,
    op: ComparisonOp,
    literal: &ScalarValue,
) -> Result<BooleanArray> {
    let (lhs, rhs) = coerce(label, values, literal)?;
    if literal.is_nan() {
        let hits = if op == ComparisonOp::NotEqual {
            BooleanBuffer::new_set(lhs.len())
        } else {
            BooleanBuffer::new_unset(lhs.len())
        };
        return Ok(BooleanArray::new(hits, lhs.logical_nulls()));
    }
    let mask = match op {
        ComparisonOp::Equal => cmp::eq(&lhs, &rhs)?,
        ComparisonOp::NotEqual => cmp::neq(&lhs, &rhs)?,
        ComparisonOp::LessThan => cmp::lt(&lhs, &rhs)?,
        ComparisonOp::LessThanOrEqual => cmp::lt_eq(&lhs, &rhs)?,
        ComparisonOp::GreaterThan => cmp::gt(&lhs, &rhs)?,
        ComparisonOp::GreaterThanOrEqual => cmp::gt_eq(&lhs, &rhs)?,
    };
    // The kernels order NaN above every number and equal to itself.
    match (op, nan_slots(values)?) {
        (ComparisonOp::NotEqual, _) | (_, None) => Ok(mask),
        (_, Some(nan)) => Ok(and_kleene(&mask, &not(&nan)?)?),
    }
}

/// Missing slots: NULLs, plus NaN for floating-point values.
pub(crate) fn missing(values: &ArrayRef) -> Result<BooleanArray> {
    let nulls = is_null(values.as_ref())?;
    match nan_slots(values)? {
        Some(nan) => Ok(or(&nulls, &nan)?),
        None => Ok(nulls),
    }
}

// `None` unless the values (or dictionary values) are floating point.
fn nan_slots(values: &ArrayRef) -> Result<Option<BooleanArray>> {
    let floating = match values.data_type() {
        DataType::Dictionary(_, value) => value.is_floating(),
        other => other.is_floating(),
    };
    if !floating {
        return Ok(None);
    }
    let floats = cast(values.as_ref(), &DataType::Float64)?;
    let nan = floats
        .as_primitive::<Float64Type>()
        .iter()
        .map(|value| Some(value.is_some_and(f64::is_nan)))
        .collect();
    Ok(Some(nan))
}

pub(crate) fn present(values: &ArrayRef) -> Result<BooleanArray> {
    Ok(not(&missing(values)?)?)
}

/// Elementwise membership of `values` in `candidates`.
///
/// A NULL or NaN candidate matches missing slots. Candidates that cannot be represented
/// in the values' type never match.
pub(crate) fn membership(
    label: &str,
    values: &ArrayRef,
    candidates: &[ScalarValue],
) -> Result<BooleanArray> {
    let mut acc = BooleanArray::from(vec![false; values.len()]);
    for candidate in candidates {
        let hit = if candidate.is_null() || candidate.is_nan() {
            missing(values)?
        } else {
            match compare(label, values, ComparisonOp::Equal, candidate) {
                Ok(hit) => hit,
                Err(SelectError::IncompatibleLiteral { .. }) => continue,
                Err(err) => return Err(err),
            }
        };
        acc = or_kleene(&acc, &hit)?;
    }
    Ok(acc)
}

/// `low <= values <= high`, with the ends governed by `inclusive`.
pub(crate) fn between(
    label: &str,
    values: &ArrayRef,
    low: &ScalarValue,
    high: &ScalarValue,
    inclusive: Inclusive,
) -> Result<BooleanArray> {
    let (low_op, high_op) = inclusive.ops();
    let lower = compare(label, values, low_op, low)?;
    let upper = compare(label, values, high_op, high)?;
    Ok(and_kleene(&lower, &upper)?)
}

/// Applies `mask` to `owner`; the result is always expressed in the owner's rows.
pub(crate) fn apply<O: MaskFilter>(owner: &O, op: &str, mask: &BooleanArray) -> Result<O> {
    let selected = owner.filter(mask)?;
    select_log!(
        log::Level::Debug,
        "selection_applied",
        "op={} rows_in={} rows_out={}",
        op,
        owner.num_rows(),
        selected.num_rows(),
    );
    Ok(selected)
}
