//! Literal values and relational operators accepted by selectors.

use std::{fmt, sync::Arc};

use arrow::{
    array::{
        new_null_array, Array, ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array,
        Scalar, StringArray, UInt64Array,
    },
    compute::cast,
    datatypes::DataType,
};

use crate::error::{Result, SelectError};

/// Literal values accepted by comparisons, membership and range tests.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Represents Arrow `NULL`.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Binary blob.
    Binary(Vec<u8>),
}

impl ScalarValue {
    /// Returns true when the literal is the `Null` variant.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Materialises the literal as a single-element Arrow array.
    #[must_use]
    pub fn to_array(&self) -> ArrayRef {
        match self {
            ScalarValue::Null => new_null_array(&DataType::Null, 1),
            ScalarValue::Boolean(v) => Arc::new(BooleanArray::from(vec![*v])),
            ScalarValue::Int64(v) => Arc::new(Int64Array::from(vec![*v])),
            ScalarValue::UInt64(v) => Arc::new(UInt64Array::from(vec![*v])),
            ScalarValue::Float64(v) => Arc::new(Float64Array::from(vec![*v])),
            ScalarValue::Utf8(v) => Arc::new(StringArray::from(vec![v.as_str()])),
            ScalarValue::Binary(v) => Arc::new(BinaryArray::from(vec![v.as_slice()])),
        }
    }

    /// Returns true when the literal is a floating-point NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, ScalarValue::Float64(v) if v.is_nan())
    }

    fn numeric_type(&self) -> Option<DataType> {
        match self {
            ScalarValue::Int64(_) => Some(DataType::Int64),
            ScalarValue::UInt64(_) => Some(DataType::UInt64),
            ScalarValue::Float64(_) => Some(DataType::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("NULL"),
            ScalarValue::Boolean(v) => write!(f, "{v}"),
            ScalarValue::Int64(v) => write!(f, "{v}"),
            ScalarValue::UInt64(v) => write!(f, "{v}"),
            ScalarValue::Float64(v) => write!(f, "{v}"),
            ScalarValue::Utf8(v) => write!(f, "'{v}'"),
            ScalarValue::Binary(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int64(i64::from(value))
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::UInt64(u64::from(value))
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::UInt64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_owned())
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(value: Vec<u8>) -> Self {
        ScalarValue::Binary(value)
    }
}

impl From<&[u8]> for ScalarValue {
    fn from(value: &[u8]) -> Self {
        ScalarValue::Binary(value.to_vec())
    }
}

impl<T> From<Option<T>> for ScalarValue
where
    T: Into<ScalarValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(ScalarValue::Null, Into::into)
    }
}

/// Relational operator applied by a selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`==`).
    Equal,
    /// Not equals (`!=`).
    NotEqual,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl ComparisonOp {
    /// All six operators.
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Equal,
        ComparisonOp::NotEqual,
        ComparisonOp::LessThan,
        ComparisonOp::LessThanOrEqual,
        ComparisonOp::GreaterThan,
        ComparisonOp::GreaterThanOrEqual,
    ];

    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Brings `values` and `literal` to a common Arrow type so a `cmp` kernel accepts them.
///
/// Dictionary arrays keep their encoding; the literal is cast to the dictionary's
/// value type, which is what the comparison kernels expect.
pub(crate) fn coerce(
    column: &str,
    values: &ArrayRef,
    literal: &ScalarValue,
) -> Result<(ArrayRef, Scalar<ArrayRef>)> {
    if literal.is_null() {
        return Err(SelectError::NullLiteral);
    }
    let value_type = match values.data_type() {
        DataType::Dictionary(_, value) => value.as_ref().clone(),
        other => other.clone(),
    };
    let incompatible = || SelectError::IncompatibleLiteral {
        column: column.to_owned(),
        data_type: values.data_type().clone(),
        literal: literal.clone(),
    };

    if let Some(common) = common_numeric_type(&value_type, literal) {
        let lhs = cast_exact(values, &common).ok_or_else(incompatible)?;
        let rhs = cast_exact(&literal.to_array(), &common).ok_or_else(incompatible)?;
        return Ok((lhs, Scalar::new(rhs)));
    }

    let rhs = cast_exact(&literal.to_array(), &value_type).ok_or_else(incompatible)?;
    Ok((Arc::clone(values), Scalar::new(rhs)))
}

// Widening only. Decimals keep their own type and take the literal as is;
// integers stay integers while the literal fits the column's signedness.
fn common_numeric_type(value_type: &DataType, literal: &ScalarValue) -> Option<DataType> {
    let literal_type = literal.numeric_type()?;
    if !value_type.is_numeric() || *value_type == literal_type {
        return None;
    }
    if matches!(value_type, DataType::Decimal128(..) | DataType::Decimal256(..)) {
        return None;
    }
    if value_type.is_floating() || literal_type.is_floating() {
        return Some(DataType::Float64);
    }
    let common = match (value_type.is_unsigned_integer(), literal) {
        (true, ScalarValue::UInt64(_)) => DataType::UInt64,
        (true, ScalarValue::Int64(v)) if *v >= 0 => DataType::UInt64,
        (false, ScalarValue::Int64(_)) => DataType::Int64,
        (false, ScalarValue::UInt64(v)) if i64::try_from(*v).is_ok() => DataType::Int64,
        _ => DataType::Float64,
    };
    Some(common)
}

// `cast` with default options turns unrepresentable values into NULL; treat that as failure.
fn cast_exact(array: &ArrayRef, to: &DataType) -> Option<ArrayRef> {
    if array.data_type() == to {
        return Some(Arc::clone(array));
    }
    let casted = cast(array.as_ref(), to).ok()?;
    if casted.null_count() > array.null_count() {
        return None;
    }
    Some(casted)
}
