//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use arrow::{
    array::{ArrayRef, AsArray, Date32Array, DictionaryArray, Int32Array, StringArray},
    datatypes::{Int32Type, Int64Type},
};
use selectable::Frame;

/// Days since the epoch of 2020-01-01.
pub const JAN_1_2020: i32 = 18_262;

/// Fifteen rows: `A` = 1..=15, `B` = consecutive days from 2020-01-01,
/// `C` cycling `A`, `B`, `C`, and `D` the same labels dictionary-encoded.
pub fn dta() -> Frame {
    let labels: Vec<&str> = ["A", "B", "C"].iter().copied().cycle().take(15).collect();
    let categories: DictionaryArray<Int32Type> = labels.iter().copied().collect();
    Frame::from_columns([
        ("A", Arc::new(Int32Array::from_iter_values(1..=15)) as ArrayRef),
        (
            "B",
            Arc::new(Date32Array::from_iter_values(JAN_1_2020..JAN_1_2020 + 15)) as ArrayRef,
        ),
        ("C", Arc::new(StringArray::from(labels)) as ArrayRef),
        ("D", Arc::new(categories) as ArrayRef),
    ])
    .expect("fixture frame")
}

/// Row labels of a frame with the default index.
pub fn labels(frame: &Frame) -> Vec<i64> {
    frame
        .index()
        .labels()
        .as_primitive::<Int64Type>()
        .values()
        .to_vec()
}

/// Values of an `Int32` column.
pub fn ints(frame: &Frame, column: &str) -> Vec<i32> {
    frame
        .column(column)
        .expect("column exists")
        .values()
        .as_primitive::<Int32Type>()
        .values()
        .to_vec()
}

/// Values of a `Utf8` column.
pub fn strings(frame: &Frame, column: &str) -> Vec<String> {
    frame
        .column(column)
        .expect("column exists")
        .values()
        .as_string::<i32>()
        .iter()
        .map(|value| value.unwrap_or_default().to_owned())
        .collect()
}
