//! Temporal sub-selector: calendar-boundary predicates plus re-selectable
//! per-row calendar properties.
//!
//! The kind of temporal column is resolved once, when the sub-selector is built:
//!
//! - [`TemporalKind::DateTime`]: `Date32`, `Date64` and `Timestamp` of any unit or zone.
//! - [`TemporalKind::Period`]: a date/timestamp column of period starts whose field
//!   carries [`PERIOD_METADATA_KEY`]. Periods only define `is_leap_year` among the
//!   boundary predicates.
//!
//! Boolean predicates filter the owner. Non-boolean properties (`year`,
//! `day_of_week`, ...) are re-bound as a [`ColumnSelector`] over the same owner so
//! comparisons on them keep selecting rows of the original frame.

use std::{collections::HashMap, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray, Int32Array},
    compute::kernels::temporal::{date_part, DatePart},
    datatypes::{DataType, Field, Int32Type},
};

use crate::{
    error::{Result, SelectError},
    frame::{MaskFilter, Series},
    logging::{select_log, TEMPORAL_LOG_CTX},
    select::{
        guard::{Admission, OperationGuard},
        mask,
        selector::{rewrap, ColumnSelector},
    },
};

/// Field metadata key that marks a column as period-valued.
pub const PERIOD_METADATA_KEY: &str = "selectable.period";

/// Temporal predicates that return one boolean per row.
pub const DT_BOOLEAN_OPS: &[&str] = &[
    "is_leap_year",
    "is_month_end",
    "is_month_start",
    "is_quarter_end",
    "is_quarter_start",
    "is_year_end",
    "is_year_start",
];

// Methods of the temporal operation set; properties are not listed and stay reachable.
const DT_ROUTINES: &[&str] = &[
    "as_unit",
    "asfreq",
    "ceil",
    "day_name",
    "floor",
    "isocalendar",
    "month_name",
    "normalize",
    "round",
    "strftime",
    "to_period",
    "to_pydatetime",
    "to_timestamp",
    "total_seconds",
    "tz_convert",
    "tz_localize",
];

/// Guard shared by every temporal sub-selector.
pub const DT_GUARD: OperationGuard =
    OperationGuard::new("dt", DT_BOOLEAN_OPS, DT_ROUTINES, TEMPORAL_LOG_CTX);

/// Span covered by each value of a period column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodFreq {
    /// One calendar day.
    Day,
    /// One calendar month.
    Month,
    /// One calendar quarter.
    Quarter,
    /// One calendar year.
    Year,
}

impl PeriodFreq {
    /// Frequency code stored in field metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodFreq::Day => "D",
            PeriodFreq::Month => "M",
            PeriodFreq::Quarter => "Q",
            PeriodFreq::Year => "Y",
        }
    }

    /// Parses a frequency code; `A` is accepted for annual.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "D" => Some(PeriodFreq::Day),
            "M" => Some(PeriodFreq::Month),
            "Q" => Some(PeriodFreq::Quarter),
            "Y" | "A" => Some(PeriodFreq::Year),
            _ => None,
        }
    }

    /// Field for a period column whose values are period starts of `data_type`.
    #[must_use]
    pub fn field(self, name: impl Into<String>, data_type: DataType) -> Field {
        let metadata = HashMap::from([(PERIOD_METADATA_KEY.to_owned(), self.as_str().to_owned())]);
        Field::new(name, data_type, true).with_metadata(metadata)
    }
}

/// Concrete temporal kind of a bound column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// Dates and timestamps.
    DateTime,
    /// Periods of the given frequency.
    Period(PeriodFreq),
}

impl TemporalKind {
    /// Resolves the kind of `field`, or fails with `TypeMismatch`.
    pub fn resolve(field: &Field) -> Result<Self> {
        let mismatch = || SelectError::TypeMismatch {
            accessor: "dt",
            column: field.name().clone(),
            expected: "datetimelike and periodlike",
            actual: field.data_type().clone(),
        };
        if !is_datetime_like(field.data_type()) {
            return Err(mismatch());
        }
        match field.metadata().get(PERIOD_METADATA_KEY) {
            None => Ok(TemporalKind::DateTime),
            Some(code) => PeriodFreq::parse(code)
                .map(TemporalKind::Period)
                .ok_or_else(mismatch),
        }
    }

    /// Whether `predicate` is defined for this kind.
    #[must_use]
    pub fn supports(self, predicate: BoundaryPredicate) -> bool {
        match self {
            TemporalKind::DateTime => true,
            TemporalKind::Period(_) => predicate == BoundaryPredicate::IsLeapYear,
        }
    }
}

fn is_datetime_like(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _)
    )
}

/// The seven calendar-boundary predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryPredicate {
    /// Year is a leap year.
    IsLeapYear,
    /// First day of a month.
    IsMonthStart,
    /// Last day of a month.
    IsMonthEnd,
    /// First day of a quarter.
    IsQuarterStart,
    /// Last day of a quarter.
    IsQuarterEnd,
    /// January 1st.
    IsYearStart,
    /// December 31st.
    IsYearEnd,
}

impl BoundaryPredicate {
    /// All boundary predicates.
    pub const ALL: [BoundaryPredicate; 7] = [
        BoundaryPredicate::IsLeapYear,
        BoundaryPredicate::IsMonthStart,
        BoundaryPredicate::IsMonthEnd,
        BoundaryPredicate::IsQuarterStart,
        BoundaryPredicate::IsQuarterEnd,
        BoundaryPredicate::IsYearStart,
        BoundaryPredicate::IsYearEnd,
    ];

    /// Operation name as listed in [`DT_BOOLEAN_OPS`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BoundaryPredicate::IsLeapYear => "is_leap_year",
            BoundaryPredicate::IsMonthStart => "is_month_start",
            BoundaryPredicate::IsMonthEnd => "is_month_end",
            BoundaryPredicate::IsQuarterStart => "is_quarter_start",
            BoundaryPredicate::IsQuarterEnd => "is_quarter_end",
            BoundaryPredicate::IsYearStart => "is_year_start",
            BoundaryPredicate::IsYearEnd => "is_year_end",
        }
    }

    /// Looks a predicate up by operation name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|predicate| predicate.name() == name)
    }

    fn test(self, year: i32, month: i32, day: i32) -> bool {
        let last_day = days_in_month(year, month);
        match self {
            BoundaryPredicate::IsLeapYear => is_leap_year(year),
            BoundaryPredicate::IsMonthStart => day == 1,
            BoundaryPredicate::IsMonthEnd => day == last_day,
            BoundaryPredicate::IsQuarterStart => day == 1 && matches!(month, 1 | 4 | 7 | 10),
            BoundaryPredicate::IsQuarterEnd => day == last_day && matches!(month, 3 | 6 | 9 | 12),
            BoundaryPredicate::IsYearStart => month == 1 && day == 1,
            BoundaryPredicate::IsYearEnd => month == 12 && day == 31,
        }
    }
}

/// Per-row calendar properties; not boolean, so they are re-bound rather than refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemporalProperty {
    /// Calendar year.
    Year,
    /// Month, 1 to 12.
    Month,
    /// Day of month, 1 to 31.
    Day,
    /// Hour of day.
    Hour,
    /// Minute of hour.
    Minute,
    /// Second of minute.
    Second,
    /// Quarter, 1 to 4.
    Quarter,
    /// Day of week, Monday = 0.
    DayOfWeek,
    /// Day of year, 1 to 366.
    DayOfYear,
    /// ISO week number.
    Week,
    /// Number of days in the value's month.
    DaysInMonth,
}

impl TemporalProperty {
    /// Canonical property name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TemporalProperty::Year => "year",
            TemporalProperty::Month => "month",
            TemporalProperty::Day => "day",
            TemporalProperty::Hour => "hour",
            TemporalProperty::Minute => "minute",
            TemporalProperty::Second => "second",
            TemporalProperty::Quarter => "quarter",
            TemporalProperty::DayOfWeek => "day_of_week",
            TemporalProperty::DayOfYear => "day_of_year",
            TemporalProperty::Week => "week",
            TemporalProperty::DaysInMonth => "days_in_month",
        }
    }

    /// Looks a property up by name or one of its aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name {
            "year" => TemporalProperty::Year,
            "month" => TemporalProperty::Month,
            "day" => TemporalProperty::Day,
            "hour" => TemporalProperty::Hour,
            "minute" => TemporalProperty::Minute,
            "second" => TemporalProperty::Second,
            "quarter" => TemporalProperty::Quarter,
            "day_of_week" | "dayofweek" | "weekday" => TemporalProperty::DayOfWeek,
            "day_of_year" | "dayofyear" => TemporalProperty::DayOfYear,
            "week" | "weekofyear" => TemporalProperty::Week,
            "days_in_month" | "daysinmonth" => TemporalProperty::DaysInMonth,
            _ => return None,
        };
        Some(property)
    }

    fn date_part(self) -> Option<DatePart> {
        let part = match self {
            TemporalProperty::Year => DatePart::Year,
            TemporalProperty::Month => DatePart::Month,
            TemporalProperty::Day => DatePart::Day,
            TemporalProperty::Hour => DatePart::Hour,
            TemporalProperty::Minute => DatePart::Minute,
            TemporalProperty::Second => DatePart::Second,
            TemporalProperty::Quarter => DatePart::Quarter,
            TemporalProperty::DayOfWeek => DatePart::DayOfWeekMonday0,
            TemporalProperty::DayOfYear => DatePart::DayOfYear,
            TemporalProperty::Week => DatePart::Week,
            TemporalProperty::DaysInMonth => return None,
        };
        Some(part)
    }
}

/// Result of a name-based temporal lookup.
#[derive(Debug)]
pub enum TemporalAttr<'a, O> {
    /// A boolean predicate applied to the owner.
    Selection(O),
    /// A per-row property bound to the same owner.
    Selector(ColumnSelector<'a, O>),
}

/// Temporal projection of a column, bound to the owner its masks filter.
#[derive(Debug)]
pub struct TemporalSelector<'a, O> {
    owner: &'a O,
    series: Series,
    kind: TemporalKind,
}

impl<'a, O: MaskFilter> TemporalSelector<'a, O> {
    pub(crate) fn new(owner: &'a O, series: &Series) -> Result<Self> {
        let kind = TemporalKind::resolve(series.field())?;
        select_log!(
            log::Level::Trace,
            ctx: TEMPORAL_LOG_CTX,
            "temporal_kind_resolved",
            "column={} kind={:?}",
            series.name(),
            kind,
        );
        Ok(Self {
            owner,
            series: series.clone(),
            kind,
        })
    }

    /// Kind resolved at construction.
    #[must_use]
    pub fn kind(&self) -> TemporalKind {
        self.kind
    }

    /// The owner results are expressed in.
    #[must_use]
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Resolves a temporal name: allow-listed predicates filter the owner,
    /// properties are re-bound, other routines are refused.
    pub fn attr(&self, name: &str) -> Result<TemporalAttr<'a, O>> {
        match DT_GUARD.admit(name)? {
            Admission::Allowed => {
                let predicate = BoundaryPredicate::from_name(name)
                    .ok_or_else(|| SelectError::AttributeNotFound(name.to_owned()))?;
                self.predicate(predicate).map(TemporalAttr::Selection)
            }
            Admission::PassThrough => {
                let property = TemporalProperty::from_name(name)
                    .ok_or_else(|| SelectError::AttributeNotFound(name.to_owned()))?;
                self.property(property).map(TemporalAttr::Selector)
            }
        }
    }

    /// Filters the owner by a boundary predicate.
    pub fn predicate(&self, predicate: BoundaryPredicate) -> Result<O> {
        DT_GUARD.admit(predicate.name())?;
        let mask = dispatch(self.kind, predicate, self.series.values())?;
        mask::apply(self.owner, predicate.name(), &mask)
    }

    /// Re-binds a per-row property as a selector over the same owner.
    pub fn property(&self, property: TemporalProperty) -> Result<ColumnSelector<'a, O>> {
        let values = extract(self.series.values(), property)?;
        rewrap(self.owner, &self.series, property.name(), values)
    }

    /// Rows falling in a leap year.
    pub fn is_leap_year(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsLeapYear)
    }

    /// Rows on the first day of a month.
    pub fn is_month_start(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsMonthStart)
    }

    /// Rows on the last day of a month.
    pub fn is_month_end(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsMonthEnd)
    }

    /// Rows on the first day of a quarter.
    pub fn is_quarter_start(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsQuarterStart)
    }

    /// Rows on the last day of a quarter.
    pub fn is_quarter_end(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsQuarterEnd)
    }

    /// Rows on January 1st.
    pub fn is_year_start(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsYearStart)
    }

    /// Rows on December 31st.
    pub fn is_year_end(&self) -> Result<O> {
        self.predicate(BoundaryPredicate::IsYearEnd)
    }

    /// Calendar year, re-selectable.
    pub fn year(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Year)
    }

    /// Month, re-selectable.
    pub fn month(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Month)
    }

    /// Day of month, re-selectable.
    pub fn day(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Day)
    }

    /// Hour, re-selectable.
    pub fn hour(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Hour)
    }

    /// Minute, re-selectable.
    pub fn minute(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Minute)
    }

    /// Second, re-selectable.
    pub fn second(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Second)
    }

    /// Quarter, re-selectable.
    pub fn quarter(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Quarter)
    }

    /// Day of week with Monday = 0, re-selectable.
    pub fn day_of_week(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::DayOfWeek)
    }

    /// Day of year, re-selectable.
    pub fn day_of_year(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::DayOfYear)
    }

    /// ISO week number, re-selectable.
    pub fn week(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::Week)
    }

    /// Days in the value's month, re-selectable.
    pub fn days_in_month(&self) -> Result<ColumnSelector<'a, O>> {
        self.property(TemporalProperty::DaysInMonth)
    }
}

/// Boundary mask for `values` of the given kind.
fn dispatch(
    kind: TemporalKind,
    predicate: BoundaryPredicate,
    values: &ArrayRef,
) -> Result<BooleanArray> {
    if !kind.supports(predicate) {
        return Err(DT_GUARD.reject(predicate.name(), "the predicate is not defined for periods"));
    }
    // Both kinds compute boundaries from the calendar date of the value; a period
    // value holds its start.
    let parts = CalendarParts::extract(values)?;
    Ok(parts.map(|year, month, day| predicate.test(year, month, day)))
}

fn extract(values: &ArrayRef, property: TemporalProperty) -> Result<ArrayRef> {
    match property.date_part() {
        Some(part) => Ok(date_part(values.as_ref(), part)?),
        None => {
            let parts = CalendarParts::extract(values)?;
            let days: Int32Array = parts
                .year
                .iter()
                .zip(parts.month.iter())
                .map(|(year, month)| Some(days_in_month(year?, month?)))
                .collect();
            Ok(Arc::new(days))
        }
    }
}

struct CalendarParts {
    year: Int32Array,
    month: Int32Array,
    day: Int32Array,
}

impl CalendarParts {
    fn extract(values: &ArrayRef) -> Result<Self> {
        let part = |part| -> Result<Int32Array> {
            Ok(date_part(values.as_ref(), part)?
                .as_primitive::<Int32Type>()
                .clone())
        };
        Ok(Self {
            year: part(DatePart::Year)?,
            month: part(DatePart::Month)?,
            day: part(DatePart::Day)?,
        })
    }

    fn map(&self, test: impl Fn(i32, i32, i32) -> bool) -> BooleanArray {
        (0..self.year.len())
            .map(|row| {
                if self.year.is_null(row) || self.month.is_null(row) || self.day.is_null(row) {
                    None
                } else {
                    Some(test(
                        self.year.value(row),
                        self.month.value(row),
                        self.day.value(row),
                    ))
                }
            })
            .collect()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

#[cfg(test)]
mod tests {
    use arrow::{
        array::{Date32Array, Int64Array, TimestampSecondArray},
        datatypes::TimeUnit,
    };

    use super::*;
    use crate::select::selector::RowSelection;

    // 2020-01-01 as days since the epoch.
    const JAN_1_2020: i32 = 18_262;

    fn days(offsets: &[i32]) -> Series {
        let values: Date32Array = offsets.iter().map(|d| Some(JAN_1_2020 + d)).collect();
        Series::new("d", Arc::new(values))
    }

    fn day_numbers(series: &Series) -> Vec<i32> {
        date_part(series.values().as_ref(), DatePart::Day)
            .expect("day part")
            .as_primitive::<Int32Type>()
            .values()
            .to_vec()
    }

    #[test]
    fn calendar_helpers() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(days_in_month(2021, 4), 30);
    }

    #[test]
    fn boundary_predicates_on_dates() {
        // Jan 1, Jan 31, Mar 31, Dec 31 of 2020.
        let series = days(&[0, 30, 90, 365]);
        let selector = TemporalSelector::new(&series, &series).expect("dt selector");
        assert_eq!(selector.kind(), TemporalKind::DateTime);
        assert_eq!(day_numbers(&selector.is_month_start().expect("start")), vec![1]);
        assert_eq!(
            day_numbers(&selector.is_month_end().expect("end")),
            vec![31, 31, 31]
        );
        assert_eq!(selector.is_quarter_end().expect("q end").len(), 2);
        assert_eq!(selector.is_year_start().expect("y start").len(), 1);
        assert_eq!(selector.is_year_end().expect("y end").len(), 1);
        assert_eq!(selector.is_leap_year().expect("leap").len(), 4);
    }

    #[test]
    fn timestamps_resolve_as_datetime() {
        // 2021-03-01T12:00:00Z and 2021-03-02T00:00:00Z.
        let values = TimestampSecondArray::from(vec![1_614_600_000, 1_614_643_200]);
        let series = Series::new("t", Arc::new(values));
        let selector = TemporalSelector::new(&series, &series).expect("dt selector");
        assert!(matches!(
            series.data_type(),
            DataType::Timestamp(TimeUnit::Second, None)
        ));
        assert_eq!(selector.is_month_start().expect("start").len(), 1);
        assert_eq!(selector.is_leap_year().expect("leap").len(), 0);
    }

    #[test]
    fn non_temporal_column_fails_at_construction() {
        let series = Series::new("n", Arc::new(Int64Array::from(vec![1, 2])));
        let err = TemporalSelector::new(&series, &series).expect_err("not temporal");
        assert!(matches!(err, SelectError::TypeMismatch { accessor: "dt", .. }));
    }

    #[test]
    fn period_columns_only_support_leap_year() {
        let starts: Date32Array = vec![Some(JAN_1_2020), Some(JAN_1_2020 + 366)]
            .into_iter()
            .collect();
        let series = Series::period("p", Arc::new(starts), PeriodFreq::Year);
        let selector = TemporalSelector::new(&series, &series).expect("dt selector");
        assert_eq!(selector.kind(), TemporalKind::Period(PeriodFreq::Year));
        assert_eq!(selector.is_leap_year().expect("leap").len(), 1);
        let err = selector.is_month_start().expect_err("undefined for periods");
        assert!(matches!(err, SelectError::UnsupportedOperation { kind: "dt", .. }));
        assert_eq!(
            selector.year().expect("year").gt(2020).expect("gt").len(),
            1
        );
    }

    #[test]
    fn unknown_period_code_is_a_type_mismatch() {
        let field = Field::new("p", DataType::Date32, true).with_metadata(HashMap::from([(
            PERIOD_METADATA_KEY.to_owned(),
            "fortnight".to_owned(),
        )]));
        let err = TemporalKind::resolve(&field).expect_err("bad frequency");
        assert!(matches!(err, SelectError::TypeMismatch { .. }));
    }

    #[test]
    fn attr_dispatches_by_name() {
        let series = days(&[0, 1, 2]);
        let selector = TemporalSelector::new(&series, &series).expect("dt selector");
        match selector.attr("is_month_start").expect("predicate") {
            TemporalAttr::Selection(kept) => assert_eq!(kept.len(), 1),
            TemporalAttr::Selector(_) => panic!("expected a selection"),
        }
        match selector.attr("dayofweek").expect("property") {
            // 2020-01-01 was a Wednesday.
            TemporalAttr::Selector(dow) => {
                assert_eq!(dow.eq(2).expect("eq").len(), 1);
            }
            TemporalAttr::Selection(_) => panic!("expected a selector"),
        }
        let err = selector.attr("strftime").expect_err("method refused");
        assert!(matches!(err, SelectError::UnsupportedOperation { .. }));
        let err = selector.attr("nope").expect_err("unknown");
        assert!(matches!(err, SelectError::AttributeNotFound(_)));
    }

    #[test]
    fn derived_selectors_are_named_after_the_property() {
        let series = days(&[0, 3]);
        let selector = TemporalSelector::new(&series, &series).expect("dt selector");
        let dow = selector.day_of_week().expect("day of week");
        assert_eq!(dow.name(), "day_of_week");
        assert_eq!(dow.series().index(), series.index());
        let year = selector.attr("year").expect("year");
        match year {
            TemporalAttr::Selector(year) => assert_eq!(year.name(), "year"),
            TemporalAttr::Selection(_) => panic!("expected a selector"),
        }
    }

    #[test]
    fn days_in_month_is_derived() {
        let series = days(&[31, 60]);
        let selector = TemporalSelector::new(&series, &series).expect("dt selector");
        let derived = selector.days_in_month().expect("days in month");
        assert_eq!(derived.name(), "days_in_month");
        assert_eq!(
            derived
                .values()
                .as_primitive::<Int32Type>()
                .values()
                .to_vec(),
            vec![29, 31]
        );
    }
}
