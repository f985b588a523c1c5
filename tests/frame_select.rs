mod common;

use common::{dta, ints, labels, strings};
use selectable::{
    select, FrameAttribute, Inclusive, PatternOptions, Resolved, RowSelection, ScalarValue,
    SelectError, SelectExt, TemporalAttr,
};

#[test]
fn column_comparison_filters_the_frame() {
    let frame = dta();
    let facade = select(&frame);
    let kept = facade.column("A").expect("A").gt(5).expect("gt");
    assert_eq!(kept.num_rows(), 10);
    assert_eq!(ints(&kept, "A"), (6..=15).collect::<Vec<_>>());
    assert_eq!(kept.column_names(), frame.column_names());
}

#[test]
fn string_equality_keeps_matching_rows() {
    let frame = dta();
    let kept = select(&frame).column("C").expect("C").eq("A").expect("eq");
    assert_eq!(kept.num_rows(), 5);
    assert!(strings(&kept, "C").iter().all(|value| value == "A"));
    assert_eq!(labels(&kept), vec![0, 3, 6, 9, 12]);
}

#[test]
fn dictionary_columns_compare_by_value() {
    let frame = dta();
    let facade = frame.select();
    let by_value = facade.column("D").expect("D").eq("B").expect("eq");
    let by_plain = facade.column("C").expect("C").eq("B").expect("eq");
    assert_eq!(by_value, by_plain);
}

#[test]
fn date_column_accepts_string_literals() {
    let frame = dta();
    let kept = select(&frame)
        .column("B")
        .expect("B")
        .gt("2020-01-02")
        .expect("gt");
    assert_eq!(kept.num_rows(), 13);
}

#[test]
fn month_start_keeps_the_first_row() {
    let frame = dta();
    let kept = select(&frame)
        .column("B")
        .expect("B")
        .dt()
        .expect("dt")
        .is_month_start()
        .expect("is_month_start");
    assert_eq!(labels(&kept), vec![0]);
}

#[test]
fn text_contains_keeps_all_columns() {
    let frame = dta();
    let kept = select(&frame)
        .column("C")
        .expect("C")
        .str()
        .expect("str")
        .contains("A")
        .expect("contains");
    assert_eq!(kept.shape(), (5, 4));
    assert_eq!(labels(&kept), vec![0, 3, 6, 9, 12]);
}

#[test]
fn text_selector_works_on_dictionary_strings() {
    let frame = dta();
    let text = select(&frame).column("D").expect("D").str().expect("str");
    let kept = text
        .contains_with("c", PatternOptions::default().case_sensitive(false))
        .expect("contains");
    assert_eq!(labels(&kept), vec![2, 5, 8, 11, 14]);
}

#[test]
fn disallowed_text_methods_are_unsupported() {
    let frame = dta();
    let text = select(&frame).column("C").expect("C").str().expect("str");
    for name in ["upper", "lower", "split", "replace", "cat"] {
        match text.call(name, &[]) {
            Err(SelectError::UnsupportedOperation { kind, op, .. }) => {
                assert_eq!(kind, "str");
                assert_eq!(op, name);
            }
            other => panic!("{name} should be refused, got {other:?}"),
        }
    }
    let kept = text.call("startswith", &["B"]).expect("startswith");
    assert_eq!(kept.num_rows(), 5);
}

#[test]
fn sub_selectors_check_column_types() {
    let frame = dta();
    let facade = select(&frame);
    assert!(matches!(
        facade.column("A").expect("A").str(),
        Err(SelectError::TypeMismatch { accessor: "str", .. })
    ));
    assert!(matches!(
        facade.column("C").expect("C").dt(),
        Err(SelectError::TypeMismatch { accessor: "dt", .. })
    ));
}

#[test]
fn derived_temporal_properties_stay_selectable() {
    let frame = dta();
    let dt = select(&frame).column("B").expect("B").dt().expect("dt");
    // 2020-01-04 and 2020-01-11 were Saturdays.
    let saturdays = dt.day_of_week().expect("day_of_week").eq(5).expect("eq");
    assert_eq!(saturdays.shape(), (2, 4));
    assert_eq!(labels(&saturdays), vec![3, 10]);

    let Ok(TemporalAttr::Selector(day)) = dt.attr("day") else {
        panic!("day should be re-bound as a selector");
    };
    assert_eq!(day.between(10, 12).expect("between").num_rows(), 3);
    assert!(matches!(
        dt.attr("strftime"),
        Err(SelectError::UnsupportedOperation { kind: "dt", .. })
    ));
}

#[test]
fn index_comparisons_filter_the_frame() {
    let frame = dta();
    let index = select(&frame).index();
    assert_eq!(labels(&index.gt(10).expect("gt")), vec![11, 12, 13, 14]);
    assert_eq!(labels(&index.isin([0i64, 14]).expect("isin")), vec![0, 14]);
    assert_eq!(index.isna().expect("isna").num_rows(), 0);
    assert_eq!(index.notnull().expect("notnull"), frame);
}

#[test]
fn column_selector_reaches_the_same_index() {
    let frame = dta();
    let column = select(&frame).column("A").expect("A");
    assert_eq!(column.index().le(1).expect("le").num_rows(), 2);
}

#[test]
fn members_are_columns_then_index() {
    let frame = dta();
    assert_eq!(select(&frame).members(), ["A", "B", "C", "D", "index"]);
}

#[test]
fn attribute_and_item_lookup_fail_differently() {
    let frame = dta();
    let facade = select(&frame);
    assert!(matches!(facade.attr("E"), Err(SelectError::AttributeNotFound(_))));
    assert!(matches!(facade.get("E"), Err(SelectError::KeyNotFound(_))));
    assert!(matches!(
        facade.get("shape").expect("shape"),
        Resolved::Attribute(FrameAttribute::Shape((15, 4)))
    ));
    assert!(facade.get("index").expect("index").into_index().is_some());
}

#[test]
fn chained_selection_is_conjunctive() {
    let frame = dta();
    let large = select(&frame).column("A").expect("A").gt(5).expect("gt");
    let kept = select(&large).column("C").expect("C").eq("A").expect("eq");
    assert_eq!(labels(&kept), vec![6, 9, 12]);
}

#[test]
fn range_and_membership_tests() {
    let frame = dta();
    let facade = select(&frame);
    let a = facade.column("A").expect("A");
    assert_eq!(a.between(3, 7).expect("between").num_rows(), 5);
    assert_eq!(
        a.between_with(3, 7, Inclusive::Neither)
            .expect("between")
            .num_rows(),
        3
    );
    let c = facade.column("C").expect("C");
    assert_eq!(c.isin(["A", "B"]).expect("isin").num_rows(), 10);
    assert_eq!(c.isin(Vec::<&str>::new()).expect("isin").num_rows(), 0);
}

#[test]
fn literal_errors_are_reported() {
    let frame = dta();
    let a = select(&frame).column("A").expect("A");
    assert!(matches!(a.eq(ScalarValue::Null), Err(SelectError::NullLiteral)));
    assert!(matches!(
        a.eq("x"),
        Err(SelectError::IncompatibleLiteral { .. })
    ));
}

#[test]
fn pass_through_introspection_is_unfiltered() {
    let frame = dta();
    let a = select(&frame).column("A").expect("A");
    assert_eq!(a.name(), "A");
    assert_eq!(a.len(), 15);
}
