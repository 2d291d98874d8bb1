//! Merge algebra of the accumulator value.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use simplemetrics_core::{AccumValue, MetricNumber, MetricValue};

#[test]
fn reset_next_overwrites_regardless_of_magnitude() {
    let v = AccumValue::new(9_000_000, true);
    let next = v.make_adjusted(7);
    assert_eq!(next, AccumValue::new(7, false));
}

#[test]
fn accumulates_without_reset() {
    let v = AccumValue::new(40, false);
    assert_eq!(v.make_adjusted(2), AccumValue::new(42, false));
    assert_eq!(v.make_adjusted(-50), AccumValue::new(-10, false));
}

#[test]
fn make_reset_next_keeps_value_and_is_consumed_by_next_adjust() {
    let v = AccumValue::new(42, false).make_reset_next();
    assert_eq!(v.count(), 42);
    assert!(v.is_reset_next());

    let after = v.make_adjusted(3);
    assert_eq!(after.count(), 3);
    assert!(!after.is_reset_next());

    // flag is consumed, so the following adjust accumulates again
    assert_eq!(after.make_adjusted(3).count(), 6);
}

#[test]
fn initial_value_is_zero_with_pending_reset() {
    let v = AccumValue::default();
    assert_eq!(v, AccumValue::new(0, true));
    assert_eq!(v.make_adjusted(5), AccumValue::new(5, false));
}

#[test]
fn readouts_are_the_count() {
    let v = AccumValue::new(1234, false);
    let d = v.details();
    assert_eq!(d.value, MetricNumber::Long(1234));
    assert_eq!(d.min, MetricNumber::Long(1234));
    assert_eq!(d.max, MetricNumber::Long(1234));
    assert_eq!(d.num_samples, 1234);
}

#[test]
fn num_samples_is_clamped() {
    assert_eq!(AccumValue::new(i64::MAX, false).num_samples(), i32::MAX);
    assert_eq!(AccumValue::new(i32::MAX as i64, false).num_samples(), i32::MAX);
    assert_eq!(AccumValue::new(-3, false).num_samples(), 0);
}

#[test]
fn details_serialize_as_plain_numbers() {
    let d = AccumValue::new(3, false).details();
    let json = serde_json::to_value(d).unwrap();
    assert_eq!(json["value"], 3);
    assert_eq!(json["num_samples"], 3);
    assert_eq!(serde_json::to_string(&MetricNumber::Double(1.5)).unwrap(), "1.5");
}
