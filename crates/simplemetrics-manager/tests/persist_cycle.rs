//! Snapshot and fan-out behavior of `MetricsManager::persist`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use simplemetrics_core::{
    AccumulatorMetric, AggregationType, ControlledMetric, ErrorCode, MetricHandle, MetricNumber,
    MetricsError, Result,
};
use simplemetrics_manager::{MetricsManager, MetricsUpdater};

use sinks::{descriptor, details_sinks, values_sinks, DetailsSink, Outcome, ValuesSink};

fn accum(name: &str) -> Arc<AccumulatorMetric> {
    Arc::new(AccumulatorMetric::new(descriptor(name)))
}

#[test]
fn thousand_increments_from_ten_threads() {
    let manager = MetricsManager::new();
    let m = accum("hits");
    assert_eq!(m.aggregation_type(), AggregationType::Sum);
    manager.register_metric(m.clone());

    let sink = ValuesSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&sink]));

    thread::scope(|s| {
        for _ in 0..10 {
            let m = &m;
            s.spawn(move || {
                for _ in 0..100 {
                    m.increment();
                }
            });
        }
    });

    manager.persist().unwrap();

    assert_eq!(sink.count(), 1);
    let (values, _) = sink.last();
    assert_eq!(values.len(), 1);
    assert_eq!(values[&MetricHandle::from(m)], MetricNumber::Long(1000));
}

#[test]
fn every_detail_sink_runs_when_some_fail() {
    let manager = MetricsManager::new();
    let m = accum("partial");
    manager.register_metric(m.clone());
    m.add(7);

    let a = DetailsSink::new(Outcome::SinkError);
    let b = DetailsSink::new(Outcome::Ok);
    let c = DetailsSink::new(Outcome::SinkError);
    manager.set_details_persisters(details_sinks(&[&a, &b, &c]));

    let err = manager.persist().expect_err("a failing sink must surface");
    assert_eq!(err.code(), ErrorCode::Io);

    assert_eq!(a.count(), 1);
    assert_eq!(b.count(), 1);
    assert_eq!(c.count(), 1);

    let (details, _) = b.last();
    assert_eq!(details[&MetricHandle::from(m)].value, MetricNumber::Long(7));
    assert_eq!(manager.persist_count(), 1);
}

#[test]
fn value_sink_failure_does_not_skip_detail_sinks() {
    let manager = MetricsManager::new();
    manager.register_metric(accum("mixed"));

    let failing = ValuesSink::new(Outcome::SinkError);
    let details = DetailsSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&failing]));
    manager.set_details_persisters(details_sinks(&[&details]));

    assert!(manager.persist().is_err());
    assert_eq!(failing.count(), 1);
    assert_eq!(details.count(), 1);
}

#[test]
fn io_failures_pass_through_unwrapped() {
    let manager = MetricsManager::new();
    let sink = ValuesSink::new(Outcome::IoError);
    manager.set_values_persisters(values_sinks(&[&sink]));

    match manager.persist() {
        Err(MetricsError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn other_failures_are_wrapped_as_io() {
    let manager = MetricsManager::new();
    let sink = ValuesSink::new(Outcome::SinkError);
    manager.set_values_persisters(values_sinks(&[&sink]));

    match manager.persist_values_only() {
        Err(MetricsError::Io(e)) => {
            assert_eq!(e.kind(), io::ErrorKind::Other);
            assert!(e.to_string().contains("sink rejected snapshot"));
        }
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn persist_count_increases_once_per_cycle_regardless_of_outcome() {
    let manager = MetricsManager::new();
    assert_eq!(manager.persist_count(), 0);

    manager.persist().unwrap();
    assert_eq!(manager.persist_count(), 1);

    manager.persist_values_only().unwrap();
    assert_eq!(manager.persist_count(), 2);

    let sink = ValuesSink::new(Outcome::SinkError);
    manager.set_values_persisters(values_sinks(&[&sink]));
    assert!(manager.persist().is_err());
    assert!(manager.persist_values_only().is_err());
    assert_eq!(manager.persist_count(), 4);
}

#[test]
fn value_and_detail_sinks_see_the_same_snapshot() {
    let manager = MetricsManager::new();
    let m = accum("consistent");
    let other = accum("other");
    manager.register_metric(m.clone());
    manager.register_metric(other.clone());
    m.add(42);

    let values = ValuesSink::new(Outcome::Ok);
    let details = DetailsSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&values]));
    manager.set_details_persisters(details_sinks(&[&details]));

    manager.persist().unwrap();

    let (value_map, value_ts) = values.last();
    let (detail_map, detail_ts) = details.last();
    assert_eq!(value_ts, detail_ts);
    assert_eq!(value_map.len(), 2);
    assert_eq!(detail_map.len(), 2);

    let key = MetricHandle::from(m);
    assert_eq!(value_map[&key], MetricNumber::Long(42));
    assert_eq!(detail_map[&key].value, MetricNumber::Long(42));
    for (metric, value) in &value_map {
        assert_eq!(detail_map[metric].value, *value);
    }
    assert_eq!(value_map[&MetricHandle::from(other)], MetricNumber::Long(0));
}

#[test]
fn details_are_read_once_per_metric() {
    let manager = MetricsManager::new();
    let fixed = sinks::FixedMetric::new("fixed", 2.5);
    manager.register_metric(fixed.clone());

    let values = ValuesSink::new(Outcome::Ok);
    let details = DetailsSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&values]));
    manager.set_details_persisters(details_sinks(&[&details]));

    manager.persist().unwrap();
    assert_eq!(fixed.reads.load(Ordering::SeqCst), 1);
    assert_eq!(values.last().0[&MetricHandle::from(fixed)], MetricNumber::Double(2.5));
}

#[test]
fn each_cycle_reports_only_new_counts() {
    let manager = MetricsManager::new();
    let m = accum("window");
    manager.register_metric(m.clone());
    let sink = ValuesSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&sink]));

    let key = MetricHandle::from(m.clone());
    m.add(10);
    manager.persist().unwrap();
    assert_eq!(sink.last().0[&key], MetricNumber::Long(10));

    m.add(3);
    manager.persist().unwrap();
    assert_eq!(sink.last().0[&key], MetricNumber::Long(3));
}

struct AddingUpdater {
    metric: Arc<AccumulatorMetric>,
    calls: AtomicUsize,
}

impl MetricsUpdater for AddingUpdater {
    fn update_metrics(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.metric.add(5);
        Ok(())
    }
}

struct FailingUpdater;

impl MetricsUpdater for FailingUpdater {
    fn update_metrics(&self) -> Result<()> {
        Err(MetricsError::Updater("source unavailable".into()))
    }
}

#[test]
fn updaters_run_before_the_snapshot() {
    let manager = MetricsManager::new();
    let m = accum("updated");
    manager.register_metric(m.clone());
    let updater = Arc::new(AddingUpdater {
        metric: m.clone(),
        calls: AtomicUsize::new(0),
    });
    manager.register_updater(updater.clone());

    let sink = ValuesSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&sink]));

    manager.persist().unwrap();
    assert_eq!(updater.calls.load(Ordering::SeqCst), 1);
    assert_eq!(sink.last().0[&MetricHandle::from(m)], MetricNumber::Long(5));
}

#[test]
fn updater_failure_aborts_the_cycle() {
    let manager = MetricsManager::new();
    manager.register_metric(accum("aborted"));
    manager.register_updater(Arc::new(FailingUpdater));

    let values = ValuesSink::new(Outcome::Ok);
    let details = DetailsSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&values]));
    manager.set_details_persisters(details_sinks(&[&details]));

    let err = manager.persist().expect_err("updater failure must propagate");
    assert_eq!(err.code(), ErrorCode::Updater);
    assert_eq!(values.count(), 0);
    assert_eq!(details.count(), 0);
    assert_eq!(manager.persist_count(), 0);
}

#[test]
fn values_only_cycle_skips_updaters() {
    let manager = MetricsManager::new();
    let m = accum("manual");
    manager.register_metric(m.clone());
    let updater = Arc::new(AddingUpdater {
        metric: m.clone(),
        calls: AtomicUsize::new(0),
    });
    manager.register_updater(updater.clone());

    let sink = ValuesSink::new(Outcome::Ok);
    manager.set_values_persisters(values_sinks(&[&sink]));
    m.add(2);

    manager.persist_values_only().unwrap();
    assert_eq!(updater.calls.load(Ordering::SeqCst), 0);
    assert_eq!(sink.last().0[&MetricHandle::from(m)], MetricNumber::Long(2));
}

#[test]
fn replacing_sink_lists_takes_effect_next_cycle() {
    let manager = MetricsManager::new();
    let first = ValuesSink::new(Outcome::Ok);
    let second = ValuesSink::new(Outcome::Ok);

    manager.set_values_persisters(values_sinks(&[&first]));
    manager.persist().unwrap();

    manager.set_values_persisters(values_sinks(&[&second]));
    manager.persist().unwrap();

    manager.set_values_persisters(Vec::new());
    manager.persist().unwrap();

    assert_eq!(first.count(), 1);
    assert_eq!(second.count(), 1);
    assert_eq!(manager.persist_count(), 3);
}
