use metrics::set_default_local_recorder;
use metrics_exporter_prometheus::PrometheusBuilder;
use rstest::rstest;

use crate::define_metrics;
use crate::metrics::parse_numeric_metric;

define_metrics!(
    Storage => {
        MetricCounter { TEST_COUNTER, "test_counter", "A test counter", init = 3 },
        MetricGauge { TEST_GAUGE, "test_gauge", "A test gauge" },
    },
);

#[test]
fn define_metrics_collects_keys() {
    assert_eq!(STORAGE_ALL_METRICS, &["test_counter", "test_gauge"]);
    assert_eq!(TEST_COUNTER.get_name(), "test_counter");
    assert_eq!(TEST_GAUGE.get_name(), "test_gauge");
}

#[test]
fn counter_run_and_parse() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let _recorder_guard = set_default_local_recorder(&recorder);

    TEST_COUNTER.register();
    assert_eq!(TEST_COUNTER.parse_numeric_metric::<u64>(&recorder.handle().render()), Some(3));

    TEST_COUNTER.increment(2);
    assert_eq!(TEST_COUNTER.parse_numeric_metric::<u64>(&recorder.handle().render()), Some(5));
}

#[rstest]
#[case::small(7)]
#[case::block_height(1_000_000)]
fn gauge_set_lossy(#[case] value: u64) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let _recorder_guard = set_default_local_recorder(&recorder);

    TEST_GAUGE.register();
    TEST_GAUGE.set_lossy(value);
    assert_eq!(TEST_GAUGE.parse_numeric_metric::<u64>(&recorder.handle().render()), Some(value));
}

#[test]
fn parse_missing_metric() {
    let metrics_as_string = "other_metric 4\n";
    assert_eq!(parse_numeric_metric::<u64>(metrics_as_string, "test_counter"), None);
    assert_eq!(parse_numeric_metric::<u64>(metrics_as_string, "other_metric"), Some(4));
}
