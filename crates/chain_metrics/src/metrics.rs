#[cfg(any(feature = "testing", test))]
use std::str::FromStr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
#[cfg(any(feature = "testing", test))]
use num_traits::Num;
use num_traits::ToPrimitive;
#[cfg(any(feature = "testing", test))]
use regex::{escape, Regex};

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;

pub struct MetricCounter {
    name: &'static str,
    description: &'static str,
    initial_value: u64,
}

impl MetricCounter {
    pub const fn new(name: &'static str, description: &'static str, initial_value: u64) -> Self {
        Self { name, description, initial_value }
    }

    pub const fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn register(&self) {
        counter!(self.name).absolute(self.initial_value);
        describe_counter!(self.name, self.description);
    }

    pub fn increment(&self, value: u64) {
        counter!(self.name).increment(value);
    }

    #[cfg(any(feature = "testing", test))]
    pub fn parse_numeric_metric<T: Num + FromStr>(&self, metrics_as_string: &str) -> Option<T> {
        parse_numeric_metric::<T>(metrics_as_string, self.get_name())
    }
}

pub struct MetricGauge {
    name: &'static str,
    description: &'static str,
}

impl MetricGauge {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    pub const fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn register(&self) {
        let _ = gauge!(self.name);
        describe_gauge!(self.name, self.description);
    }

    /// Sets the gauge to a value that may lose precision as an `f64`, e.g. a block height.
    pub fn set_lossy<T: ToPrimitive>(&self, value: T) {
        if let Some(value) = value.to_f64() {
            gauge!(self.name).set(value);
        }
    }

    #[cfg(any(feature = "testing", test))]
    pub fn parse_numeric_metric<T: Num + FromStr>(&self, metrics_as_string: &str) -> Option<T> {
        parse_numeric_metric::<T>(metrics_as_string, self.get_name())
    }
}

/// Parses a specific numeric metric value from a rendered Prometheus metrics string.
///
/// Returns `None` if the metric is not found or if its value cannot be parsed into `T`.
#[cfg(any(feature = "testing", test))]
pub fn parse_numeric_metric<T: Num + FromStr>(
    metrics_as_string: &str,
    metric_name: &str,
) -> Option<T> {
    // Matches a line of the form "metric_name <number>".
    let pattern = format!(r#"(?m)^{}\s+(\d+)$"#, escape(metric_name));
    let re = Regex::new(&pattern).ok()?;
    let captures = re.captures(metrics_as_string)?;
    captures.get(1)?.as_str().parse().ok()
}
