pub mod metrics;

// Its being exported here to be used in define_metrics macro.
pub use paste;

/// Macro to define all metric constants for specified scopes and store them in a collection.
/// This generates:
/// - Individual metric constant according to type, `MetricCounter` or `MetricGauge`.
/// - A const array `<SCOPE>_ALL_METRICS` containing all $keys of all the metrics constants.
#[macro_export]
macro_rules! define_metrics {
    (
        $(
            $scope:ident => { // Metric scope, e.g., Consensus.
                $(
                    $type:ident { // Metric type, e.g., MetricCounter, MetricGauge.
                        $name:ident, // Metric name, e.g., BFT_HEADERS_APPLIED
                        $key:expr, // Metric key, e.g., "bft_headers_applied"
                        $desc:expr // Metric description, e.g., "The number of headers applied"
                        $(, init = $init:expr)? // Optional initialization value for counters
                    }
                ),*
                $(,)?
            }
        ),*
        $(,)?
    ) => {
        $(
            $(
                $crate::paste::paste! {
                    pub const $name: $crate::metrics::$type = $crate::metrics::$type::new(
                        $key,
                        $desc
                        $(, $init)?
                    );
                }
            )*
        )*

        $(
            #[cfg(any(feature = "testing", test))]
            $crate::paste::paste! {
                pub const [<$scope:snake:upper _ALL_METRICS>]: &[&'static str] = &[
                    $(
                        $key,
                    )*
                ];
            }
        )*
    };
}
