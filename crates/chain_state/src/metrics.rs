use chain_metrics::define_metrics;

define_metrics!(
    Storage => {
        MetricCounter { STORAGE_COMMITTED_BATCHES, "storage_committed_batches", "Number of write batches committed to the storage", init = 0 },
        MetricCounter { STORAGE_COMMITTED_KEYS, "storage_committed_keys", "Number of keys written by committed write batches", init = 0 },
    },
);

pub(crate) fn register_metrics() {
    STORAGE_COMMITTED_BATCHES.register();
    STORAGE_COMMITTED_KEYS.register();
}
