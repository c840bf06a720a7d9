use chain_metrics::define_metrics;

define_metrics!(
    Consensus => {
        MetricGauge { BFT_FINALIZED_HEIGHT, "bft_finalized_height", "The highest height with a precommit quorum" },
        MetricGauge { BFT_MAX_HEIGHT_PREVOTED, "bft_max_height_prevoted", "The highest height with a prevote quorum" },
        MetricCounter { BFT_HEADERS_APPLIED, "bft_headers_applied", "The number of block headers applied to the voting ledger", init = 0 },
        MetricCounter { BFT_HEADERS_REJECTED, "bft_headers_rejected", "The number of block headers rejected by the finality gadget", init = 0 },
        MetricCounter { BFT_FINALIZED_HEIGHT_CHANGES, "bft_finalized_height_changes", "The number of times the finalized height advanced", init = 0 },
        MetricCounter { BFT_DOUBLE_FORGING_DETECTED, "bft_double_forging_detected", "The number of received blocks double forged by the tip's generator", init = 0 },
    },
);

pub(crate) fn register_metrics() {
    BFT_FINALIZED_HEIGHT.register();
    BFT_MAX_HEIGHT_PREVOTED.register();
    BFT_HEADERS_APPLIED.register();
    BFT_HEADERS_REJECTED.register();
    BFT_FINALIZED_HEIGHT_CHANGES.register();
    BFT_DOUBLE_FORGING_DETECTED.register();
}
