//! Prometheus metrics for the verifier.
//!
//! [`VerifierMetrics`] owns a dedicated [`Registry`]; [`VerifierMetrics::encode`]
//! renders it in the text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct VerifierMetrics {
    pub registry: Registry,

    /// Verifications by network and outcome (`valid` or a rejection code).
    pub verifications_total: IntCounterVec,
    /// Endpoint attempts that failed before a fetch succeeded.
    pub rpc_failovers_total: IntCounter,
    /// End-to-end verify latency, in milliseconds.
    pub verify_latency_ms: Histogram,
}

impl VerifierMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let verifications_total = register_int_counter_vec_with_registry!(
            Opts::new(
                "burnproof_verifications_total",
                "Burn verifications by network and outcome"
            ),
            &["network", "result"],
            registry
        )
        .expect("failed to register verifications_total counter");

        let rpc_failovers_total = register_int_counter_with_registry!(
            Opts::new(
                "burnproof_rpc_failovers_total",
                "Failed endpoint attempts before a successful fetch"
            ),
            registry
        )
        .expect("failed to register rpc_failovers_total counter");

        // 1 ms → ~16 s.
        let verify_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "burnproof_verify_latency_ms",
                "Verification latency in milliseconds"
            )
            .buckets(
                prometheus::exponential_buckets(1.0, 2.0, 15)
                    .expect("static bucket layout is valid")
            ),
            registry
        )
        .expect("failed to register verify_latency_ms histogram");

        Self {
            registry,
            verifications_total,
            rpc_failovers_total,
            verify_latency_ms,
        }
    }

    pub fn record(&self, network: &str, result: &str, elapsed_ms: f64) {
        self.verifications_total
            .with_label_values(&[network, result])
            .inc();
        self.verify_latency_ms.observe(elapsed_ms);
    }

    /// Text exposition of every registered metric.
    pub fn encode(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            tracing::warn!(error = %e, "failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for VerifierMetrics {
    fn default() -> Self {
        Self::new()
    }
}
