use std::sync::OnceLock;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload. Only one recorder can exist per
/// process, so later calls hand back the same handle.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            // Pre-register counters so they appear even before the first increment.
            counter!("predictions_total", "verdict" => "genuine").absolute(0);
            counter!("predictions_total", "verdict" => "fake").absolute(0);
            counter!("prediction_errors_total", "kind" => "invalid_input").absolute(0);
            counter!("prediction_errors_total", "kind" => "inference_failure").absolute(0);
            counter!("prediction_errors_total", "kind" => "unreadable_body").absolute(0);

            // Histogram is lazily created on first record; force creation.
            histogram!("inference_latency_seconds").record(0.0);

            handle
        })
        .clone()
}
