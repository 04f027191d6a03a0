pub mod api;
pub mod config;
pub mod errors;
pub mod inference;
pub mod metrics;
pub mod models;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::inference::InferenceService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub inference: Arc<InferenceService>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
