use std::sync::Arc;

use anyhow::Context;

use jobcheck::api::router::create_router;
use jobcheck::config::AppConfig;
use jobcheck::inference::InferenceService;
use jobcheck::metrics::init_metrics;
use jobcheck::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr();

    tracing::info!(
        model = %config.model_path.display(),
        vectorizer = %config.vectorizer_path.display(),
        "Loading artifacts..."
    );
    let inference = InferenceService::load(&config.model_path, &config.vectorizer_path)
        .context("failed to load model artifacts")?;

    let info = inference.info();
    tracing::info!(
        classifier = info.classifier_kind,
        vectorizer = info.vectorizer_kind,
        vocabulary_size = info.vocabulary_size,
        expected_features = info.expected_features,
        classes = ?info.classes,
        "Artifacts loaded"
    );

    let state = AppState {
        config,
        inference: Arc::new(inference),
        metrics_handle: init_metrics(),
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
