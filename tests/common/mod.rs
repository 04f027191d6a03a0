use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use jobcheck::api::router::create_router;
use jobcheck::config::AppConfig;
use jobcheck::inference::{Classifier, FeatureVector, InferenceService, Prediction, Vectorizer};
use jobcheck::AppState;

/// Four-term TF-IDF vocabulary paired with a logistic regression that
/// penalises "earn"/"money" and rewards "remote"/"engineer".
#[allow(dead_code)]
pub const VECTORIZER_JSON: &str = r#"{
    "kind": "tfidf",
    "vocabulary": { "earn": 0, "money": 1, "remote": 2, "engineer": 3 },
    "idf": [1.0, 1.0, 1.0, 1.0]
}"#;

#[allow(dead_code)]
pub const MODEL_JSON: &str = r#"{
    "kind": "logistic_regression",
    "classes": [0, 1],
    "coef": [[-2.0, -2.0, 1.0, 1.0]],
    "intercept": [0.0]
}"#;

/// Write artifact files into a fresh temp dir. Keep the `TempDir` alive for
/// as long as the paths are used.
#[allow(dead_code)]
pub fn write_artifacts(model: &str, vectorizer: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = dir.path().join("model.json");
    let vectorizer_path = dir.path().join("vectorizer.json");
    std::fs::write(&model_path, model).expect("Failed to write model");
    std::fs::write(&vectorizer_path, vectorizer).expect("Failed to write vectorizer");
    (dir, model_path, vectorizer_path)
}

/// Always produces the same three-column vector.
#[allow(dead_code)]
pub struct FixedVectorizer;

impl Vectorizer for FixedVectorizer {
    fn transform(&self, _text: &str) -> anyhow::Result<FeatureVector> {
        Ok(FeatureVector::from_dense(&[0.5, 0.0, 1.5]))
    }

    fn dimension(&self) -> usize {
        3
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}

/// Returns a canned prediction, optionally failing on the first call only.
#[allow(dead_code)]
pub struct CannedClassifier {
    pub prediction: Prediction,
    pub fail_first: AtomicBool,
}

impl CannedClassifier {
    #[allow(dead_code)]
    pub fn new(label: i64, probabilities: Vec<f64>) -> Self {
        Self {
            prediction: Prediction::new(label, Some(probabilities)),
            fail_first: AtomicBool::new(false),
        }
    }

    #[allow(dead_code)]
    pub fn failing_once(label: i64, probabilities: Vec<f64>) -> Self {
        Self {
            prediction: Prediction::new(label, Some(probabilities)),
            fail_first: AtomicBool::new(true),
        }
    }
}

impl Classifier for CannedClassifier {
    fn predict(&self, _features: &FeatureVector) -> anyhow::Result<Prediction> {
        if self.fail_first.swap(false, Ordering::SeqCst) {
            anyhow::bail!("model exploded");
        }
        Ok(self.prediction.clone())
    }

    fn n_features(&self) -> usize {
        3
    }

    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn kind(&self) -> &'static str {
        "canned"
    }
}

#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        model_path: "model.json".into(),
        vectorizer_path: "vectorizer.json".into(),
    }
}

#[allow(dead_code)]
pub fn build_test_app(service: InferenceService) -> axum::Router {
    let state = AppState {
        config: test_config(),
        inference: Arc::new(service),
        metrics_handle: jobcheck::metrics::init_metrics(),
    };
    create_router(state)
}

#[allow(dead_code)]
pub fn canned_app(classifier: CannedClassifier) -> axum::Router {
    build_test_app(InferenceService::new(
        Box::new(FixedVectorizer),
        Box::new(classifier),
    ))
}
