pub mod artifact;
pub mod classifier;
pub mod error;
pub mod features;
pub mod service;
pub mod vectorizer;

pub use artifact::{load_classifier, load_vectorizer};
pub use error::{ArtifactError, ClassifyError};
pub use features::FeatureVector;
pub use service::{InferenceService, ModelInfo};

/// Maps raw text onto the fixed feature space the classifier was trained on.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> anyhow::Result<FeatureVector>;

    /// Width of every vector this vectorizer produces.
    fn dimension(&self) -> usize;

    fn kind(&self) -> &'static str;
}

/// Maps a feature vector onto a discrete label.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<Prediction>;

    /// Feature width the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// Class labels, in the order probability distributions are reported.
    fn classes(&self) -> &[i64];

    fn kind(&self) -> &'static str;
}

/// Raw classifier output.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: i64,
    /// One probability per entry of `Classifier::classes`, when the model
    /// supports probability estimates.
    pub probabilities: Option<Vec<f64>>,
}

impl Prediction {
    pub fn new(label: i64, probabilities: Option<Vec<f64>>) -> Self {
        Self {
            label,
            probabilities,
        }
    }
}
