use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{load_classifier, load_vectorizer, ArtifactError, Classifier, ClassifyError, Vectorizer};
use crate::models::Verdict;

/// Classifier label that means "genuine posting". Every other label is fake.
pub const GENUINE_LABEL: i64 = 1;

/// Descriptive metadata about the loaded artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub classifier_kind: &'static str,
    pub vectorizer_kind: &'static str,
    pub vocabulary_size: usize,
    pub expected_features: usize,
    pub classes: Vec<i64>,
    pub model_path: Option<PathBuf>,
    pub vectorizer_path: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
}

/// The vectorizer/classifier pair, loaded once and shared read-only across
/// request handlers.
pub struct InferenceService {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    info: ModelInfo,
}

impl InferenceService {
    pub fn new(vectorizer: Box<dyn Vectorizer>, classifier: Box<dyn Classifier>) -> Self {
        let info = ModelInfo {
            classifier_kind: classifier.kind(),
            vectorizer_kind: vectorizer.kind(),
            vocabulary_size: vectorizer.dimension(),
            expected_features: classifier.n_features(),
            classes: classifier.classes().to_vec(),
            model_path: None,
            vectorizer_path: None,
            loaded_at: Utc::now(),
        };

        Self {
            vectorizer,
            classifier,
            info,
        }
    }

    /// Load both artifacts from disk.
    ///
    /// A vectorizer whose width differs from the classifier's is accepted
    /// here; the mismatch surfaces on the first `classify` call.
    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Result<Self, ArtifactError> {
        let classifier = load_classifier(model_path)?;
        let vectorizer = load_vectorizer(vectorizer_path)?;

        let mut service = Self::new(Box::new(vectorizer), classifier);
        service.info.model_path = Some(model_path.to_path_buf());
        service.info.vectorizer_path = Some(vectorizer_path.to_path_buf());

        if service.info.vocabulary_size != service.info.expected_features {
            tracing::warn!(
                vocabulary_size = service.info.vocabulary_size,
                expected_features = service.info.expected_features,
                "Vectorizer and classifier widths differ; predictions will fail"
            );
        }

        Ok(service)
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Score one job description.
    ///
    /// Missing or blank input is rejected before either artifact is touched.
    pub fn classify(&self, description: Option<&str>) -> Result<Verdict, ClassifyError> {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(ClassifyError::InvalidInput)?;

        let features = self
            .vectorizer
            .transform(description)
            .map_err(|e| ClassifyError::Inference(format!("{e:#}")))?;

        let prediction = self
            .classifier
            .predict(&features)
            .map_err(|e| ClassifyError::Inference(format!("{e:#}")))?;

        let confidence = match prediction.probabilities.as_deref() {
            Some(probs) => Some(max_probability(probs)?),
            None => None,
        };

        tracing::debug!(
            label = prediction.label,
            confidence = ?confidence,
            nnz = features.nnz(),
            "Prediction computed"
        );

        Ok(Verdict {
            is_genuine: prediction.label == GENUINE_LABEL,
            confidence,
        })
    }
}

fn max_probability(probs: &[f64]) -> Result<f64, ClassifyError> {
    if probs.is_empty() || probs.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return Err(ClassifyError::Inference(format!(
            "classifier returned an invalid probability distribution: {probs:?}"
        )));
    }
    Ok(probs.iter().copied().fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::inference::{FeatureVector, Prediction};

    struct StubVectorizer {
        calls: Arc<AtomicUsize>,
    }

    impl Vectorizer for StubVectorizer {
        fn transform(&self, _text: &str) -> anyhow::Result<FeatureVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FeatureVector::from_dense(&[1.0, 0.0, 2.0]))
        }

        fn dimension(&self) -> usize {
            3
        }

        fn kind(&self) -> &'static str {
            "stub"
        }
    }

    struct StubClassifier {
        calls: Arc<AtomicUsize>,
        outcome: Result<Prediction, String>,
    }

    impl Classifier for StubClassifier {
        fn predict(&self, _features: &FeatureVector) -> anyhow::Result<Prediction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map_err(anyhow::Error::msg)
        }

        fn n_features(&self) -> usize {
            3
        }

        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn kind(&self) -> &'static str {
            "stub"
        }
    }

    fn stub_service(
        outcome: Result<Prediction, String>,
    ) -> (InferenceService, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let transforms = Arc::new(AtomicUsize::new(0));
        let predictions = Arc::new(AtomicUsize::new(0));
        let service = InferenceService::new(
            Box::new(StubVectorizer {
                calls: transforms.clone(),
            }),
            Box::new(StubClassifier {
                calls: predictions.clone(),
                outcome,
            }),
        );
        (service, transforms, predictions)
    }

    #[test]
    fn test_genuine_verdict() {
        let (service, _, _) = stub_service(Ok(Prediction::new(1, Some(vec![0.3, 0.7]))));
        let verdict = service.classify(Some("Backend engineer, competitive salary")).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                is_genuine: true,
                confidence: Some(0.7)
            }
        );
    }

    #[test]
    fn test_fake_verdict() {
        let (service, _, _) = stub_service(Ok(Prediction::new(0, Some(vec![0.9, 0.1]))));
        let verdict = service.classify(Some("Earn $5000 a week from home")).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                is_genuine: false,
                confidence: Some(0.9)
            }
        );
    }

    #[test]
    fn test_no_probabilities_means_no_confidence() {
        let (service, _, _) = stub_service(Ok(Prediction::new(1, None)));
        let verdict = service.classify(Some("Data analyst")).unwrap();
        assert!(verdict.is_genuine);
        assert_eq!(verdict.confidence, None);
    }

    #[test]
    fn test_empty_input_never_reaches_artifacts() {
        let (service, transforms, predictions) =
            stub_service(Ok(Prediction::new(1, Some(vec![0.3, 0.7]))));

        for input in [None, Some(""), Some("   \n\t")] {
            let err = service.classify(input).unwrap_err();
            assert!(matches!(err, ClassifyError::InvalidInput));
        }

        assert_eq!(transforms.load(Ordering::SeqCst), 0);
        assert_eq!(predictions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_predict_failure_keeps_message() {
        let (service, _, _) = stub_service(Err("matrix is singular".into()));
        let err = service.classify(Some("Cashier")).unwrap_err();
        match err {
            ClassifyError::Inference(msg) => assert_eq!(msg, "matrix is singular"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_distribution_is_a_failure() {
        let (service, _, _) = stub_service(Ok(Prediction::new(1, Some(vec![-0.2, 1.2]))));
        assert!(matches!(
            service.classify(Some("Nurse")),
            Err(ClassifyError::Inference(_))
        ));

        let (service, _, _) = stub_service(Ok(Prediction::new(1, Some(vec![]))));
        assert!(matches!(
            service.classify(Some("Nurse")),
            Err(ClassifyError::Inference(_))
        ));
    }

    #[test]
    fn test_info_reflects_artifacts() {
        let (service, _, _) = stub_service(Ok(Prediction::new(1, None)));
        let info = service.info();
        assert_eq!(info.classifier_kind, "stub");
        assert_eq!(info.vocabulary_size, 3);
        assert_eq!(info.expected_features, 3);
        assert_eq!(info.classes, vec![0, 1]);
        assert!(info.model_path.is_none());
    }
}
