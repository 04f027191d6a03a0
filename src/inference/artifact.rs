use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::classifier::ClassifierSpec;
use super::vectorizer::{TextVectorizer, VectorizerSpec};
use super::{ArtifactError, Classifier};

fn read_json<T: DeserializeOwned>(path: &Path, expected: &'static str) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        expected,
        source,
    })
}

/// Load a fitted classifier artifact.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    let spec: ClassifierSpec = read_json(path, "classifier")?;
    spec.build().map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}

/// Load a fitted vectorizer artifact.
pub fn load_vectorizer(path: &Path) -> Result<TextVectorizer, ArtifactError> {
    let spec: VectorizerSpec = read_json(path, "vectorizer")?;
    TextVectorizer::from_spec(spec).map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}
