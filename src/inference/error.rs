use std::path::PathBuf;

/// Failure to bring an artifact into memory. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} is not a valid {expected} artifact: {source}", .path.display())]
    Parse {
        path: PathBuf,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {} is inconsistent: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Per-request failure of `InferenceService::classify`.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("No job description provided")]
    InvalidInput,

    #[error("{0}")]
    Inference(String),
}

impl ClassifyError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::InvalidInput => "invalid_input",
            ClassifyError::Inference(_) => "inference_failure",
        }
    }
}
