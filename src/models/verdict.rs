use serde::Serialize;

/// Outcome of scoring one job description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_genuine: bool,
    /// Highest class probability, in `[0, 1]`. Absent for classifiers
    /// without probability estimates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
