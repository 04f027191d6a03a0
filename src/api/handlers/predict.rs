use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::errors::AppError;
use crate::inference::ClassifyError;
use crate::models::Verdict;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub description: Option<String>,
}

/// `POST /predict` with `{"description": "..."}`.
///
/// A body that is not a JSON object with a string `description` is treated
/// the same as a missing description. A body that cannot be read, such as one
/// over the request size limit, keeps the status of the underlying rejection.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Verdict>, AppError> {
    let description = match payload {
        Ok(Json(body)) => body.description,
        Err(JsonRejection::BytesRejection(rejection)) => {
            tracing::warn!(error = %rejection, "Failed to read predict body");
            counter!("prediction_errors_total", "kind" => "unreadable_body").increment(1);
            return Err(AppError::UnreadableBody(
                rejection.status(),
                rejection.body_text(),
            ));
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable predict payload");
            None
        }
    };

    let inference = Arc::clone(&state.inference);
    let started = Instant::now();

    // transform + predict are CPU-bound
    let result = tokio::task::spawn_blocking(move || inference.classify(description.as_deref()))
        .await
        .unwrap_or_else(|e| {
            Err(ClassifyError::Inference(format!("inference task failed: {e}")))
        });

    match result {
        Ok(verdict) => {
            histogram!("inference_latency_seconds").record(started.elapsed().as_secs_f64());
            let label = if verdict.is_genuine { "genuine" } else { "fake" };
            counter!("predictions_total", "verdict" => label).increment(1);
            tracing::debug!(
                is_genuine = verdict.is_genuine,
                confidence = ?verdict.confidence,
                "Prediction served"
            );
            Ok(Json(verdict))
        }
        Err(e) => {
            counter!("prediction_errors_total", "kind" => e.kind()).increment(1);
            Err(e.into())
        }
    }
}
