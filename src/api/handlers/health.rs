use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// Artifacts are loaded before the listener binds, so answering at all
/// means the service is ready.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "listen": state.config.bind_addr(),
        "model": state.inference.info(),
    }))
}
