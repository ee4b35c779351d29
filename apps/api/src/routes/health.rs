use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "sentigraph"
    }))
}

/// GET /api/debug/connection
/// Round-trips the graph store and reports the user count.
pub async fn connection_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let checked = match state.store.ping().await {
        Ok(()) => state.store.count_users().await,
        Err(e) => Err(e),
    };

    match checked {
        Ok(count) => (
            StatusCode::OK,
            Json(json!({
                "status": "connected",
                "user_count": count,
                "recompute_state": state.recomputer.state(),
                "message": "Successfully connected to the graph store"
            })),
        ),
        Err(e) => {
            tracing::error!("Connection check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "error": e.to_string(),
                    "message": "Failed to connect to the graph store"
                })),
            )
        }
    }
}
