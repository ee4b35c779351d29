use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::graph::recompute::RecomputeOutcome;
use crate::graph::snapshot::build_snapshot;
use crate::models::graph::GraphSnapshot;
use crate::state::AppState;

/// GET /api/graph
pub async fn handle_get_graph(State(state): State<AppState>) -> Result<Json<GraphSnapshot>, AppError> {
    Ok(Json(build_snapshot(state.store.as_ref()).await?))
}

/// POST /api/graph/recompute
/// Manual run; unlike the post-creation path, failures are returned to the caller.
pub async fn handle_recompute(
    State(state): State<AppState>,
) -> Result<Json<RecomputeOutcome>, AppError> {
    Ok(Json(state.recomputer.run().await?))
}
