pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::graph::handlers as graph;
use crate::social::handlers as social;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/debug/connection", get(health::connection_handler))
        // Users
        .route(
            "/api/users",
            get(social::handle_list_users).post(social::handle_create_user),
        )
        .route("/api/users/:user_id/posts", get(social::handle_list_user_posts))
        // Posts
        .route("/api/posts", post(social::handle_create_post))
        .route(
            "/api/posts/:post_id",
            get(social::handle_get_post).delete(social::handle_delete_post),
        )
        .route("/api/posts/:post_id/restore", post(social::handle_restore_post))
        .route("/api/recent-posts", get(social::handle_recent_posts))
        // Similarity graph
        .route("/api/graph", get(graph::handle_get_graph))
        .route("/api/graph/recompute", post(graph::handle_recompute))
        .with_state(state)
}
