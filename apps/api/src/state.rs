use std::sync::Arc;

use crate::config::Config;
use crate::graph::recompute::Recomputer;
use crate::store::GraphStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GraphStore>,
    /// Shares `store`; serializes similarity edge recomputation.
    pub recomputer: Arc<Recomputer>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn GraphStore>, config: Config) -> Self {
        let recomputer = Arc::new(Recomputer::new(
            store.clone(),
            config.similarity_threshold,
            config.corpus_policy,
        ));
        Self {
            store,
            recomputer,
            config,
        }
    }
}
