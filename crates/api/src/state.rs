use std::sync::Arc;

use mediahub_core::clock::Clock;
use mediahub_core::store::{ContentStore, ObjectStore};
use mediahub_core::workflow::WorkflowEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence for media, submissions, audit, assets and taxonomy.
    pub store: Arc<dyn ContentStore>,
    /// Binary storage for uploaded assets.
    pub objects: Arc<dyn ObjectStore>,
    /// Publication workflow over the same store.
    pub engine: WorkflowEngine<dyn ContentStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the workflow engine to the same store the handlers read from.
    pub fn new(
        store: Arc<dyn ContentStore>,
        objects: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        config: ServerConfig,
    ) -> Self {
        let engine = WorkflowEngine::new(Arc::clone(&store), clock);
        Self {
            store,
            objects,
            engine,
            config: Arc::new(config),
        }
    }
}
