use crate::config::Config;
use crate::session::orchestrator::BatchOrchestrator;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single in-memory session the browser drives.
    pub session: SessionStore,
    /// Batch runner over `session`, backed by a pluggable `Optimizer`.
    pub orchestrator: BatchOrchestrator,
    pub config: Config,
}
