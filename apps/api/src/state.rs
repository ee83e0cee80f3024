use std::sync::Arc;

use crate::config::Config;
use crate::technical_tests::repository::TestRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Technical-test attempts. Default: in-memory, lost on restart.
    pub tests: Arc<dyn TestRepository>,
}
