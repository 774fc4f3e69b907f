use std::sync::Arc;

use sqlx::SqlitePool;

use crate::advisor::service::AdvisorService;
use crate::config::Config;
use crate::delegates::DelegateClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every handle is built once in `main` and torn down there after the server
/// stops; handlers only borrow them for the length of a request.
#[derive(Clone)]
pub struct AppState {
    /// Read-only pool over the job-listing database.
    pub jobs_db: SqlitePool,
    pub advisor: Arc<AdvisorService>,
    pub delegates: DelegateClient,
    pub config: Config,
}
