use std::sync::Arc;

use crate::advice::dispatcher::AdviceDispatcher;
use crate::auth::session::SessionStore;
use crate::auth::store::CredentialStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable user store. Default: InMemoryCredentialStore. Postgres when DATABASE_URL is set.
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: SessionStore,
    /// Label encoder + classifier, loaded once at startup and read-only afterwards.
    pub dispatcher: Arc<AdviceDispatcher>,
    pub config: Config,
}
