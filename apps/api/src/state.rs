use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::ModelGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The scoring model gateway. Production wires `OpenAiClient`;
    /// tests substitute a scripted implementation.
    pub gateway: Arc<dyn ModelGateway>,
    pub config: Config,
}
