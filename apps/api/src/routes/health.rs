use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus per-dependency readiness: whether the
/// model API key is configured and whether the database pool is open.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let openai = if state.config.openai_api_key.is_empty() {
        "missing_api_key"
    } else {
        "configured"
    };
    let database = if state.db.is_closed() {
        "disconnected"
    } else {
        "connected"
    };

    Json(json!({
        "status": "ok",
        "service": "ocean-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "services": {
            "openai": openai,
            "database": database,
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use sqlx::PgPool;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{GatewayError, GatewayResponse, ModelGateway};

    struct NoopGateway;

    #[async_trait]
    impl ModelGateway for NoopGateway {
        async fn invoke(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _seed: u64,
        ) -> Result<GatewayResponse, GatewayError> {
            Err(GatewayError::EmptyContent)
        }
    }

    fn state_with_key(api_key: &str) -> AppState {
        let database_url = "postgres://localhost/ocean_test";
        AppState {
            // Lazy pool: opens no connection until first use.
            db: PgPool::connect_lazy(database_url).unwrap(),
            gateway: Arc::new(NoopGateway),
            config: Config {
                database_url: database_url.to_string(),
                openai_api_key: api_key.to_string(),
                port: 3001,
                rust_log: "info".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_health_reports_configured_model_key() {
        let Json(body) = health_handler(State(state_with_key("sk-test"))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ocean-api");
        assert_eq!(body["services"]["openai"], "configured");
        assert_eq!(body["services"]["database"], "connected");
    }

    #[tokio::test]
    async fn test_health_flags_missing_model_key() {
        let Json(body) = health_handler(State(state_with_key(""))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["services"]["openai"], "missing_api_key");
    }
}
