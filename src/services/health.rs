use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use crate::database::connection::DatabaseManager;
use crate::verification::VerificationRegistry;
use chrono::{DateTime, Utc};

/// Process-wide counters shared by the bot handlers and the health endpoint.
#[derive(Debug)]
pub struct BotStatus {
    pub started_at: DateTime<Utc>,
    messages_processed: AtomicU64,
}

impl BotStatus {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            messages_processed: AtomicU64::new(0),
        }
    }

    pub fn record_message(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_processed(&self) -> u64 {
        self.messages_processed.load(Ordering::Relaxed)
    }
}

impl Default for BotStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
    pub messages_processed: u64,
    pub pending_verifications: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub status: Arc<BotStatus>,
    pub registry: Arc<VerificationRegistry>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(
        db: Arc<DatabaseManager>,
        status: Arc<BotStatus>,
        registry: Arc<VerificationRegistry>,
    ) -> Self {
        let state = AppState { db, status, registry };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let db_healthy = test_database_connection(&state.db).await.is_ok();

    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.status.started_at)
        .num_seconds()
        .max(0) as u64;

    if !db_healthy {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        uptime_seconds: uptime,
        messages_processed: state.status.messages_processed(),
        pending_verifications: state.registry.pending_count(),
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1")
        .fetch_one(&db.pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sms::TwilioSender;
    use crate::verification::SystemClock;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use tempfile::TempDir;

    async fn create_test_health_service() -> (HealthService, Arc<BotStatus>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Arc::new(
            DatabaseManager::new(&db_url)
                .await
                .expect("Failed to create test database")
        );
        db.run_migrations().await.expect("Failed to run migrations");

        let status = Arc::new(BotStatus::new());
        let registry = Arc::new(VerificationRegistry::new(
            Arc::new(TwilioSender::new(None)),
            Arc::new(SystemClock),
        ));

        (HealthService::new(db, status.clone(), registry), status, temp_dir)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (health_service, status, _temp_dir) = create_test_health_service().await;
        status.record_message();
        status.record_message();
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let health_response: HealthResponse = response.json();
        assert_eq!(health_response.status, "healthy");
        assert_eq!(health_response.database.status, "healthy");
        assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health_response.messages_processed, 2);
        assert_eq!(health_response.pending_verifications, 0);
    }

    #[tokio::test]
    async fn test_readiness_endpoint() {
        let (health_service, _status, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let ready_response: String = response.json();
        assert_eq!(ready_response, "ready");
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let (health_service, _status, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/live").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let alive_response: String = response.json();
        assert_eq!(alive_response, "alive");
    }
}
