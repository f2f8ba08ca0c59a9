//! Health endpoints.
//!
//! `GET /api/v1/health` reports storage reachability and the article count.
//! The `/health/ready` and `/health/live` probes serve orchestrators and load
//! balancers without touching storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ErrorCode;
use crate::inbound::http::state::HttpState;

/// Shared probe state plus the clock stamping health reports.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    clock: Arc<dyn Clock>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl HealthState {
    /// Create a state that starts live but not ready.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            clock,
        }
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes, e.g. while draining for shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// `true` once startup finished.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// `false` once draining.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Overall service verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Storage answered.
    Healthy,
    /// Storage failed.
    Unhealthy,
}

/// Storage reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    /// Storage answered a query.
    Connected,
    /// Storage was unreachable.
    Disconnected,
}

/// Body of `GET /api/v1/health`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Overall verdict.
    pub status: HealthStatus,
    /// Storage reachability.
    pub database: DatabaseStatus,
    /// Stored article count when reachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_count: Option<u64>,
    /// Failure description when unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Time of the check.
    pub timestamp: DateTime<Utc>,
}

/// Storage health check.
///
/// Counting articles proves the storage adapter answers queries. Failures
/// return `503` with the error message; internal messages are withheld.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Storage reachable", body = HealthReport),
        (status = 503, description = "Storage unreachable", body = HealthReport)
    ),
    operation_id = "health"
)]
#[get("/health")]
pub async fn health(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> HttpResponse {
    let timestamp = health_state.clock.utc();
    let (mut response, report) = match state.articles_query.count().await {
        Ok(count) => (
            HttpResponse::Ok(),
            HealthReport {
                status: HealthStatus::Healthy,
                database: DatabaseStatus::Connected,
                article_count: Some(count),
                error: None,
                timestamp,
            },
        ),
        Err(error) => {
            warn!(code = ?error.code(), message = error.message(), "storage health check failed");
            let message = if matches!(error.code(), ErrorCode::InternalError) {
                "storage query failed".to_owned()
            } else {
                error.message().to_owned()
            };
            (
                HttpResponse::ServiceUnavailable(),
                HealthReport {
                    status: HealthStatus::Unhealthy,
                    database: DatabaseStatus::Disconnected,
                    article_count: None,
                    error: Some(message),
                    timestamp,
                },
            )
        }
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}

/// Readiness probe: 200 once the server is initialised, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}
