use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::modules::dre::DreCache;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: String,
    pub application: String,
    pub cached_reports: usize,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub database: bool,
    pub application: bool,
}

/// GET /health - Liveness probe
/// Does not check dependencies
pub async fn health_check(cache: Option<web::Data<DreCache>>) -> impl Responder {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: HealthChecks {
            database: "not_checked".to_string(),
            application: "healthy".to_string(),
            cached_reports: cache.map(|c| c.len()).unwrap_or(0),
        },
    };

    HttpResponse::Ok().json(response)
}

/// GET /ready - Readiness probe
///
/// Without a configured pool (in-memory stores) the database check is skipped.
pub async fn readiness_check(pool: Option<web::Data<MySqlPool>>) -> impl Responder {
    let mut checks = ReadinessChecks {
        database: true,
        application: true,
    };

    if let Some(pool) = pool {
        if let Err(e) = sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
            checks.database = false;
            tracing::error!(error = %e, "Database readiness check failed");
        }
    }

    let ready = checks.database && checks.application;
    let response = ReadinessResponse { ready, checks };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
