use std::sync::Arc;

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tracing::error;

use crate::db::Store;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn probe(
    store: &dyn Store,
    up: &'static str,
    down: &'static str,
) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} check failed: database unavailable: {}", up, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                database: "disconnected",
                error: Some(format!("Database unavailable: {}", e)),
            })
        }
    }
}

/// Health check endpoint
///
/// General health check including database connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(store: web::Data<Arc<dyn Store>>) -> impl Responder {
    probe(store.get_ref().as_ref(), "healthy", "unhealthy").await
}

/// Readiness check endpoint
///
/// Returns 503 while the database is unreachable so the instance is taken
/// out of rotation until it recovers.
#[get("/ready")]
async fn readiness_check(store: web::Data<Arc<dyn Store>>) -> impl Responder {
    probe(store.get_ref().as_ref(), "ready", "not_ready").await
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
