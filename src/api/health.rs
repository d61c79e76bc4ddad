use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Health check endpoint
///
/// The processor holds no external dependencies, so health reduces to
/// process liveness. Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Liveness check endpoint
///
/// Simple check that the process is alive.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
