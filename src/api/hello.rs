use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Trivial diagnostic payload
#[derive(Debug, Deserialize, Serialize)]
pub struct HelloResponse {
    pub name: String,
    pub timestamp: i64,
}

/// GET /api/hello
///
/// Diagnostic endpoint returning a fixed name and the current epoch millis.
#[get("/api/hello")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(HelloResponse {
        name: "Rob Brennan".to_string(),
        timestamp: Utc::now().timestamp_millis(),
    })
}

pub fn hello_config(config: &mut web::ServiceConfig) {
    config.service(hello);
}
