use actix_web::{
    web::{self, Data, Query, ServiceConfig},
    HttpRequest, HttpResponse,
};
use serde::Deserialize;

use super::dto::ApiResponse;
use super::service::{JobProcessor, ProcessorError};

#[derive(Debug, Deserialize)]
pub struct RandomDelayQuery {
    pub id: String,
}

/// GET /api/randomdelay?id={id}
///
/// Runs one simulated job. Responds 200 with the success envelope, or 500
/// with the failure envelope when the random failure draw hits.
async fn random_delay(
    processor: Data<JobProcessor>,
    query: Query<RandomDelayQuery>,
) -> Result<HttpResponse, ProcessorError> {
    let result = processor.process(&query.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// Fallback for every non-GET verb on the processing endpoint
async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ProcessorError> {
    Err(ProcessorError::MethodNotAllowed {
        method: req.method().to_string(),
    })
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        web::resource("/api/randomdelay")
            .route(web::get().to(random_delay))
            .default_service(web::route().to(method_not_allowed)),
    );
}
