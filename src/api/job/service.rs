use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

use super::dto::ApiResponse;
use super::models::JobResult;
use crate::config::Config;
use crate::rng::UniformSampler;

/// Message returned with every successful job
pub const SUCCESS_MESSAGE: &str = "Your request was successful.";

/// Processor-level errors, each rendered as an HTTP response
#[derive(Debug)]
pub enum ProcessorError {
    /// Randomly injected failure after the simulated delay
    Simulated { id: String },

    /// Wrong verb used against the processing endpoint
    MethodNotAllowed { method: String },
}

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorError::Simulated { id } => {
                write!(f, "Sorry - ID {} failed to successfully complete.", id)
            }
            ProcessorError::MethodNotAllowed { method } => {
                write!(f, "Method {} Not Allowed", method)
            }
        }
    }
}

impl std::error::Error for ProcessorError {}

impl ResponseError for ProcessorError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProcessorError::Simulated { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProcessorError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // The original implementation left the request hanging on a
            // simulated failure; every accepted request must instead settle
            // with an observable response.
            ProcessorError::Simulated { .. } => HttpResponse::InternalServerError()
                .json(ApiResponse::<JobResult>::failure(self.to_string())),
            ProcessorError::MethodNotAllowed { .. } => HttpResponse::MethodNotAllowed()
                .insert_header((header::ALLOW, "GET"))
                .json(ApiResponse::<JobResult>::failure(self.to_string())),
        }
    }
}

/// Tunables for the simulated processing, passed in at construction
#[derive(Clone, Debug)]
pub struct ProcessorSettings {
    /// Upper bound of the random delay
    pub max_delay: Duration,

    /// Failure cutoff out of 100; draws at or above it fail the job
    pub failure_threshold: f64,
}

impl From<&Config> for ProcessorSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_delay: config.max_delay,
            failure_threshold: config.failure_threshold,
        }
    }
}

/// Simulated job processor
///
/// Fakes an expensive operation: sleeps a uniformly random duration in
/// `[0, max_delay)`, then succeeds or fails based on an independent random
/// draw against the failure threshold. All randomness comes from the
/// injected sampler so tests can run deterministically.
pub struct JobProcessor {
    settings: ProcessorSettings,
    sampler: Arc<dyn UniformSampler>,
}

impl JobProcessor {
    pub fn new(settings: ProcessorSettings, sampler: Arc<dyn UniformSampler>) -> Self {
        Self { settings, sampler }
    }

    /// Process a single job id: wait out the simulated delay, then settle
    /// with either the success payload or a simulated failure.
    ///
    /// The delay draw comes first, then the failure draw, so a sequence
    /// sampler can force each independently.
    pub async fn process(&self, id: &str) -> Result<JobResult, ProcessorError> {
        let delay = self.settings.max_delay.mul_f64(self.sampler.sample());
        let failure_value = self.sampler.sample() * 100.0;

        info!(
            "Request {} will have a simulated delay of {:.3} second(s)",
            id,
            delay.as_secs_f64()
        );

        // Fake an expensive operation (like archiving data)
        sleep(delay).await;

        info!("Completing request {}", id);

        if failure_value >= self.settings.failure_threshold {
            error!(
                "Request {} drew failure value {:.2}, at or above threshold {}",
                id, failure_value, self.settings.failure_threshold
            );
            return Err(ProcessorError::Simulated { id: id.to_string() });
        }

        Ok(JobResult {
            id: id.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{SeededSampler, SequenceSampler};
    use std::time::Instant;

    fn processor(max_delay: Duration, sampler: Arc<dyn UniformSampler>) -> JobProcessor {
        JobProcessor::new(
            ProcessorSettings {
                max_delay,
                failure_threshold: 78.0,
            },
            sampler,
        )
    }

    #[tokio::test]
    async fn forced_success_returns_payload() {
        let p = processor(
            Duration::ZERO,
            Arc::new(SequenceSampler::new(vec![0.0, 0.0])),
        );

        let result = p.process("5").await.expect("draw below threshold succeeds");
        assert_eq!(result.id, "5");
        assert_eq!(result.message, SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn forced_failure_carries_job_id() {
        let p = processor(
            Duration::ZERO,
            Arc::new(SequenceSampler::new(vec![0.0, 0.99])),
        );

        let err = p.process("7").await.expect_err("draw of 99 must fail");
        match err {
            ProcessorError::Simulated { ref id } => assert_eq!(id, "7"),
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Sorry - ID 7 failed to successfully complete."
        );
    }

    #[tokio::test]
    async fn draw_exactly_at_threshold_fails() {
        let p = processor(
            Duration::ZERO,
            Arc::new(SequenceSampler::new(vec![0.0, 0.78])),
        );

        assert!(p.process("0").await.is_err());
    }

    #[tokio::test]
    async fn delay_scales_with_the_first_draw() {
        // Delay draw of 0.5 against an 80ms bound waits at least 40ms.
        let p = processor(
            Duration::from_millis(80),
            Arc::new(SequenceSampler::new(vec![0.5, 0.0])),
        );

        let started = Instant::now();
        p.process("0").await.expect("forced success");
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn seeded_failure_rate_converges_to_threshold() {
        let p = processor(Duration::ZERO, Arc::new(SeededSampler::new(42)));

        let mut failures = 0usize;
        let total = 10_000usize;
        for i in 0..total {
            if p.process(&i.to_string()).await.is_err() {
                failures += 1;
            }
        }

        // Threshold 78/100 gives an expected failure rate of 22%.
        let rate = failures as f64 / total as f64;
        assert!(
            (0.20..=0.24).contains(&rate),
            "failure rate {} not near 0.22",
            rate
        );
    }
}
