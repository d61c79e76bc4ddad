use std::fmt;

use crate::api::job::dto::ApiResponse;
use crate::api::job::models::{Job, JobResult};

/// Ways a single dispatched job can fail
///
/// Transport-level failures and server-side rejections are deliberately one
/// type: the dispatcher handles both the same way, as a locally logged,
/// non-fatal outcome.
#[derive(Debug)]
pub enum DispatchError {
    /// The request never completed (connection refused, timeout, bad body)
    Transport(reqwest::Error),

    /// The server answered with the failure envelope
    Rejected { message: String },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Transport(e) => write!(f, "transport error: {}", e),
            DispatchError::Rejected { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::Transport(err)
    }
}

/// A client able to run one job against the processor
///
/// The dispatcher is generic over this trait so tests can drive it with a
/// stub instead of a live HTTP server.
pub trait JobClient {
    async fn process(&self, job: &Job) -> Result<JobResult, DispatchError>;
}

/// Production client issuing `GET /api/randomdelay?id={id}` over HTTP
pub struct HttpJobClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpJobClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl JobClient for HttpJobClient {
    async fn process(&self, job: &Job) -> Result<JobResult, DispatchError> {
        let url = format!(
            "{}/api/randomdelay?id={}",
            self.base_url.trim_end_matches('/'),
            job.id
        );

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let envelope: ApiResponse<JobResult> = response.json().await?;

        if status.is_success() {
            envelope.data.ok_or_else(|| DispatchError::Rejected {
                message: format!("ID {} response envelope carried no data", job.id),
            })
        } else {
            let message = envelope
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("ID {} rejected with HTTP {}", job.id, status));
            Err(DispatchError::Rejected { message })
        }
    }
}
