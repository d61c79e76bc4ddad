use serde::{Deserialize, Serialize};

/// One simulated unit of work, identified by an integer id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Job {
    pub id: u32,
}

/// Success payload produced by the processor
///
/// The id is a string because it echoes the query parameter as received.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobResult {
    pub id: String,
    pub message: String,
}

/// Terminal outcome of one dispatched job
///
/// Failures are plain values collected alongside successes, so a rejected
/// job can never go unobserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded { id: u32, message: String },
    Failed { id: u32, reason: String },
}

impl JobOutcome {
    pub fn id(&self) -> u32 {
        match self {
            JobOutcome::Succeeded { id, .. } => *id,
            JobOutcome::Failed { id, .. } => *id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }
}
