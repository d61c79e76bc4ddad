pub mod client;

pub use client::{DispatchError, HttpJobClient, JobClient};

use futures_util::future;
use tracing::{info, warn};

use crate::api::job::models::{Job, JobOutcome};

/// Build a batch of n jobs with ids 0..n-1, in order
pub fn build_batch(n: usize) -> Vec<Job> {
    (0..n).map(|i| Job { id: i as u32 }).collect()
}

/// Issues batches of jobs to the processor and collects per-job outcomes
///
/// Each job settles exactly once, as `Succeeded` or `Failed`; a failed job
/// never aborts its siblings or the batch.
pub struct Dispatcher<C: JobClient> {
    client: C,
}

impl<C: JobClient> Dispatcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Issue every job at once and suspend until all of them settle
    ///
    /// Outcomes are returned in job order even though the underlying
    /// requests resolve in whatever order their delays allow.
    pub async fn dispatch_concurrent(&self, jobs: &[Job]) -> Vec<JobOutcome> {
        let requests = jobs.iter().map(|job| self.run_job(*job));
        let outcomes = future::join_all(requests).await;
        self.log_summary("concurrent", &outcomes);
        outcomes
    }

    /// Issue jobs strictly one at a time
    ///
    /// Job k+1 is not issued until job k has settled, success or failure.
    pub async fn dispatch_sequential(&self, jobs: &[Job]) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            outcomes.push(self.run_job(*job).await);
        }
        self.log_summary("sequential", &outcomes);
        outcomes
    }

    async fn run_job(&self, job: Job) -> JobOutcome {
        match self.client.process(&job).await {
            Ok(result) => {
                info!("Processed ID {}", job.id);
                JobOutcome::Succeeded {
                    id: job.id,
                    message: result.message,
                }
            }
            Err(err) => {
                // Handled here, at the await point; never escalated.
                warn!("Unable to successfully process ID {}: {}", job.id, err);
                JobOutcome::Failed {
                    id: job.id,
                    reason: err.to_string(),
                }
            }
        }
    }

    fn log_summary(&self, strategy: &str, outcomes: &[JobOutcome]) {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            "{} batch settled: {} succeeded, {} failed",
            strategy,
            succeeded,
            outcomes.len() - succeeded
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::models::JobResult;
    use crate::api::job::service::SUCCESS_MESSAGE;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Stub client with a fixed per-job delay and a configurable set of
    /// failing ids. Records issuance order and peak in-flight requests.
    struct StubClient {
        fail_ids: HashSet<u32>,
        delay: Duration,
        issued: Mutex<Vec<u32>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubClient {
        fn new(fail_ids: impl IntoIterator<Item = u32>, delay: Duration) -> Self {
            Self {
                fail_ids: fail_ids.into_iter().collect(),
                delay,
                issued: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    impl JobClient for StubClient {
        async fn process(&self, job: &Job) -> Result<JobResult, DispatchError> {
            self.issued.lock().unwrap().push(job.id);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_ids.contains(&job.id) {
                Err(DispatchError::Rejected {
                    message: format!("Sorry - ID {} failed to successfully complete.", job.id),
                })
            } else {
                Ok(JobResult {
                    id: job.id.to_string(),
                    message: SUCCESS_MESSAGE.to_string(),
                })
            }
        }
    }

    #[test]
    fn batch_ids_are_sequential_from_zero() {
        let batch = build_batch(10);
        assert_eq!(batch.len(), 10);
        for (i, job) in batch.iter().enumerate() {
            assert_eq!(job.id, i as u32);
        }
    }

    #[tokio::test]
    async fn concurrent_settles_every_job_despite_failures() {
        let dispatcher = Dispatcher::new(StubClient::new([2, 5], Duration::ZERO));
        let batch = build_batch(10);

        let outcomes = dispatcher.dispatch_concurrent(&batch).await;

        assert_eq!(outcomes.len(), 10);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 8);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.id(), i as u32);
        }
        assert!(!outcomes[2].is_success());
        assert!(!outcomes[5].is_success());
    }

    #[tokio::test]
    async fn concurrent_overlaps_requests() {
        // Ten jobs at 50ms each finish together, nowhere near the 500ms a
        // serial run would take.
        let dispatcher = Dispatcher::new(StubClient::new([], Duration::from_millis(50)));
        let batch = build_batch(10);

        let started = Instant::now();
        let outcomes = dispatcher.dispatch_concurrent(&batch).await;
        let elapsed = started.elapsed();

        assert_eq!(outcomes.len(), 10);
        assert!(
            elapsed < Duration::from_millis(300),
            "concurrent batch took {:?}",
            elapsed
        );
        assert!(dispatcher.client.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn sequential_issues_one_job_at_a_time() {
        let dispatcher = Dispatcher::new(StubClient::new([1], Duration::from_millis(1)));
        let batch = build_batch(5);

        let outcomes = dispatcher.dispatch_sequential(&batch).await;

        assert_eq!(outcomes.len(), 5);
        assert_eq!(dispatcher.client.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(*dispatcher.client.issued.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn empty_batch_settles_immediately() {
        let dispatcher = Dispatcher::new(StubClient::new([], Duration::ZERO));

        assert!(dispatcher.dispatch_concurrent(&[]).await.is_empty());
        assert!(dispatcher.dispatch_sequential(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn all_failures_still_finish_cleanly() {
        let dispatcher = Dispatcher::new(StubClient::new(0..10, Duration::ZERO));
        let batch = build_batch(10);

        let concurrent = dispatcher.dispatch_concurrent(&batch).await;
        let sequential = dispatcher.dispatch_sequential(&batch).await;

        assert_eq!(concurrent.len(), 10);
        assert_eq!(sequential.len(), 10);
        assert!(concurrent.iter().all(|o| !o.is_success()));
        assert!(sequential.iter().all(|o| !o.is_success()));
    }
}
