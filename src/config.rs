use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server binds to
    /// Default: 8080
    pub port: u16,

    /// Upper bound of the simulated processing delay
    /// Default: 10000ms (10 seconds)
    pub max_delay: Duration,

    /// Failure cutoff out of 100: a random draw at or above this value
    /// fails the job. Default: 78 (~22% failure rate)
    pub failure_threshold: f64,

    /// Number of jobs the dispatcher builds per batch
    /// Default: 10
    pub batch_size: usize,

    /// Base URL the dispatcher sends job requests to
    /// Default: http://127.0.0.1:8080
    pub base_url: String,

    /// Directory for rolling log files
    /// Default: logs
    pub log_dir: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// All variables are optional:
    /// - HOST, PORT: server bind address
    /// - MAX_DELAY_MS: maximum simulated delay in milliseconds
    /// - FAILURE_THRESHOLD: failure cutoff out of 100
    /// - BATCH_SIZE: jobs per dispatcher batch
    /// - BASE_URL: dispatcher target
    /// - LOG_DIR: log file directory
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let max_delay_ms: u64 = env::var("MAX_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10_000);

        let failure_threshold: f64 = env::var("FAILURE_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(78.0);

        if !(0.0..=100.0).contains(&failure_threshold) {
            return Err(format!(
                "FAILURE_THRESHOLD must be between 0 and 100, got {}",
                failure_threshold
            ));
        }

        let batch_size = env::var("BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Config {
            host,
            port,
            max_delay: Duration::from_millis(max_delay_ms),
            failure_threshold,
            batch_size,
            base_url,
            log_dir,
        })
    }
}
