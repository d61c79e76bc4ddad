use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use flaky_jobs::api::{health::health_config, hello::hello_config, job::handlers::job_config};
use flaky_jobs::api::job::{JobProcessor, ProcessorSettings};
use flaky_jobs::config::Config;
use flaky_jobs::dispatcher::{self, Dispatcher, HttpJobClient};
use flaky_jobs::rng::ThreadRngSampler;
use flaky_jobs::shutdown::ShutdownCoordinator;

#[derive(Parser)]
#[command(
    name = "flaky-jobs",
    about = "Simulated job processing against a randomly delayed, randomly failing backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the job processor HTTP server
    Serve,

    /// Dispatch a batch of simulated jobs against a running server
    Dispatch {
        /// Number of jobs in the batch (ids 0..N-1)
        #[arg(long)]
        jobs: Option<usize>,

        /// Dispatch strategy
        #[arg(long, value_enum, default_value = "both")]
        mode: Mode,

        /// Server base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Concurrent,
    Sequential,
    Both,
}

/// Initialize file-based logging with daily rotation plus console output
///
/// Log files are created as logs/info.<date>.log and logs/error.<date>.log.
fn init_logging(log_dir: &str) {
    std::fs::create_dir_all(log_dir).expect("Failed to create logs directory");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(error_layer)
        .init();
}

async fn serve(config: Config) -> std::io::Result<()> {
    let settings = ProcessorSettings::from(&config);

    info!("Starting flaky-jobs server");
    info!("Configuration loaded successfully:");
    info!("  - Max simulated delay: {:?}", settings.max_delay);
    info!("  - Failure threshold: {} / 100", settings.failure_threshold);

    let server = HttpServer::new(move || {
        let processor = web::Data::new(JobProcessor::new(
            settings.clone(),
            Arc::new(ThreadRngSampler),
        ));

        App::new()
            .app_data(processor)
            .configure(health_config)
            .configure(hello_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task)
        .wait_for_shutdown()
        .await
}

async fn dispatch(config: Config, jobs: Option<usize>, mode: Mode, base_url: Option<String>) {
    let batch_size = jobs.unwrap_or(config.batch_size);
    let base_url = base_url.unwrap_or(config.base_url);

    info!("Dispatching {} jobs against {}", batch_size, base_url);

    let batch = dispatcher::build_batch(batch_size);
    let dispatcher = Dispatcher::new(HttpJobClient::new(base_url));

    if matches!(mode, Mode::Concurrent | Mode::Both) {
        dispatcher.dispatch_concurrent(&batch).await;
    }
    if matches!(mode, Mode::Sequential | Mode::Both) {
        dispatcher.dispatch_sequential(&batch).await;
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().expect("Failed to load configuration");

    init_logging(&config.log_dir);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Dispatch {
            jobs,
            mode,
            base_url,
        } => {
            dispatch(config, jobs, mode, base_url).await;
            Ok(())
        }
    }
}
