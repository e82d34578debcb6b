use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use log_monitor_backend::infrastructure::config::{Config, LogFormat};
use log_monitor_backend::infrastructure::http::start_http_server;
use log_monitor_backend::infrastructure::lifecycle::{ShutdownOutcome, SHUTDOWN_GRACE_PERIOD};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Log Monitoring System API on {}:{}",
        config.host,
        config.port
    );

    match start_http_server(Arc::new(config), SHUTDOWN_GRACE_PERIOD).await? {
        ShutdownOutcome::Drained => Ok(ExitCode::SUCCESS),
        ShutdownOutcome::Forced => Ok(ExitCode::FAILURE),
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "log_monitor_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
