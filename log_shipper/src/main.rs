use std::process::ExitCode;

use chrono::Local;
use log_shipper::{ship, CloudWatchLogs, Config};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_max_level(if config.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        // disable printing the name of the module in every log line.
        .with_target(false)
        .without_time()
        // keep stdout for the report.
        .with_writer(std::io::stderr)
        .init();

    let backend = CloudWatchLogs::from_env(config.endpoint.as_deref()).await;
    match ship(&backend, &config, Local::now().naive_local()).await {
        Ok(shipment) => {
            println!("{}", shipment);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("shipping log event failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
