use std::process::ExitCode;

use table_seeder::{seed, Config, DynamoDb};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE
        }
    };
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

    let backend = DynamoDb::from_env(config.endpoint.as_deref()).await;
    match seed(&backend, &config).await.and_then(|report| report.render()) {
        Ok(rendered) => {
            print!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("seeding table {} failed: {}", config.table_name, e);
            ExitCode::FAILURE
        }
    }
}
