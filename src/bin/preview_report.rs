//! Serve the racer positions report locally
//!
//! Run with: cargo run --bin preview_report -- [config.toml]

use log::error;

use racer_report::{runner::ReportRunner, server::start_server, source::RedisRecordSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let default_config = "config.toml".to_string();
    let config_path = args.get(1).unwrap_or(&default_config);
    if !std::path::Path::new(config_path).exists() {
        eprintln!(
            "Config file '{}' not found. Please create one.",
            config_path
        );
        std::process::exit(1);
    }

    let runner = ReportRunner::new(config_path)?;
    runner.init_logging();
    runner.settings().validate()?;

    let settings = runner.settings().clone();
    let source = RedisRecordSource::connect(&settings.cache).await?;

    if let Err(e) = start_server(settings, source).await {
        error!("Preview server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
