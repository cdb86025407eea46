//! Render the racer positions report and publish it
//!
//! Run with: cargo run --bin publish_report -- [config.toml] [--dry-run <out.html>]

use log::error;

use racer_report::{
    runner::ReportRunner,
    sink::{CloudflareKvSink, FileSink, PublishSink},
    source::RedisRecordSource,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut args = std::env::args().skip(1);
    let mut config_path = "config.toml".to_string();
    let mut dry_run = None;
    while let Some(arg) = args.next() {
        if arg == "--dry-run" {
            dry_run = Some(args.next().unwrap_or_else(|| "report.html".to_string()));
        } else {
            config_path = arg;
        }
    }

    if !std::path::Path::new(&config_path).exists() {
        eprintln!(
            "Config file '{}' not found. Please create one.",
            config_path
        );
        std::process::exit(1);
    }

    let runner = match ReportRunner::new(&config_path) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    runner.init_logging();

    let settings = runner.settings();
    let valid = if dry_run.is_some() {
        settings.validate()
    } else {
        settings.validate_for_publish()
    };
    if let Err(e) = valid {
        error!("{}", e);
        std::process::exit(1);
    }

    let sink: Box<dyn PublishSink + Send + Sync> = match dry_run {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(CloudflareKvSink::new(&settings.cloudflare)),
    };

    let mut source = match RedisRecordSource::connect(&settings.cache).await {
        Ok(source) => source,
        Err(e) => {
            error!("Cannot reach trade cache: {}", e);
            std::process::exit(1);
        }
    };

    match runner.run(&mut source, sink.as_ref()).await {
        Ok(run) if run.is_published() => {}
        Ok(_) => std::process::exit(2),
        Err(e) => {
            error!("Report execution error: {}", e);
            std::process::exit(1);
        }
    }
}
