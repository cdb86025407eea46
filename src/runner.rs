use std::path::Path;

use log::{debug, error, info};

use crate::config::{ConfigError, Settings};
use crate::errors::{PublishError, ReportError, ReportResult};
use crate::report::ReportDocument;
use crate::sink::{PublishReceipt, PublishSink};
use crate::source::RecordSource;

/// Outcome of one run
///
/// Rendering and publishing are reported separately: a failed upload
/// still leaves the rendered document available.
#[derive(Debug)]
pub struct ReportRun {
    pub document: String,
    pub publish: Result<PublishReceipt, PublishError>,
}

impl ReportRun {
    pub fn is_published(&self) -> bool {
        self.publish.is_ok()
    }

    /// Turn a failed publish into a run error
    pub fn into_result(self) -> ReportResult<PublishReceipt> {
        self.publish.map_err(ReportError::from)
    }
}

/// Render the report for every configured racer, in order
///
/// Any source error ends the render; a missing cache entry does not.
pub async fn render_report<S>(settings: &Settings, source: &mut S) -> ReportResult<String>
where
    S: RecordSource + Send + ?Sized,
{
    let mut doc = ReportDocument::new(&settings.report);
    for (idx, racer) in settings.racers.iter().enumerate() {
        let records = source.records(&racer.id).await?;
        debug!("{} ({}): {} open trades", racer.app, racer.id, records.len());
        doc.process(idx, racer, &records);
    }
    Ok(doc.finalize())
}

/// Runner for the report job
pub struct ReportRunner {
    config: Settings,
}

impl ReportRunner {
    /// Create a new runner from a configuration file
    pub fn new(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = config_path.as_ref().to_string_lossy();
        let config = Settings::new(&path)?;
        Ok(Self { config })
    }

    pub fn from_settings(config: Settings) -> Self {
        Self { config }
    }

    pub fn settings(&self) -> &Settings {
        &self.config
    }

    /// Setup logging; RUST_LOG takes precedence over the configured level
    pub fn init_logging(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.config.log.level.as_str()),
        )
        .try_init()
        .ok();
    }

    /// Render the report and hand it to the sink
    ///
    /// Returns `Err` only when rendering fails. Publish failures are
    /// logged and carried in [`ReportRun::publish`].
    pub async fn run<S, P>(&self, source: &mut S, sink: &P) -> ReportResult<ReportRun>
    where
        S: RecordSource + Send + ?Sized,
        P: PublishSink + Sync + ?Sized,
    {
        info!("Rendering report for {} racers...", self.config.racers.len());
        let document = render_report(&self.config, source).await?;
        info!("Report rendered ({} bytes)", document.len());

        let publish = sink.publish(&document).await;
        match &publish {
            Ok(receipt) => info!(
                "Report published to {} (status {})",
                receipt.destination, receipt.status
            ),
            Err(e) => error!("Report publish failed: {}", e),
        }

        Ok(ReportRun { document, publish })
    }
}
