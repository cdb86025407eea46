//! Report error types

use thiserror::Error;

/// Errors that end a report run
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Malformed trade records under {key}: {source}")]
    MalformedRecords {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Errors raised by a publish sink
///
/// Kept apart from [`ReportError`] so a failed upload can be reported
/// next to a document that rendered fine.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Sink rejected document with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Could not write document: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = PublishError::Rejected {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sink rejected document with status 403: forbidden"
        );
    }

    #[test]
    fn test_malformed_records_names_key() {
        let source = serde_json::from_str::<i32>("nope").unwrap_err();
        let err = ReportError::MalformedRecords {
            key: "trades_cur:42".to_string(),
            source,
        };
        assert!(err.to_string().contains("trades_cur:42"));
    }

    #[test]
    fn test_publish_error_conversion() {
        let err: ReportError = PublishError::Rejected {
            status: 500,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, ReportError::Publish(_)));
    }
}
