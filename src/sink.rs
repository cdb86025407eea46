//! Publish targets for the rendered report

use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;

use crate::config::CloudflareConfig;
use crate::errors::PublishError;

/// Successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Where the document went (URL or file path)
    pub destination: String,
    /// HTTP status, or 0 for non-HTTP sinks
    pub status: u16,
}

/// A place the finished document is written to
#[async_trait]
pub trait PublishSink {
    /// Upsert the document; one attempt, no retries
    async fn publish(&self, document: &str) -> Result<PublishReceipt, PublishError>;
}

/// Cloudflare Workers KV value, written through the REST API
pub struct CloudflareKvSink {
    client: reqwest::Client,
    url: String,
    api_token: String,
}

impl CloudflareKvSink {
    pub fn new(config: &CloudflareConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &CloudflareConfig) -> Self {
        Self {
            client,
            url: config.values_url(),
            api_token: config.api_token.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PublishSink for CloudflareKvSink {
    async fn publish(&self, document: &str) -> Result<PublishReceipt, PublishError> {
        debug!("PUT {} ({} bytes)", self.url, document.len());
        let response = self
            .client
            .put(&self.url)
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .body(document.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(PublishReceipt {
            destination: self.url.clone(),
            status: status.as_u16(),
        })
    }
}

/// Writes the document to a local file instead of uploading it
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PublishSink for FileSink {
    async fn publish(&self, document: &str) -> Result<PublishReceipt, PublishError> {
        tokio::fs::write(&self.path, document).await?;
        Ok(PublishReceipt {
            destination: self.path.display().to_string(),
            status: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::put, Router};
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        auth: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<String>>>,
    }

    async fn kv_put(
        State(captured): State<Captured>,
        headers: HeaderMap,
        body: String,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *captured.auth.lock().unwrap() = auth;
        *captured.body.lock().unwrap() = Some(body);
        StatusCode::OK
    }

    async fn kv_reject() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "kv unavailable")
    }

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn config_for(addr: SocketAddr) -> CloudflareConfig {
        CloudflareConfig {
            account_id: "acc".to_string(),
            namespace_id: "ns".to_string(),
            api_token: "tok".to_string(),
            api_base: format!("http://{addr}"),
            ..CloudflareConfig::default()
        }
    }

    const VALUES_PATH: &str = "/accounts/acc/storage/kv/namespaces/ns/values/html";

    #[tokio::test]
    async fn test_cloudflare_put() {
        let captured = Captured::default();
        let app = Router::new()
            .route(VALUES_PATH, put(kv_put))
            .with_state(captured.clone());
        let addr = spawn(app).await;

        let sink = CloudflareKvSink::new(&config_for(addr));
        let receipt = sink.publish("<html></html>").await.unwrap();

        assert_eq!(receipt.status, 200);
        assert!(receipt.destination.ends_with(VALUES_PATH));
        assert_eq!(captured.auth.lock().unwrap().as_deref(), Some("Bearer tok"));
        assert_eq!(captured.body.lock().unwrap().as_deref(), Some("<html></html>"));
    }

    #[tokio::test]
    async fn test_cloudflare_rejection() {
        let app = Router::new().route(VALUES_PATH, put(kv_reject));
        let addr = spawn(app).await;

        let sink = CloudflareKvSink::new(&config_for(addr));
        match sink.publish("doc").await {
            Err(PublishError::Rejected { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "kv unavailable");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_file_sink() {
        let path = std::env::temp_dir().join(format!("racer_report_{}.html", std::process::id()));
        let sink = FileSink::new(&path);
        let receipt = sink.publish("<p>hi</p>").await.unwrap();
        assert_eq!(receipt.status, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
        std::fs::remove_file(&path).ok();
    }
}
