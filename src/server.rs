use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{error, info};
use serde_json::json;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::errors::ReportResult;
use crate::runner::render_report;
use crate::source::RecordSource;

/// Shared state of the preview server
pub struct PreviewState<S> {
    settings: Settings,
    source: Mutex<S>,
}

impl<S> PreviewState<S> {
    pub fn new(settings: Settings, source: S) -> Self {
        Self {
            settings,
            source: Mutex::new(source),
        }
    }
}

/// Routes: `/` renders the report, `/api/racers` lists racers with record counts
pub fn router<S>(state: Arc<PreviewState<S>>) -> Router
where
    S: RecordSource + Send + 'static,
{
    Router::new()
        .route("/", get(report_handler::<S>))
        .route("/api/racers", get(racers_handler::<S>))
        .with_state(state)
}

/// Start the preview server on `server.host:server.port`
pub async fn start_server<S>(settings: Settings, source: S) -> ReportResult<()>
where
    S: RecordSource + Send + 'static,
{
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = router(Arc::new(PreviewState::new(settings, source)));

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    info!("Report preview running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn report_handler<S>(State(state): State<Arc<PreviewState<S>>>) -> Response
where
    S: RecordSource + Send + 'static,
{
    let mut source = state.source.lock().await;
    match render_report(&state.settings, &mut *source).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Preview render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn racers_handler<S>(State(state): State<Arc<PreviewState<S>>>) -> Response
where
    S: RecordSource + Send + 'static,
{
    let mut source = state.source.lock().await;
    let mut racers = Vec::with_capacity(state.settings.racers.len());
    for racer in &state.settings.racers {
        match source.records(&racer.id).await {
            Ok(records) => racers.push(json!({
                "id": racer.id,
                "app": racer.app,
                "records": records.len(),
            })),
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
            }
        }
    }
    Json(json!({ "racers": racers })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Racer;
    use crate::source::InMemoryRecordSource;

    fn settings() -> Settings {
        Settings {
            racers: vec![Racer::new("1", "alpha"), Racer::new("2", "beta")],
            cache: Default::default(),
            cloudflare: Default::default(),
            report: Default::default(),
            log: Default::default(),
            server: Default::default(),
        }
    }

    async fn serve(source: InMemoryRecordSource) -> String {
        let app = router(Arc::new(PreviewState::new(settings(), source)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn source() -> InMemoryRecordSource {
        let mut source = InMemoryRecordSource::new("trades_cur");
        source.insert(
            "1",
            r#"{"5": {"symbol": "GOLD", "cmd": 0, "open_price": 2350.1, "volume": 0.01,
                      "profit": 0, "open_time": 1715699220000, "order2": 5, "position": 4}}"#,
        );
        source
    }

    #[tokio::test]
    async fn test_preview_page() {
        let base = serve(source()).await;
        let resp = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = resp.text().await.unwrap();
        assert!(body.contains(">ALPHA</a>"));
        assert!(body.contains(">BETA</a>"));
        assert!(body.contains("GOLD"));
        assert_eq!(body.matches("No data.").count(), 1);
    }

    #[tokio::test]
    async fn test_racers_endpoint() {
        let base = serve(source()).await;
        let value: serde_json::Value = reqwest::get(format!("{base}/api/racers"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(value["racers"][0]["app"], "alpha");
        assert_eq!(value["racers"][0]["records"], 1);
        assert_eq!(value["racers"][1]["records"], 0);
    }

    #[tokio::test]
    async fn test_render_error_is_500() {
        let mut bad = InMemoryRecordSource::new("trades_cur");
        bad.insert("2", "not json");
        let base = serve(bad).await;
        let resp = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(resp.status(), 500);
    }
}
