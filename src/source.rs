//! Trade record sources
//!
//! A [`RecordSource`] returns a racer's open trades sorted by
//! `(symbol, open_time)`. A missing cache entry is an empty list.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::{Map, Value};

use crate::config::CacheConfig;
use crate::errors::{ReportError, ReportResult};
use crate::report::{sort_records, TradeRecord};

/// Source of per-racer open trades
#[async_trait]
pub trait RecordSource {
    /// Open trades for `account_id`, sorted by `(symbol, open_time)`
    async fn records(&mut self, account_id: &str) -> ReportResult<Vec<TradeRecord>>;
}

/// Decode a cached `trades_cur` payload
///
/// The payload is a JSON object keyed by ticket; keys are ignored and
/// values are kept in payload order before the stable sort.
pub fn decode_records(key: &str, payload: Option<&str>) -> ReportResult<Vec<TradeRecord>> {
    let Some(payload) = payload else {
        debug!("No cache entry for {}", key);
        return Ok(Vec::new());
    };

    let malformed = |source| ReportError::MalformedRecords {
        key: key.to_string(),
        source,
    };
    let entries: Map<String, Value> = serde_json::from_str(payload).map_err(malformed)?;
    let mut records = entries
        .into_iter()
        .map(|(_, v)| serde_json::from_value::<TradeRecord>(v))
        .collect::<Result<Vec<_>, _>>()
        .map_err(malformed)?;

    sort_records(&mut records);
    Ok(records)
}

/// Records read from Redis under `<prefix>:<account id>`
pub struct RedisRecordSource {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisRecordSource {
    /// Open a connection to the configured cache
    pub async fn connect(config: &CacheConfig) -> ReportResult<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    pub fn key_for(&self, account_id: &str) -> String {
        format!("{}:{}", self.key_prefix, account_id)
    }
}

#[async_trait]
impl RecordSource for RedisRecordSource {
    async fn records(&mut self, account_id: &str) -> ReportResult<Vec<TradeRecord>> {
        let key = self.key_for(account_id);
        // GET returns nil for a missing key, so no separate EXISTS round trip
        let payload: Option<String> = self.conn.get(&key).await?;
        decode_records(&key, payload.as_deref())
    }
}

/// Map-backed source holding raw cache payloads
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    key_prefix: String,
    payloads: HashMap<String, String>,
}

impl InMemoryRecordSource {
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            payloads: HashMap::new(),
        }
    }

    /// Store a raw `trades_cur` payload for an account
    pub fn insert(
        &mut self,
        account_id: impl Into<String>,
        payload: impl Into<String>,
    ) -> &mut Self {
        self.payloads.insert(account_id.into(), payload.into());
        self
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn records(&mut self, account_id: &str) -> ReportResult<Vec<TradeRecord>> {
        let key = format!("{}:{}", self.key_prefix, account_id);
        decode_records(&key, self.payloads.get(account_id).map(String::as_str))
    }
}
