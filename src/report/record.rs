//! Core data types for the positions report

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A tracked trading account ("racer")
///
/// `id` is the cache key suffix and is shown in the pane header.
/// `app` is the display label and doubles as the tab/pane anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Racer {
    pub id: String,
    pub app: String,
}

impl Racer {
    pub fn new(id: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            app: app.into(),
        }
    }
}

/// Trade direction as cached by the terminal
///
/// The mapping from the cached code is total: anything other than
/// 0 or 1, including a missing or null code, is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Value")]
pub enum Command {
    Buy,
    Sell,
    #[default]
    Unknown,
}

impl Command {
    /// Bootstrap contextual colour used for the command badge
    pub fn style(&self) -> &'static str {
        match self {
            Command::Buy => "success",
            Command::Sell => "danger",
            Command::Unknown => "secondary",
        }
    }

    /// Badge text
    pub fn label(&self) -> &'static str {
        match self {
            Command::Buy => "BUY",
            Command::Sell => "SELL",
            Command::Unknown => "NA",
        }
    }
}

impl From<i64> for Command {
    fn from(code: i64) -> Self {
        match code {
            0 => Command::Buy,
            1 => Command::Sell,
            _ => Command::Unknown,
        }
    }
}

impl From<Value> for Command {
    fn from(value: Value) -> Self {
        // 0.0 and 1.0 count as their integer codes
        match value.as_f64() {
            Some(code) if code == 0.0 => Command::Buy,
            Some(code) if code == 1.0 => Command::Sell,
            _ => Command::Unknown,
        }
    }
}

/// Position open time, cached as epoch milliseconds
///
/// Validated on decode so that rendering never meets an out-of-range
/// timestamp. Whole-valued floats are accepted as milliseconds too.
/// Ordering follows the raw millisecond value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct OpenTime {
    millis: i64,
    at: DateTime<Utc>,
}

impl OpenTime {
    pub fn from_millis(millis: i64) -> Option<Self> {
        // Sub-second precision is dropped before conversion
        DateTime::from_timestamp(millis / 1000, 0).map(|at| Self { millis, at })
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// Open time truncated to whole seconds, in UTC
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

impl TryFrom<i64> for OpenTime {
    type Error = String;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Self::from_millis(millis).ok_or_else(|| format!("open_time {millis} is out of range"))
    }
}

impl TryFrom<Value> for OpenTime {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Some(millis) = value.as_i64() {
            return Self::try_from(millis);
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Self::try_from(f as i64)
            }
            _ => Err(format!("open_time {value} is not whole epoch milliseconds")),
        }
    }
}

impl PartialOrd for OpenTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

/// Order or position identifier, numeric or textual depending on the feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(Number),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

/// One open trade as stored under `trades_cur:<account id>`
///
/// Amounts stay as JSON numbers so they print exactly as cached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    #[serde(default)]
    pub cmd: Command,
    pub open_price: Number,
    pub volume: Number,
    pub profit: Number,
    pub open_time: OpenTime,
    pub order2: Identifier,
    pub position: Identifier,
}

impl TradeRecord {
    /// True when the position is under water. Zero counts as profitable.
    pub fn is_losing(&self) -> bool {
        self.profit.as_f64().is_some_and(|p| p < 0.0)
    }
}

/// Sort records by `(symbol, open_time)` ascending
///
/// The sort is stable, so exact ties keep their cached order.
pub fn sort_records(records: &mut [TradeRecord]) {
    records.sort_by(|a, b| {
        a.symbol
            .cmp(&b.symbol)
            .then_with(|| a.open_time.cmp(&b.open_time))
    });
}
