//! REST API models and request/response types

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::stats::StatsSummary;

const MAX_SCALE: u32 = 28;

/// Account details as sent by the terminal, passed through untouched
pub type Account = Value;

/// Open position as sent by the terminal, passed through untouched
pub type Position = Value;

/// A closed trade.
///
/// Only `profit` is interpreted; every other field is kept as received and
/// re-emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Trade {
    profit: Decimal,
    fields: Map<String, Value>,
}

impl Trade {
    /// Signed profit or loss of the trade
    #[must_use]
    pub const fn profit(&self) -> Decimal {
        self.profit
    }

    /// Raw field lookup
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

}

impl TryFrom<Map<String, Value>> for Trade {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let profit = match fields.get("profit") {
            Some(value) => parse_profit(value)?,
            None => return Err("trade is missing `profit`".to_string()),
        };
        Ok(Self { profit, fields })
    }
}

impl From<Trade> for Map<String, Value> {
    fn from(trade: Trade) -> Self {
        trade.fields
    }
}

/// Parse a JSON profit value into an exact decimal
fn parse_profit(value: &Value) -> Result<Decimal, String> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => return Err(format!("trade `profit` must be a number, got {other}")),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .or_else(|| from_scientific_rounded(&text))
        .ok_or_else(|| format!("trade `profit` {text} is not a representable decimal"))
}

/// Scientific notation whose scale exceeds what `Decimal` holds, rounded to
/// the finest representable scale. Magnitudes that are too large stay errors.
fn from_scientific_rounded(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(['e', 'E'])?;
    let mantissa = Decimal::from_str(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    if exponent >= 0 {
        return None;
    }

    let shift = u32::try_from(exponent.unsigned_abs()).ok()?;
    if shift > MAX_SCALE {
        return Some(Decimal::ZERO);
    }

    let mut value =
        mantissa.round_dp_with_strategy(MAX_SCALE - shift, RoundingStrategy::MidpointNearestEven);
    value.set_scale(value.scale() + shift).ok()?;
    Some(value.normalize())
}

/// Latest state pushed by the terminal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Account details, absent until the first ingest
    pub account: Option<Account>,
    /// Closed trades in terminal order
    pub trades: Vec<Trade>,
    /// Open positions in terminal order
    pub positions: Vec<Position>,
    /// Server time of the last ingest
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_update: Option<DateTime<Utc>>,
}

/// Ingest request body
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub account: Option<Account>,
    pub trades: Vec<Trade>,
    pub positions: Vec<Position>,
    /// Terminal-side clock. Logged only; `lastUpdate` uses server time.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub trades_count: usize,
    pub positions_count: usize,
}

/// Stats endpoint payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse<'a> {
    pub account: Option<&'a Account>,
    pub stats: StatsSummary,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_update: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "ok" once a snapshot has arrived, "waiting" before
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_update: Option<DateTime<Utc>>,
}

/// Error response model
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// ISO-8601 with millisecond precision, e.g. `2024-05-01T09:30:00.123Z`
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S>(timestamp: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match timestamp {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_none(),
    }
}
