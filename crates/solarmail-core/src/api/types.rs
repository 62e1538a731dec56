//! Records exchanged with the SolarMail service.
//!
//! These are transport types: they mirror the service's JSON field names and
//! are exported to TypeScript for the dashboard.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One email as listed or fetched from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailSummary {
    #[ts(type = "number")]
    pub id: i64,
    pub uid: String,
    pub sender: String,
    pub subject: String,
    pub date: String,
    pub body_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub body: Option<String>,
}

impl EmailSummary {
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

/// Result of running the AI analyzer over a subject/body pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisResult {
    pub sentiment: String,
    #[serde(deserialize_with = "unit_score")]
    pub sentiment_score: f64,
    pub priority: String,
    #[serde(deserialize_with = "unit_score")]
    pub priority_score: f64,
    pub category: String,
    #[serde(deserialize_with = "unit_score")]
    pub category_confidence: f64,
    #[serde(default, alias = "entities", deserialize_with = "serialized_set")]
    pub entities_json: String,
    #[serde(default, alias = "keywords", deserialize_with = "serialized_set")]
    pub keywords_json: String,
    #[serde(default, alias = "model", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub processing_time_ms: Option<u32>,
}

impl AnalysisResult {
    /// Entities decoded from `entities_json`. A missing or malformed payload
    /// yields an empty set.
    pub fn entities(&self) -> ExtractedEntities {
        decode_or_default(&self.entities_json)
    }

    /// Keywords decoded from `keywords_json`, empty when malformed.
    pub fn keywords(&self) -> ExtractedKeywords {
        decode_or_default(&self.keywords_json)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtractedEntities {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub persons: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.dates.is_empty()
            && self.urls.is_empty()
            && self.persons.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtractedKeywords {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl ExtractedKeywords {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.topics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SyncStatus {
    pub account_email: String,
    pub last_sync_date: String,
    pub last_sync_success: bool,
    #[ts(type = "number")]
    pub total_emails_synced: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub last_error_message: Option<String>,
}

impl SyncStatus {
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_sync_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub uptime_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ai_model_ready: Option<bool>,
}

impl HealthStatus {
    pub fn reported_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Acknowledgement returned when a sync is triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SyncAck {
    pub status: String,
    pub message: String,
}

/// Parses RFC 3339, or a naive ISO-8601 datetime taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn decode_or_default<T: for<'de> Deserialize<'de> + Default>(raw: &str) -> T {
    if raw.trim().is_empty() {
        return T::default();
    }
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "discarding malformed serialized analysis field");
            T::default()
        }
    }
}

fn unit_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("score {value} is outside [0, 1]")))
    }
}

/// Accepts the serialized set as a string, `null`, or an inline JSON value so
/// an irregular sub-field never fails the enclosing record.
fn serialized_set<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(raw) => raw,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
