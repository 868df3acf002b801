//! Shared data models used across modules

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::{Decision, Verdict};

/// One completed prediction, as returned to the caller and persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub result: Verdict,
    pub suggestion: String,
    #[serde(rename = "createdAt", with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Build a fresh record for a decision. The timestamp is truncated to
    /// milliseconds so it survives storage and serialization unchanged.
    pub fn new(decision: Decision) -> Self {
        Self {
            id: Uuid::new_v4(),
            result: decision.result,
            suggestion: decision.suggestion.to_string(),
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

/// A record together with the id the history store assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPrediction {
    pub id: String,
    pub history: PredictionRecord,
}

/// JSON envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: Option<&'static str>, data: T) -> Self {
        Self {
            status: "success",
            message,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(status: &'static str, message: &'static str) -> Self {
        Self {
            status,
            message: Some(message),
            data: None,
        }
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T08:30:00.123Z`
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
