// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Input records consumed by the analytics engine. Activities arrive already
//! decoded and marked processed by the ingestion layer; nothing in this crate
//! mutates them.
//!
//! ## Field resolution
//!
//! Devices and the ingestion layer do not always agree on where a value lives.
//! Each derived field has exactly one resolution method with a fixed
//! precedence, so the policy can be tested on its own:
//!
//! | Field | Precedence |
//! |---|---|
//! | duration | device `duration_seconds` → `summary.duration_seconds` → 0 |
//! | average power | device `avg_power` → `summary.avg_power` → none |
//! | normalized power | device `normalized_power` → `summary.normalized_power` → none |
//! | timestamp | `start_time` → `upload_date` |
//!
//! Values that are not finite or not strictly positive count as absent.

use crate::errors::AnalyticsError;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A single processed activity as delivered by the data layer
///
/// # Examples
///
/// ```rust
/// use training_load_engine::models::ActivityRecord;
/// use chrono::Utc;
///
/// let activity = ActivityRecord {
///     id: "ride-1".to_string(),
///     start_time: Some(Utc::now()),
///     upload_date: Utc::now(),
///     duration_seconds: Some(3600.0),
///     avg_power: Some(200.0),
///     normalized_power: None,
///     summary: None,
///     samples: Vec::new(),
/// };
/// assert_eq!(activity.resolved_duration_seconds(), 3600.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Identifier assigned by the data layer
    pub id: String,
    /// Recorded start of the activity, if the device reported one
    #[serde(default, alias = "startTime")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the file was uploaded
    #[serde(alias = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    /// Device-computed elapsed timer time
    #[serde(default, alias = "durationSeconds", alias = "total_timer_time")]
    pub duration_seconds: Option<f64>,
    /// Device-computed average power in watts
    #[serde(default, alias = "avgPower")]
    pub avg_power: Option<f64>,
    /// Device-computed normalized power in watts
    #[serde(default, alias = "normalizedPower")]
    pub normalized_power: Option<f64>,
    /// Summary block embedded in the decoded file
    #[serde(default)]
    pub summary: Option<ActivitySummary>,
    /// Raw power samples in arrival order
    #[serde(default, alias = "sampleTrack")]
    pub samples: Vec<PowerSample>,
}

/// Summary values embedded in a decoded activity file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitySummary {
    #[serde(default, alias = "duration")]
    pub duration_seconds: Option<f64>,
    #[serde(default, alias = "avgPower")]
    pub avg_power: Option<f64>,
    #[serde(default, alias = "normalizedPower")]
    pub normalized_power: Option<f64>,
}

/// One time-stamped power reading
///
/// A malformed value reads as absent instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub power: Option<f64>,
}

/// Deserialize a field, mapping values of the wrong shape to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl PowerSample {
    pub fn new(timestamp: DateTime<Utc>, power: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            power: Some(power),
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl ActivityRecord {
    /// Duration in seconds: device field, then embedded summary, then 0
    pub fn resolved_duration_seconds(&self) -> f64 {
        positive(self.duration_seconds)
            .or_else(|| positive(self.summary.as_ref().and_then(|s| s.duration_seconds)))
            .unwrap_or(0.0)
    }

    /// Average power: device field, then embedded summary
    pub fn resolved_avg_power(&self) -> Option<f64> {
        positive(self.avg_power)
            .or_else(|| positive(self.summary.as_ref().and_then(|s| s.avg_power)))
    }

    /// Normalized power: device field, then embedded summary
    pub fn resolved_normalized_power(&self) -> Option<f64> {
        positive(self.normalized_power)
            .or_else(|| positive(self.summary.as_ref().and_then(|s| s.normalized_power)))
    }

    /// Power used for TSS: normalized power when known, else average power
    pub fn representative_power(&self) -> Option<f64> {
        self.resolved_normalized_power()
            .or_else(|| self.resolved_avg_power())
    }

    /// Start time when recorded, otherwise the upload time
    pub fn resolved_timestamp(&self) -> DateTime<Utc> {
        self.start_time.unwrap_or(self.upload_date)
    }

    /// Calendar date of the activity in the given local offset
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.resolved_timestamp().with_timezone(offset).date_naive()
    }
}

/// Functional Threshold Power in watts, guaranteed finite and positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Ftp(f64);

impl Ftp {
    /// Returns `None` when the value cannot anchor zone or TSS math
    pub fn new(watts: f64) -> Option<Self> {
        if watts.is_finite() && watts > 0.0 {
            Some(Self(watts))
        } else {
            None
        }
    }

    pub fn watts(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Ftp {
    type Error = AnalyticsError;

    fn try_from(watts: f64) -> Result<Self, Self::Error> {
        Self::new(watts).ok_or(AnalyticsError::InvalidFtp(watts))
    }
}

impl From<Ftp> for f64 {
    fn from(ftp: Ftp) -> Self {
        ftp.0
    }
}

/// Athlete values supplied by the user-profile collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Raw FTP as stored; may be missing or invalid
    pub ftp: Option<f64>,
    /// Body weight, passed through for power-to-weight context
    pub weight_kg: Option<f64>,
}

impl AthleteProfile {
    pub fn new(ftp: Option<f64>, weight_kg: Option<f64>) -> Self {
        Self { ftp, weight_kg }
    }

    /// Validated FTP, `None` when the pipeline is not computable
    pub fn ftp(&self) -> Option<Ftp> {
        self.ftp.and_then(Ftp::new)
    }

    /// FTP relative to body weight (W/kg)
    pub fn ftp_watts_per_kg(&self) -> Option<f64> {
        let weight = positive(self.weight_kg)?;
        self.ftp().map(|ftp| ftp.watts() / weight)
    }
}
