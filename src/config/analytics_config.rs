// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tunable parameters for load integration, trend smoothing and classification

use crate::constants::{classification, load};
use crate::errors::{AnalyticsError, AnalyticsResult};
use crate::intelligence::trend::EmaSeed;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Sample integration and trend parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Inter-sample gaps above this many seconds are excluded from integration
    pub pause_threshold_seconds: f64,
    /// Fitness (CTL) time constant in days
    pub fitness_time_constant_days: u32,
    /// Fatigue (ATL) time constant in days
    pub fatigue_time_constant_days: u32,
    /// How each day's moving average is initialised
    pub ema_seed: EmaSeed,
    /// Offset applied to activity timestamps before bucketing by calendar day
    pub utc_offset_minutes: i32,
}

/// Training-style classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Best archetype score needed to avoid reporting `Mixed`
    pub min_match_score: f64,
    /// Minimum percentage per zone in display distributions
    pub display_floor_percent: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            pause_threshold_seconds: load::PAUSE_THRESHOLD_SECONDS,
            fitness_time_constant_days: load::FITNESS_TIME_CONSTANT_DAYS,
            fatigue_time_constant_days: load::FATIGUE_TIME_CONSTANT_DAYS,
            ema_seed: EmaSeed::default(),
            utc_offset_minutes: 0,
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            min_match_score: classification::MIN_MATCH_SCORE,
            display_floor_percent: classification::DISPLAY_FLOOR_PERCENT,
        }
    }
}

impl LoadConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.pause_threshold_seconds.is_finite() && self.pause_threshold_seconds > 0.0) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "pause_threshold_seconds must be positive, got {}",
                self.pause_threshold_seconds
            )));
        }
        if self.fitness_time_constant_days == 0 || self.fatigue_time_constant_days == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "time constants must be at least one day".to_string(),
            ));
        }
        if self.utc_offset_minutes.abs() >= MINUTES_PER_DAY {
            return Err(AnalyticsError::InvalidConfig(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Local offset used for calendar bucketing; UTC if out of range
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl ClassificationConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(0.0..=100.0).contains(&self.min_match_score) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "min_match_score must be within 0..=100, got {}",
                self.min_match_score
            )));
        }
        // Seven floored zones must still fit in 100%
        if !(0.0..=100.0 / 7.0).contains(&self.display_floor_percent) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "display_floor_percent out of range: {}",
                self.display_floor_percent
            )));
        }
        Ok(())
    }
}
