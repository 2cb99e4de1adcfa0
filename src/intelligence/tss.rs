// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Training Stress Score calculation

use crate::constants::load::SECONDS_PER_HOUR;
use crate::models::{ActivityRecord, Ftp};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ratio of representative power to FTP
pub fn intensity_factor(power: f64, ftp: f64) -> Option<f64> {
    if power.is_finite() && power > 0.0 && ftp.is_finite() && ftp > 0.0 {
        Some(power / ftp)
    } else {
        None
    }
}

/// Unrounded TSS: `hours × IF² × 100`, or 0 when any input is not positive
pub fn training_stress_score(duration_seconds: f64, power: f64, ftp: f64) -> f64 {
    if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
        return 0.0;
    }
    match intensity_factor(power, ftp) {
        Some(intensity) => duration_seconds / SECONDS_PER_HOUR * intensity * intensity * 100.0,
        None => 0.0,
    }
}

/// Load summary of one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLoad {
    pub activity_id: String,
    pub date: NaiveDate,
    pub duration_seconds: f64,
    /// Normalized power if known, else average power
    pub representative_power: Option<f64>,
    pub intensity_factor: Option<f64>,
    /// Rounded TSS as stored
    pub tss: u32,
}

/// TSS calculator bound to one athlete's FTP
#[derive(Debug, Clone, Copy)]
pub struct TssCalculator {
    ftp: Ftp,
}

impl TssCalculator {
    pub fn new(ftp: Ftp) -> Self {
        Self { ftp }
    }

    pub fn ftp(&self) -> Ftp {
        self.ftp
    }

    /// Rounded TSS for an activity; 0 when duration or power is missing
    pub fn activity_tss(&self, activity: &ActivityRecord) -> u32 {
        let power = activity.representative_power().unwrap_or(0.0);
        training_stress_score(activity.resolved_duration_seconds(), power, self.ftp.watts()).round() as u32
    }

    pub fn activity_load(&self, activity: &ActivityRecord, offset: &FixedOffset) -> ActivityLoad {
        let representative_power = activity.representative_power();
        ActivityLoad {
            activity_id: activity.id.clone(),
            date: activity.local_date(offset),
            duration_seconds: activity.resolved_duration_seconds(),
            representative_power,
            intensity_factor: representative_power
                .and_then(|p| intensity_factor(p, self.ftp.watts()))
                .map(|i| (i * 100.0).round() / 100.0),
            tss: self.activity_tss(activity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivitySummary;
    use chrono::{TimeZone, Utc};

    fn activity(duration: Option<f64>, avg: Option<f64>, np: Option<f64>) -> ActivityRecord {
        ActivityRecord {
            id: "t".to_string(),
            start_time: None,
            upload_date: Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
            duration_seconds: duration,
            avg_power: avg,
            normalized_power: np,
            summary: None,
            samples: Vec::new(),
        }
    }

    #[test]
    fn test_one_hour_at_ftp_is_100() {
        assert_eq!(training_stress_score(3600.0, 250.0, 250.0), 100.0);
    }

    #[test]
    fn test_non_positive_inputs_give_zero() {
        assert_eq!(training_stress_score(0.0, 200.0, 250.0), 0.0);
        assert_eq!(training_stress_score(3600.0, 0.0, 250.0), 0.0);
        assert_eq!(training_stress_score(3600.0, 200.0, 0.0), 0.0);
        assert_eq!(training_stress_score(-5.0, 200.0, 250.0), 0.0);
        assert_eq!(intensity_factor(200.0, 0.0), None);
    }

    #[test]
    fn test_average_power_tss() {
        let calc = TssCalculator::new(Ftp::new(250.0).unwrap());
        assert_eq!(calc.activity_tss(&activity(Some(3600.0), Some(200.0), None)), 64);
        assert_eq!(calc.activity_tss(&activity(Some(3600.0), Some(225.0), None)), 81);
    }

    #[test]
    fn test_prefers_normalized_power() {
        let calc = TssCalculator::new(Ftp::new(250.0).unwrap());
        // NP 250 for one hour is exactly 100 regardless of average power
        assert_eq!(calc.activity_tss(&activity(Some(3600.0), Some(200.0), Some(250.0))), 100);
    }

    #[test]
    fn test_uses_summary_fields() {
        let calc = TssCalculator::new(Ftp::new(200.0).unwrap());
        let mut record = activity(None, None, None);
        record.summary = Some(ActivitySummary {
            duration_seconds: Some(1800.0),
            avg_power: Some(200.0),
            normalized_power: None,
        });
        assert_eq!(calc.activity_tss(&record), 50);
    }

    #[test]
    fn test_missing_power_gives_zero() {
        let calc = TssCalculator::new(Ftp::new(250.0).unwrap());
        assert_eq!(calc.activity_tss(&activity(Some(3600.0), None, None)), 0);
    }

    #[test]
    fn test_activity_load_summary() {
        let calc = TssCalculator::new(Ftp::new(250.0).unwrap());
        let offset = FixedOffset::east_opt(0).unwrap();
        let load = calc.activity_load(&activity(Some(3600.0), Some(200.0), None), &offset);

        assert_eq!(load.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(load.intensity_factor, Some(0.8));
        assert_eq!(load.tss, 64);
    }
}
