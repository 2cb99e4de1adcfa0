// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Calendar-day and calendar-week load rollups

use super::tss::{ActivityLoad, TssCalculator};
use crate::constants::load::SECONDS_PER_HOUR;
use crate::models::ActivityRecord;
use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed TSS of one calendar day that had at least one activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    pub tss: f64,
}

impl DailyLoad {
    /// Locale-independent `yyyy-MM-dd` key
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Training totals of one Monday-based week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyLoad {
    pub week_start: NaiveDate,
    pub total_tss: f64,
    pub activity_count: u32,
    pub total_duration_hours: f64,
}

/// Groups activities by local calendar day
#[derive(Debug, Clone, Copy)]
pub struct DailyLoadAggregator {
    calculator: TssCalculator,
    offset: FixedOffset,
}

impl DailyLoadAggregator {
    pub fn new(calculator: TssCalculator, offset: FixedOffset) -> Self {
        Self { calculator, offset }
    }

    /// Per-activity load summaries, in input order
    pub fn activity_loads(&self, activities: &[ActivityRecord]) -> Vec<ActivityLoad> {
        activities
            .iter()
            .map(|a| self.calculator.activity_load(a, &self.offset))
            .collect()
    }

    /// Daily sums, ordered by date
    pub fn aggregate(&self, activities: &[ActivityRecord]) -> Vec<DailyLoad> {
        daily_from_activity_loads(&self.activity_loads(activities))
    }
}

/// Sum already computed activity loads per day
pub fn daily_from_activity_loads(loads: &[ActivityLoad]) -> Vec<DailyLoad> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for load in loads {
        *by_day.entry(load.date).or_insert(0.0) += f64::from(load.tss);
    }
    by_day
        .into_iter()
        .map(|(date, tss)| DailyLoad { date, tss })
        .collect()
}

/// Weekly totals, ordered by week
pub fn weekly_from_activity_loads(loads: &[ActivityLoad]) -> Vec<WeeklyLoad> {
    let mut by_week: BTreeMap<NaiveDate, WeeklyLoad> = BTreeMap::new();
    for load in loads {
        let week_start = week_start(load.date);
        let week = by_week.entry(week_start).or_insert(WeeklyLoad {
            week_start,
            total_tss: 0.0,
            activity_count: 0,
            total_duration_hours: 0.0,
        });
        week.total_tss += f64::from(load.tss);
        week.activity_count += 1;
        week.total_duration_hours += load.duration_seconds / SECONDS_PER_HOUR;
    }
    by_week.into_values().collect()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
