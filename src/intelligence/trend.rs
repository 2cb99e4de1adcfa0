// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fitness / Fatigue / Form trend curves
//!
//! For every day D of the window, each moving average is rebuilt from the
//! daily loads inside the trailing N days of D (N = 42 for Fitness, 7 for
//! Fatigue). Only days that actually carry load are steps of the recurrence
//! `value = value × (1 − α) + tss × α` with `α = 1 − e^(−1/N)`; rest days are
//! not zero-filled.

use super::daily_load::DailyLoad;
use crate::config::LoadConfig;
use crate::errors::AnalyticsError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// How each day's moving average is initialised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSeed {
    /// Start from the oldest load in the trailing window
    #[default]
    FirstValue,
    /// Start from zero while no load predates the trailing window, so a new
    /// athlete builds up gradually; with earlier history, seed as `FirstValue`
    Zero,
}

/// Accepted trend window presets, always ending today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LookbackWindow {
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
    TwoYears,
}

impl LookbackWindow {
    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::HalfYear => 180,
            Self::Year => 365,
            Self::TwoYears => 730,
        }
    }

    /// First day of the window; the window holds exactly `days()` days ending at `today`
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(i64::from(self.days()) - 1)
    }

    /// Every calendar day of the window, oldest first
    pub fn dates(self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
        let start = self.start_date(today);
        (0..i64::from(self.days())).map(move |offset| start + Duration::days(offset))
    }
}

impl TryFrom<u32> for LookbackWindow {
    type Error = AnalyticsError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(Self::Week),
            30 => Ok(Self::Month),
            90 => Ok(Self::Quarter),
            180 => Ok(Self::HalfYear),
            365 => Ok(Self::Year),
            730 => Ok(Self::TwoYears),
            other => Err(AnalyticsError::UnsupportedLookback(other)),
        }
    }
}

impl From<LookbackWindow> for u32 {
    fn from(window: LookbackWindow) -> Self {
        window.days()
    }
}

/// Fitness, Fatigue and Form of one calendar day, rounded to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub fitness: f64,
    pub fatigue: f64,
    /// Always `fitness − fatigue`
    pub form: f64,
}

/// EMA smoothing factor for a time constant in days
pub fn smoothing_factor(time_constant_days: u32) -> f64 {
    1.0 - (-1.0 / f64::from(time_constant_days)).exp()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Builds trend curves from daily loads
#[derive(Debug, Clone, Copy)]
pub struct TrendEngine {
    fitness_days: u32,
    fatigue_days: u32,
    seed: EmaSeed,
}

impl TrendEngine {
    pub fn new(fitness_days: u32, fatigue_days: u32, seed: EmaSeed) -> Self {
        Self {
            fitness_days: fitness_days.max(1),
            fatigue_days: fatigue_days.max(1),
            seed,
        }
    }

    pub fn from_config(config: &LoadConfig) -> Self {
        Self::new(
            config.fitness_time_constant_days,
            config.fatigue_time_constant_days,
            config.ema_seed,
        )
    }

    /// Unrounded moving average at `day` over the trailing `time_constant_days`
    pub fn moving_average(&self, daily: &[DailyLoad], day: NaiveDate, time_constant_days: u32) -> f64 {
        let window_start = day - Duration::days(i64::from(time_constant_days));
        let mut window: Vec<&DailyLoad> = daily
            .iter()
            .filter(|d| d.date <= day && d.date > window_start)
            .collect();
        window.sort_by_key(|d| d.date);

        let cold_start = match self.seed {
            EmaSeed::FirstValue => false,
            EmaSeed::Zero => !daily.iter().any(|d| d.date <= window_start),
        };

        let alpha = smoothing_factor(time_constant_days);
        let (mut value, rest) = match window.split_first() {
            None => return 0.0,
            Some(_) if cold_start => (0.0, window.as_slice()),
            Some((first, rest)) => (first.tss, rest),
        };

        for load in rest {
            value = value * (1.0 - alpha) + load.tss * alpha;
        }
        value
    }

    pub fn point_for(&self, daily: &[DailyLoad], day: NaiveDate) -> TrendPoint {
        let fitness = round1(self.moving_average(daily, day, self.fitness_days));
        let fatigue = round1(self.moving_average(daily, day, self.fatigue_days));
        TrendPoint {
            date: day,
            fitness,
            fatigue,
            form: round1(fitness - fatigue),
        }
    }

    /// One point per calendar day of the window, rest days included
    pub fn series(&self, daily: &[DailyLoad], window: LookbackWindow, today: NaiveDate) -> Vec<TrendPoint> {
        window
            .dates(today)
            .map(|day| self.point_for(daily, day))
            .collect()
    }
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self::from_config(&LoadConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::load::LOOKBACK_PRESETS_DAYS;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    fn load(n: i64, tss: f64) -> DailyLoad {
        DailyLoad { date: day(n), tss }
    }

    #[test]
    fn test_smoothing_factor() {
        assert!((smoothing_factor(7) - 0.133_122).abs() < 1e-6);
        assert!((smoothing_factor(42) - 0.023_528).abs() < 1e-6);
    }

    #[test]
    fn test_lookback_presets() {
        for days in LOOKBACK_PRESETS_DAYS {
            let window = LookbackWindow::try_from(days).unwrap();
            assert_eq!(window.days(), days);
        }
        assert!(LookbackWindow::try_from(45).is_err());
    }

    #[test]
    fn test_window_dates_end_today() {
        let today = day(100);
        let dates: Vec<_> = LookbackWindow::Week.dates(today).collect();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], day(94));
        assert_eq!(*dates.last().unwrap(), today);
    }

    #[test]
    fn test_no_load_is_zero() {
        let engine = TrendEngine::default();
        let point = engine.point_for(&[], day(0));
        assert_eq!((point.fitness, point.fatigue, point.form), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_first_value_seed() {
        let engine = TrendEngine::default();
        let point = engine.point_for(&[load(0, 90.0)], day(0));
        assert_eq!(point.fitness, 90.0);
        assert_eq!(point.fatigue, 90.0);
        assert_eq!(point.form, 0.0);
    }

    #[test]
    fn test_rest_days_are_not_steps() {
        let engine = TrendEngine::default();
        let daily = vec![load(0, 100.0), load(3, 50.0)];

        // One step from the seed regardless of the two rest days in between
        let alpha = smoothing_factor(7);
        let expected = 100.0 * (1.0 - alpha) + 50.0 * alpha;
        let point = engine.point_for(&daily, day(3));
        assert_eq!(point.fatigue, round1(expected));
        assert_eq!(point.fatigue, 93.3);
    }

    #[test]
    fn test_window_is_resliced_per_day() {
        let engine = TrendEngine::default();
        let daily = vec![load(0, 100.0)];

        // Day 0 is still inside the 7-day window on day 6, gone on day 7
        assert_eq!(engine.point_for(&daily, day(6)).fatigue, 100.0);
        let day7 = engine.point_for(&daily, day(7));
        assert_eq!(day7.fatigue, 0.0);
        assert_eq!(day7.fitness, 100.0);
        assert_eq!(day7.form, 100.0);
        assert_eq!(engine.point_for(&daily, day(42)).fitness, 0.0);
    }

    #[test]
    fn test_future_loads_ignored() {
        let engine = TrendEngine::default();
        let daily = vec![load(0, 50.0), load(5, 500.0)];
        assert_eq!(engine.point_for(&daily, day(4)).fatigue, 50.0);
    }

    #[test]
    fn test_constant_load_converges() {
        let engine = TrendEngine::default();
        let k = 80.0;
        let daily: Vec<_> = (0..5 * 42).map(|n| load(n, k)).collect();

        let point = engine.point_for(&daily, day(5 * 42 - 1));
        assert!((point.fitness - k).abs() <= k * 0.01);
        assert!((point.fatigue - k).abs() <= k * 0.01);
    }

    #[test]
    fn test_zero_seed_builds_up() {
        let engine = TrendEngine::new(42, 7, EmaSeed::Zero);
        let daily: Vec<_> = (0..5).map(|n| load(n, 81.0)).collect();

        let point = engine.point_for(&daily, day(4));
        assert!(point.fatigue > point.fitness);
        assert!(point.form < 0.0);
        assert!(point.fatigue < 81.0);
    }

    #[test]
    fn test_zero_seed_converges_with_history() {
        let engine = TrendEngine::new(42, 7, EmaSeed::Zero);
        let k = 80.0;
        let daily: Vec<_> = (0..5 * 42).map(|n| load(n, k)).collect();

        let point = engine.point_for(&daily, day(5 * 42 - 1));
        assert!((point.fitness - k).abs() <= k * 0.01);
        assert!((point.fatigue - k).abs() <= k * 0.01);
    }

    #[test]
    fn test_zero_seed_cold_start_ends_once_history_predates_window() {
        let engine = TrendEngine::new(42, 7, EmaSeed::Zero);
        let daily: Vec<_> = (0..10).map(|n| load(n, 70.0)).collect();

        let alpha = smoothing_factor(7);
        // Day 6: everything is inside the window, built up from zero
        let expected = 70.0 * (1.0 - (1.0 - alpha).powi(7));
        assert_eq!(engine.point_for(&daily, day(6)).fatigue, round1(expected));
        // Day 7: day 0 lies before the window, so the window seeds from its first load
        assert_eq!(engine.point_for(&daily, day(7)).fatigue, 70.0);
    }

    #[test]
    fn test_series_covers_window_with_form_identity() {
        let engine = TrendEngine::default();
        let daily = vec![load(80, 120.0), load(85, 40.0), load(89, 75.0)];

        let series = engine.series(&daily, LookbackWindow::Month, day(89));
        assert_eq!(series.len(), 30);
        for point in &series {
            assert_eq!(point.form, ((point.fitness - point.fatigue) * 10.0).round() / 10.0);
        }
        // Rest days before the first load are present with zero values
        assert_eq!(series[0].fitness, 0.0);
    }
}
