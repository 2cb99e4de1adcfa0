// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Training-load and power-zone analytics over a finite list of activities.
//!
//! Data flows one way: samples are normalized, integrated into zone time,
//! activities are scored (TSS), summed per day and smoothed into
//! Fitness/Fatigue/Form curves. Classification consumes zone time
//! independently of the load path.
//!
//! Every entry point is a pure function of `(activities, profile, window,
//! today)`; nothing is cached or persisted here. A missing or invalid FTP is
//! not an error: FTP-dependent outputs are simply empty.

use crate::config::EngineConfig;
use crate::logging::AnalyticsLogger;
use crate::models::{ActivityRecord, AthleteProfile, Ftp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub mod classifier;
pub mod daily_load;
pub mod samples;
pub mod trend;
pub mod tss;
pub mod zone_time;
pub mod zones;

pub use classifier::{ClassificationResult, IntensitySplit, TrainingStyle, TrainingStyleClassifier};
pub use daily_load::{DailyLoad, DailyLoadAggregator, WeeklyLoad};
pub use samples::NormalizedTrack;
pub use trend::{EmaSeed, LookbackWindow, TrendEngine, TrendPoint};
pub use tss::{ActivityLoad, TssCalculator};
pub use zone_time::{
    ActivityOccupancy, OccupancySource, ZoneDistribution, ZoneOccupancy, ZoneSummary, ZoneTimeAggregator,
};
pub use zones::{PowerZoneTable, Zone};

/// Everything the chart and narration layers need for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// The "today" the window ends on
    pub generated_for: NaiveDate,
    pub window_days: u32,
    pub ftp: Option<Ftp>,
    /// Passed through from the profile
    pub weight_kg: Option<f64>,
    pub ftp_watts_per_kg: Option<f64>,
    pub zone_table: Option<PowerZoneTable>,
    pub activities: Vec<ActivityLoad>,
    pub activity_zones: Vec<ActivityOccupancy>,
    pub daily_loads: Vec<DailyLoad>,
    pub weekly_loads: Vec<WeeklyLoad>,
    pub trend: Vec<TrendPoint>,
    pub zone_occupancy: Option<ZoneOccupancy>,
    pub zone_distribution: Option<ZoneDistribution>,
    /// `zone_distribution` with the chart display floor applied
    pub display_distribution: Option<ZoneDistribution>,
    pub classification: Option<ClassificationResult>,
    /// Last point of `trend`
    pub current_form: Option<TrendPoint>,
}

impl AnalyticsReport {
    /// Report for a profile without a usable FTP
    fn not_computable(profile: &AthleteProfile, window: LookbackWindow, today: NaiveDate) -> Self {
        Self {
            generated_for: today,
            window_days: window.days(),
            ftp: None,
            weight_kg: profile.weight_kg,
            ftp_watts_per_kg: None,
            zone_table: None,
            activities: Vec::new(),
            activity_zones: Vec::new(),
            daily_loads: Vec::new(),
            weekly_loads: Vec::new(),
            trend: Vec::new(),
            zone_occupancy: None,
            zone_distribution: None,
            display_distribution: None,
            classification: None,
            current_form: None,
        }
    }

    /// Whether FTP-dependent analytics were available
    pub fn is_computable(&self) -> bool {
        self.ftp.is_some()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Entry point tying the analytics components together
#[derive(Debug, Clone, Default)]
pub struct TrainingLoadEngine {
    config: EngineConfig,
}

impl TrainingLoadEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn zone_table(&self, ftp: Ftp) -> PowerZoneTable {
        PowerZoneTable::from_ftp(ftp)
    }

    /// Zone occupancy of one activity
    pub fn activity_occupancy(&self, activity: &ActivityRecord, ftp: Ftp) -> ActivityOccupancy {
        let table = self.zone_table(ftp);
        self.aggregator(&table).for_activity(activity)
    }

    /// Summed zone occupancy of a set of activities
    pub fn zone_occupancy(&self, activities: &[ActivityRecord], ftp: Ftp) -> ZoneOccupancy {
        let table = self.zone_table(ftp);
        self.aggregator(&table).aggregate_occupancy(activities)
    }

    /// Percent-of-time distribution of a set of activities
    pub fn zone_distribution(&self, activities: &[ActivityRecord], ftp: Ftp) -> Option<ZoneDistribution> {
        let table = self.zone_table(ftp);
        self.aggregator(&table).aggregate_distribution(activities)
    }

    /// Training-style classification of a set of activities
    pub fn classify(&self, activities: &[ActivityRecord], ftp: Ftp) -> Option<ClassificationResult> {
        self.zone_distribution(activities, ftp)
            .map(|distribution| self.classifier().classify(&distribution))
    }

    /// Rounded TSS of one activity
    pub fn activity_tss(&self, activity: &ActivityRecord, ftp: Ftp) -> u32 {
        TssCalculator::new(ftp).activity_tss(activity)
    }

    /// Daily TSS sums, ordered by date
    pub fn daily_loads(&self, activities: &[ActivityRecord], ftp: Ftp) -> Vec<DailyLoad> {
        self.daily_aggregator(ftp).aggregate(activities)
    }

    /// Fitness/Fatigue/Form for each day of the window
    pub fn trend(
        &self,
        activities: &[ActivityRecord],
        ftp: Ftp,
        window: LookbackWindow,
        today: NaiveDate,
    ) -> Vec<TrendPoint> {
        let daily = self.daily_loads(activities, ftp);
        self.trend_engine().series(&daily, window, today)
    }

    /// Full analytics run for one request
    pub fn analyze(
        &self,
        activities: &[ActivityRecord],
        profile: &AthleteProfile,
        window: LookbackWindow,
        today: NaiveDate,
    ) -> AnalyticsReport {
        let started = Instant::now();

        let Some(ftp) = profile.ftp() else {
            AnalyticsLogger::log_missing_ftp(activities.len(), profile.ftp);
            return AnalyticsReport::not_computable(profile, window, today);
        };

        let table = self.zone_table(ftp);
        let aggregator = self.aggregator(&table);
        let daily_aggregator = self.daily_aggregator(ftp);

        let activity_loads = daily_aggregator.activity_loads(activities);
        let daily_loads = daily_load::daily_from_activity_loads(&activity_loads);
        let weekly_loads = daily_load::weekly_from_activity_loads(&activity_loads);
        let trend = self.trend_engine().series(&daily_loads, window, today);

        let ZoneSummary {
            per_activity: activity_zones,
            occupancy: zone_occupancy,
            distribution: zone_distribution,
        } = aggregator.summarize(activities);
        let display_distribution = zone_distribution
            .map(|d| d.display_percentages(self.config.classification.display_floor_percent));
        let classification = zone_distribution.map(|d| self.classifier().classify(&d));

        let current_form = trend.last().copied();

        AnalyticsLogger::log_analysis_run(
            activities.len(),
            window.days(),
            classification.as_ref().map(|c| c.archetype),
            current_form.map(|p| p.form),
            started.elapsed().as_millis() as u64,
        );

        AnalyticsReport {
            generated_for: today,
            window_days: window.days(),
            ftp: Some(ftp),
            weight_kg: profile.weight_kg,
            ftp_watts_per_kg: profile.ftp_watts_per_kg(),
            zone_table: Some(table.clone()),
            activities: activity_loads,
            activity_zones,
            daily_loads,
            weekly_loads,
            trend,
            zone_occupancy: (!zone_occupancy.is_empty()).then_some(zone_occupancy),
            zone_distribution,
            display_distribution,
            classification,
            current_form,
        }
    }

    fn aggregator<'a>(&self, table: &'a PowerZoneTable) -> ZoneTimeAggregator<'a> {
        ZoneTimeAggregator::new(table, self.config.load.pause_threshold_seconds)
    }

    fn daily_aggregator(&self, ftp: Ftp) -> DailyLoadAggregator {
        DailyLoadAggregator::new(TssCalculator::new(ftp), self.config.load.utc_offset())
    }

    fn trend_engine(&self) -> TrendEngine {
        TrendEngine::from_config(&self.config.load)
    }

    fn classifier(&self) -> TrainingStyleClassifier {
        TrainingStyleClassifier::from_config(&self.config.classification)
    }
}
