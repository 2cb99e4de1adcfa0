// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Time-in-zone aggregation
//!
//! Per activity, time between consecutive samples is credited to the zone of
//! the leading sample's power. When that yields nothing, the whole duration is
//! credited to the zone of the average power. Across a set of activities the
//! per-activity results are summed, with a last-resort estimate from the mean
//! average power.

use super::samples::NormalizedTrack;
use super::zones::{PowerZoneTable, Zone};
use crate::constants::zones::ZONE_COUNT;
use crate::models::ActivityRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Seconds spent in each zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, f64>", try_from = "BTreeMap<String, f64>")]
pub struct ZoneOccupancy {
    seconds: [f64; ZONE_COUNT],
}

impl ZoneOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zone: Zone, seconds: f64) {
        self.seconds[zone.index()] += seconds;
    }

    pub fn seconds(&self, zone: Zone) -> f64 {
        self.seconds[zone.index()]
    }

    pub fn total(&self) -> f64 {
        self.seconds.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() <= 0.0
    }

    /// Zone-by-zone sum
    pub fn merge(&mut self, other: &ZoneOccupancy) {
        for (mine, theirs) in self.seconds.iter_mut().zip(other.seconds.iter()) {
            *mine += theirs;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, f64)> + '_ {
        Zone::ALL.iter().map(move |&zone| (zone, self.seconds(zone)))
    }

    /// Percent of time per zone, summing to 100; `None` when empty
    pub fn to_distribution(&self) -> Option<ZoneDistribution> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let raw = self.seconds.map(|s| s / total * 100.0);
        Some(ZoneDistribution::normalized(raw))
    }
}

/// Percentage of time per zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, f64>", try_from = "BTreeMap<String, f64>")]
pub struct ZoneDistribution {
    percentages: [f64; ZONE_COUNT],
}

impl ZoneDistribution {
    /// Build from arbitrary non-negative weights
    pub fn from_percentages(percentages: [f64; ZONE_COUNT]) -> Option<Self> {
        let total: f64 = percentages.iter().filter(|p| p.is_finite() && **p > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let raw = percentages.map(|p| if p.is_finite() && p > 0.0 { p / total * 100.0 } else { 0.0 });
        Some(Self::normalized(raw))
    }

    /// All time in one zone
    pub fn single_zone(zone: Zone) -> Self {
        let mut percentages = [0.0; ZONE_COUNT];
        percentages[zone.index()] = 100.0;
        Self { percentages }
    }

    /// Round to one decimal and push any rounding drift into the largest zone
    fn normalized(raw: [f64; ZONE_COUNT]) -> Self {
        let mut percentages = raw.map(round1);
        let drift = 100.0 - percentages.iter().sum::<f64>();
        if drift != 0.0 {
            let largest = largest_index(&percentages);
            percentages[largest] = round1(percentages[largest] + drift);
        }
        Self { percentages }
    }

    pub fn percent(&self, zone: Zone) -> f64 {
        self.percentages[zone.index()]
    }

    pub fn percentages(&self) -> &[f64; ZONE_COUNT] {
        &self.percentages
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, f64)> + '_ {
        Zone::ALL.iter().map(move |&zone| (zone, self.percent(zone)))
    }

    /// Distribution for charts: every zone at least `floor` percent, still summing to 100
    pub fn display_percentages(&self, floor: f64) -> ZoneDistribution {
        let mut percentages = self.percentages.map(|p| p.max(floor));
        let excess = percentages.iter().sum::<f64>() - 100.0;
        if excess > 0.0 {
            let largest = largest_index(&percentages);
            percentages[largest] = round1(percentages[largest] - excess);
        }
        ZoneDistribution { percentages }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn largest_index(values: &[f64; ZONE_COUNT]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > values[best] { i } else { best })
}

fn to_zone_map(values: [f64; ZONE_COUNT]) -> BTreeMap<String, f64> {
    Zone::ALL
        .iter()
        .map(|zone| (zone.as_str().to_string(), values[zone.index()]))
        .collect()
}

fn from_zone_map(map: BTreeMap<String, f64>) -> Result<[f64; ZONE_COUNT], String> {
    let mut values = [0.0; ZONE_COUNT];
    for (key, value) in map {
        let zone = Zone::ALL
            .iter()
            .find(|z| z.as_str() == key)
            .ok_or_else(|| format!("unknown zone key: {}", key))?;
        values[zone.index()] = value;
    }
    Ok(values)
}

impl From<ZoneOccupancy> for BTreeMap<String, f64> {
    fn from(occupancy: ZoneOccupancy) -> Self {
        to_zone_map(occupancy.seconds)
    }
}

impl TryFrom<BTreeMap<String, f64>> for ZoneOccupancy {
    type Error = String;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        from_zone_map(map).map(|seconds| Self { seconds })
    }
}

impl From<ZoneDistribution> for BTreeMap<String, f64> {
    fn from(distribution: ZoneDistribution) -> Self {
        to_zone_map(distribution.percentages)
    }
}

impl TryFrom<BTreeMap<String, f64>> for ZoneDistribution {
    type Error = String;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let percentages = from_zone_map(map)?;
        if let Some(bad) = percentages.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(format!("invalid zone percentage: {}", bad));
        }
        Self::from_percentages(percentages).ok_or_else(|| "zone distribution is empty".to_string())
    }
}

/// Where an activity's occupancy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancySource {
    /// Integrated from the sample track
    Samples,
    /// Whole duration credited to the average-power zone
    AveragePower,
    /// Neither samples nor average power were usable
    Unavailable,
}

/// Zone occupancy of a single activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOccupancy {
    pub activity_id: String,
    pub occupancy: ZoneOccupancy,
    /// Seconds accepted by the gap policy, whatever their power
    pub integrated_seconds: f64,
    pub source: OccupancySource,
}

/// Computes zone occupancy against one zone table
pub struct ZoneTimeAggregator<'a> {
    table: &'a PowerZoneTable,
    pause_threshold_seconds: f64,
}

impl<'a> ZoneTimeAggregator<'a> {
    pub fn new(table: &'a PowerZoneTable, pause_threshold_seconds: f64) -> Self {
        Self {
            table,
            pause_threshold_seconds,
        }
    }

    /// Occupancy of one activity, falling back to average power when the
    /// sample track yields no zone time.
    ///
    /// Integration stops once the activity duration is used up, so zone time
    /// never exceeds integrated time, which never exceeds the duration.
    pub fn for_activity(&self, activity: &ActivityRecord) -> ActivityOccupancy {
        let duration = activity.resolved_duration_seconds();
        let budget = if duration > 0.0 { duration } else { f64::INFINITY };

        let track = NormalizedTrack::from_samples(&activity.samples);
        let mut occupancy = ZoneOccupancy::new();
        let mut integrated_seconds = 0.0;

        for interval in track.intervals(self.pause_threshold_seconds) {
            let remaining = budget - integrated_seconds;
            if remaining <= 0.0 {
                break;
            }
            let seconds = interval.seconds.min(remaining);
            integrated_seconds += seconds;

            if let Some(power) = interval.power.filter(|p| p.is_finite() && *p > 0.0) {
                occupancy.add(self.table.zone_for(power), seconds);
            }
        }

        if !track.is_empty() {
            let excluded = track.excluded_gaps(self.pause_threshold_seconds);
            if excluded > 0 {
                debug!(
                    activity.id = %activity.id,
                    gaps.excluded = excluded,
                    "Excluded sample gaps from integration"
                );
            }
        }

        if !occupancy.is_empty() {
            return ActivityOccupancy {
                activity_id: activity.id.clone(),
                occupancy,
                integrated_seconds,
                source: OccupancySource::Samples,
            };
        }

        match activity.resolved_avg_power() {
            Some(avg_power) if duration > 0.0 => {
                let zone = self.table.zone_for(avg_power);
                debug!(
                    activity.id = %activity.id,
                    avg_power,
                    zone = %zone,
                    "No usable samples, crediting full duration to average-power zone"
                );
                let mut occupancy = ZoneOccupancy::new();
                occupancy.add(zone, duration);
                ActivityOccupancy {
                    activity_id: activity.id.clone(),
                    occupancy,
                    integrated_seconds: duration,
                    source: OccupancySource::AveragePower,
                }
            }
            _ => ActivityOccupancy {
                activity_id: activity.id.clone(),
                occupancy,
                integrated_seconds,
                source: OccupancySource::Unavailable,
            },
        }
    }

    /// Per-activity occupancy plus the set-level sum and distribution,
    /// computing each activity once.
    ///
    /// Activities are summed in (timestamp, id) order so the floating-point
    /// result does not depend on input order. If the summed occupancy is
    /// empty but some activity reports average power, the mean of those
    /// averages decides a single zone.
    pub fn summarize(&self, activities: &[ActivityRecord]) -> ZoneSummary {
        let per_activity: Vec<ActivityOccupancy> =
            activities.iter().map(|a| self.for_activity(a)).collect();
        let order = canonical_indices(activities);

        let mut occupancy = ZoneOccupancy::new();
        for &index in &order {
            occupancy.merge(&per_activity[index].occupancy);
        }

        let distribution = occupancy
            .to_distribution()
            .or_else(|| self.mean_power_distribution(activities, &order));

        ZoneSummary {
            per_activity,
            occupancy,
            distribution,
        }
    }

    /// Zone-by-zone sum over a set of activities
    pub fn aggregate_occupancy(&self, activities: &[ActivityRecord]) -> ZoneOccupancy {
        self.summarize(activities).occupancy
    }

    /// Percent-of-time distribution over a set of activities
    pub fn aggregate_distribution(&self, activities: &[ActivityRecord]) -> Option<ZoneDistribution> {
        self.summarize(activities).distribution
    }

    fn mean_power_distribution(&self, activities: &[ActivityRecord], order: &[usize]) -> Option<ZoneDistribution> {
        let powers: Vec<f64> = order
            .iter()
            .filter_map(|&index| activities[index].resolved_avg_power())
            .collect();
        if powers.is_empty() {
            return None;
        }

        let mean = powers.iter().sum::<f64>() / powers.len() as f64;
        let zone = self.table.zone_for(mean);
        debug!(mean_power = mean, zone = %zone, "Using mean average power for set distribution");
        Some(ZoneDistribution::single_zone(zone))
    }
}

/// Zone time of a set of activities
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    /// In input order
    pub per_activity: Vec<ActivityOccupancy>,
    pub occupancy: ZoneOccupancy,
    pub distribution: Option<ZoneDistribution>,
}

fn canonical_indices(activities: &[ActivityRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..activities.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&activities[a], &activities[b]);
        a.resolved_timestamp()
            .cmp(&b.resolved_timestamp())
            .then_with(|| a.id.cmp(&b.id))
    });
    order
}
