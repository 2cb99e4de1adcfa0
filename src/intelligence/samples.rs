// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sample track normalization
//!
//! Raw power samples arrive unordered and sometimes without timestamps.
//! Normalization drops untimed samples and sorts the rest chronologically.
//! Zero and negative power values are kept; consumers decide what counts.

use crate::models::PowerSample;
use chrono::{DateTime, Utc};
use tracing::debug;

/// A sample that survived normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub power: Option<f64>,
}

/// Elapsed time between two consecutive points, attributed to the leading one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub seconds: f64,
    /// Power of the leading sample
    pub power: Option<f64>,
}

/// Chronologically sorted, timestamped samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTrack {
    points: Vec<TrackPoint>,
}

impl NormalizedTrack {
    /// Normalize a raw sample list; empty input yields an empty track
    pub fn from_samples(raw: &[PowerSample]) -> Self {
        let mut points: Vec<TrackPoint> = raw
            .iter()
            .filter_map(|s| {
                s.timestamp.map(|timestamp| TrackPoint {
                    timestamp,
                    power: s.power,
                })
            })
            .collect();

        let dropped = raw.len() - points.len();
        if dropped > 0 {
            debug!(samples.dropped = dropped, "Dropped samples without timestamp");
        }

        // Stable sort keeps arrival order for equal timestamps
        points.sort_by_key(|p| p.timestamp);

        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Consecutive pairs usable for time integration.
    ///
    /// Pairs whose gap is non-positive or exceeds `pause_threshold_seconds`
    /// are skipped entirely.
    pub fn intervals(&self, pause_threshold_seconds: f64) -> impl Iterator<Item = Interval> + '_ {
        self.points.windows(2).filter_map(move |pair| {
            let seconds = elapsed_seconds(pair[0].timestamp, pair[1].timestamp);
            if seconds <= 0.0 || seconds > pause_threshold_seconds {
                return None;
            }
            Some(Interval {
                start: pair[0].timestamp,
                seconds,
                power: pair[0].power,
            })
        })
    }

    /// Number of consecutive pairs rejected by the gap policy
    pub fn excluded_gaps(&self, pause_threshold_seconds: f64) -> usize {
        self.points
            .windows(2)
            .filter(|pair| {
                let seconds = elapsed_seconds(pair[0].timestamp, pair[1].timestamp);
                seconds <= 0.0 || seconds > pause_threshold_seconds
            })
            .count()
    }
}

fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
