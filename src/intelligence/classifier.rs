// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Training-style classification
//!
//! Nearest-archetype match over the (low, moderate, high) intensity split.
//! Deterministic: identical distributions always give identical results.

use super::zone_time::ZoneDistribution;
use super::zones::IntensityBucket;
use crate::config::ClassificationConfig;
use crate::constants::classification::{
    BASE_RATIO_SENTINEL, DISTANCE_PENALTY, HIIT, POLARIZED, PYRAMIDAL, THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Training intensity distribution archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingStyle {
    Polarized,
    Pyramidal,
    Threshold,
    #[serde(rename = "HIIT")]
    Hiit,
    Mixed,
}

impl TrainingStyle {
    /// Archetypes with a reference distribution, in tie-break order
    pub const ARCHETYPES: [TrainingStyle; 4] = [
        TrainingStyle::Polarized,
        TrainingStyle::Pyramidal,
        TrainingStyle::Threshold,
        TrainingStyle::Hiit,
    ];

    /// Reference (z1z2, z3z4, z5plus); `None` for `Mixed`
    pub fn reference(self) -> Option<IntensitySplit> {
        let [z1z2, z3z4, z5plus] = match self {
            TrainingStyle::Polarized => POLARIZED,
            TrainingStyle::Pyramidal => PYRAMIDAL,
            TrainingStyle::Threshold => THRESHOLD,
            TrainingStyle::Hiit => HIIT,
            TrainingStyle::Mixed => return None,
        };
        Some(IntensitySplit { z1z2, z3z4, z5plus })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrainingStyle::Polarized => "Polarized",
            TrainingStyle::Pyramidal => "Pyramidal",
            TrainingStyle::Threshold => "Threshold",
            TrainingStyle::Hiit => "HIIT",
            TrainingStyle::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for TrainingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent of time at low (Z1-Z2), moderate (Z3-Z4) and high (Z5+) intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensitySplit {
    pub z1z2: f64,
    pub z3z4: f64,
    pub z5plus: f64,
}

impl IntensitySplit {
    pub fn from_distribution(distribution: &ZoneDistribution) -> Self {
        let mut split = Self {
            z1z2: 0.0,
            z3z4: 0.0,
            z5plus: 0.0,
        };
        for (zone, percent) in distribution.iter() {
            match zone.bucket() {
                IntensityBucket::Low => split.z1z2 += percent,
                IntensityBucket::Moderate => split.z3z4 += percent,
                IntensityBucket::High => split.z5plus += percent,
            }
        }
        split
    }

    pub fn distance(&self, other: &IntensitySplit) -> f64 {
        ((self.z1z2 - other.z1z2).powi(2)
            + (self.z3z4 - other.z3z4).powi(2)
            + (self.z5plus - other.z5plus).powi(2))
        .sqrt()
    }

    /// Low-intensity time relative to everything harder
    pub fn base_ratio(&self) -> f64 {
        let harder = self.z3z4 + self.z5plus;
        if harder > 0.0 {
            self.z1z2 / harder
        } else if self.z1z2 > 0.0 {
            BASE_RATIO_SENTINEL
        } else {
            0.0
        }
    }
}

/// Score of the distribution against one archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeScore {
    pub archetype: TrainingStyle,
    pub distance: f64,
    pub score: f64,
}

/// Outcome of classifying one zone distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Best archetype, or `Mixed` when nothing fits well enough
    pub archetype: TrainingStyle,
    pub distribution: IntensitySplit,
    /// Score of the best archetype, even when reported as `Mixed`
    pub match_score: f64,
    pub base_ratio: f64,
    /// Every archetype's score in tie-break order
    pub scores: Vec<ArchetypeScore>,
}

/// Nearest-archetype classifier
#[derive(Debug, Clone, Copy)]
pub struct TrainingStyleClassifier {
    min_match_score: f64,
}

impl TrainingStyleClassifier {
    pub fn new(min_match_score: f64) -> Self {
        Self { min_match_score }
    }

    pub fn from_config(config: &ClassificationConfig) -> Self {
        Self::new(config.min_match_score)
    }

    pub fn classify(&self, distribution: &ZoneDistribution) -> ClassificationResult {
        let split = IntensitySplit::from_distribution(distribution);

        let scores: Vec<ArchetypeScore> = TrainingStyle::ARCHETYPES
            .iter()
            .filter_map(|&archetype| {
                archetype.reference().map(|reference| {
                    let distance = split.distance(&reference);
                    ArchetypeScore {
                        archetype,
                        distance,
                        score: (100.0 - DISTANCE_PENALTY * distance).max(0.0),
                    }
                })
            })
            .collect();

        // Earlier archetypes win ties
        let best = scores
            .iter()
            .fold(None::<&ArchetypeScore>, |best, candidate| match best {
                Some(b) if b.score >= candidate.score => Some(b),
                _ => Some(candidate),
            });

        let (archetype, match_score) = match best {
            Some(b) if b.score >= self.min_match_score => (b.archetype, b.score),
            Some(b) => (TrainingStyle::Mixed, b.score),
            None => (TrainingStyle::Mixed, 0.0),
        };

        ClassificationResult {
            archetype,
            distribution: IntensitySplit {
                z1z2: round1(split.z1z2),
                z3z4: round1(split.z3z4),
                z5plus: round1(split.z5plus),
            },
            match_score: round1(match_score),
            base_ratio: (split.base_ratio() * 100.0).round() / 100.0,
            scores,
        }
    }
}

impl Default for TrainingStyleClassifier {
    fn default() -> Self {
        Self::from_config(&ClassificationConfig::default())
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
