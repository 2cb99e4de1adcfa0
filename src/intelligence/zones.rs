// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Power zone table built from FTP (Coggan 7-zone model)
//!
//! Lookup only ever compares against the six zone ceilings, so every
//! non-negative wattage lands in exactly one zone and anything above the Z6
//! ceiling is Z7.

use crate::constants::zones::{MAX_PERCENT_FTP, MIN_PERCENT_FTP, ZONE_COUNT};
use crate::models::Ftp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Power training zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Z1,
    Z2,
    Z3,
    Z4,
    Z5,
    Z6,
    Z7,
}

/// Three-way grouping used for intensity distribution analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBucket {
    /// Z1 + Z2
    Low,
    /// Z3 + Z4
    Moderate,
    /// Z5 and above
    High,
}

impl Zone {
    pub const ALL: [Zone; ZONE_COUNT] = [
        Zone::Z1,
        Zone::Z2,
        Zone::Z3,
        Zone::Z4,
        Zone::Z5,
        Zone::Z6,
        Zone::Z7,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Z1 => "Z1",
            Zone::Z2 => "Z2",
            Zone::Z3 => "Z3",
            Zone::Z4 => "Z4",
            Zone::Z5 => "Z5",
            Zone::Z6 => "Z6",
            Zone::Z7 => "Z7",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Zone::Z1 => "Active Recovery",
            Zone::Z2 => "Endurance",
            Zone::Z3 => "Tempo",
            Zone::Z4 => "Threshold",
            Zone::Z5 => "VO2max",
            Zone::Z6 => "Anaerobic",
            Zone::Z7 => "Neuromuscular",
        }
    }

    pub fn bucket(self) -> IntensityBucket {
        match self {
            Zone::Z1 | Zone::Z2 => IntensityBucket::Low,
            Zone::Z3 | Zone::Z4 => IntensityBucket::Moderate,
            Zone::Z5 | Zone::Z6 | Zone::Z7 => IntensityBucket::High,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the zone table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub zone: Zone,
    pub min_percent_ftp: f64,
    pub max_percent_ftp: f64,
    /// Lowest whole watt in the zone (one above the previous ceiling)
    pub min_watts: u32,
    /// Highest whole watt in the zone; nominal for Z7
    pub max_watts: u32,
}

/// Ordered, gapless zone table in absolute watts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerZoneTable {
    pub ftp: Ftp,
    pub zones: [ZoneBounds; ZONE_COUNT],
}

impl PowerZoneTable {
    /// Build the table by scaling the percentage bounds by FTP, rounded to the nearest watt
    pub fn from_ftp(ftp: Ftp) -> Self {
        let ceilings: [u32; ZONE_COUNT] = std::array::from_fn(|i| percent_of(ftp, MAX_PERCENT_FTP[i]));

        let zones = std::array::from_fn(|i| ZoneBounds {
            zone: Zone::ALL[i],
            min_percent_ftp: MIN_PERCENT_FTP[i],
            max_percent_ftp: MAX_PERCENT_FTP[i],
            min_watts: if i == 0 { 0 } else { ceilings[i - 1] + 1 },
            max_watts: ceilings[i],
        });

        Self { ftp, zones }
    }

    /// Zone for a power value; negative or NaN input counts as zero watts
    pub fn zone_for(&self, watts: f64) -> Zone {
        let watts = watts.max(0.0);
        self.zones[..ZONE_COUNT - 1]
            .iter()
            .find(|bounds| watts <= f64::from(bounds.max_watts))
            .map(|bounds| bounds.zone)
            .unwrap_or(Zone::Z7)
    }

    pub fn bounds(&self, zone: Zone) -> &ZoneBounds {
        &self.zones[zone.index()]
    }
}

fn percent_of(ftp: Ftp, percent: f64) -> u32 {
    (ftp.watts() * percent / 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ftp: f64) -> PowerZoneTable {
        PowerZoneTable::from_ftp(Ftp::new(ftp).unwrap())
    }

    #[test]
    fn test_table_for_250w() {
        let table = table(250.0);
        let ceilings: Vec<u32> = table.zones.iter().map(|z| z.max_watts).collect();
        assert_eq!(ceilings, vec![138, 188, 225, 263, 300, 375, 750]);
        assert_eq!(table.bounds(Zone::Z1).min_watts, 0);
        assert_eq!(table.bounds(Zone::Z2).min_watts, 139);
        assert_eq!(table.bounds(Zone::Z7).min_watts, 376);
    }

    #[test]
    fn test_lookup_boundaries() {
        let table = table(250.0);
        assert_eq!(table.zone_for(0.0), Zone::Z1);
        assert_eq!(table.zone_for(138.0), Zone::Z1);
        assert_eq!(table.zone_for(138.4), Zone::Z2);
        assert_eq!(table.zone_for(200.0), Zone::Z3);
        assert_eq!(table.zone_for(225.0), Zone::Z3);
        assert_eq!(table.zone_for(226.0), Zone::Z4);
        assert_eq!(table.zone_for(375.0), Zone::Z6);
        assert_eq!(table.zone_for(376.0), Zone::Z7);
        assert_eq!(table.zone_for(5000.0), Zone::Z7);
        assert_eq!(table.zone_for(-20.0), Zone::Z1);
        assert_eq!(table.zone_for(f64::NAN), Zone::Z1);
    }

    #[test]
    fn test_every_integer_watt_maps_to_exactly_one_zone() {
        for ftp in [1.0, 57.0, 150.0, 249.5, 250.0, 333.0, 420.0] {
            let table = table(ftp);
            for watts in 0..=(ftp as u32 * 4) {
                let containing: Vec<Zone> = table
                    .zones
                    .iter()
                    .filter(|b| {
                        watts >= b.min_watts && (b.zone == Zone::Z7 || watts <= b.max_watts)
                    })
                    .map(|b| b.zone)
                    .collect();
                assert_eq!(containing.len(), 1, "ftp={} watts={}", ftp, watts);
                assert_eq!(containing[0], table.zone_for(f64::from(watts)));
            }
        }
    }

    #[test]
    fn test_ceilings_monotonic() {
        let table = table(333.0);
        assert!(table.zones.windows(2).all(|w| w[0].max_watts <= w[1].max_watts));
    }

    #[test]
    fn test_buckets() {
        assert_eq!(Zone::Z2.bucket(), IntensityBucket::Low);
        assert_eq!(Zone::Z4.bucket(), IntensityBucket::Moderate);
        assert_eq!(Zone::Z7.bucket(), IntensityBucket::High);
        assert_eq!(Zone::from_index(6), Some(Zone::Z7));
        assert_eq!(Zone::from_index(7), None);
    }
}
