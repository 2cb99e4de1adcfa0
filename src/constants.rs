// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed model parameters for the analytics engine, plus the environment
//! variables the surrounding tooling reads.

/// Power zone model (Coggan 7-zone, percent of FTP)
pub mod zones {
    /// Number of power zones
    pub const ZONE_COUNT: usize = 7;

    /// Inclusive lower bound of each zone as a percentage of FTP
    pub const MIN_PERCENT_FTP: [f64; ZONE_COUNT] = [0.0, 56.0, 76.0, 91.0, 106.0, 121.0, 151.0];

    /// Inclusive upper bound of each zone as a percentage of FTP.
    /// Z7 is open-ended; 300% stands in for "infinite".
    pub const MAX_PERCENT_FTP: [f64; ZONE_COUNT] = [55.0, 75.0, 90.0, 105.0, 120.0, 150.0, 300.0];
}

/// Sample integration and training-load parameters
pub mod load {
    /// Gaps longer than this are treated as a device pause, not as riding time
    pub const PAUSE_THRESHOLD_SECONDS: f64 = 300.0;

    /// Time constant of the Fitness (CTL) moving average
    pub const FITNESS_TIME_CONSTANT_DAYS: u32 = 42;

    /// Time constant of the Fatigue (ATL) moving average
    pub const FATIGUE_TIME_CONSTANT_DAYS: u32 = 7;

    pub const SECONDS_PER_HOUR: f64 = 3600.0;

    /// Lookback presets accepted for trend windows
    pub const LOOKBACK_PRESETS_DAYS: [u32; 6] = [7, 30, 90, 180, 365, 730];
}

/// Training-style classification parameters
pub mod classification {
    /// Below this score the best archetype is reported as `Mixed`
    pub const MIN_MATCH_SCORE: f64 = 50.0;

    /// Score lost per percentage point of Euclidean distance
    pub const DISTANCE_PENALTY: f64 = 2.0;

    /// Base ratio reported when there is low-intensity time but nothing above it
    pub const BASE_RATIO_SENTINEL: f64 = 999.0;

    /// Smallest percentage a zone is drawn with in charts
    pub const DISPLAY_FLOOR_PERCENT: f64 = 0.1;

    /// Reference distributions as (z1z2, z3z4, z5plus) percentages
    pub const POLARIZED: [f64; 3] = [80.0, 5.0, 15.0];
    pub const PYRAMIDAL: [f64; 3] = [75.0, 20.0, 5.0];
    pub const THRESHOLD: [f64; 3] = [50.0, 40.0, 10.0];
    pub const HIIT: [f64; 3] = [50.0, 10.0, 40.0];
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Environment variable naming an engine config file
    pub const CONFIG_PATH_VAR: &str = "LOAD_ENGINE_CONFIG";

    /// Default config file looked up in the working directory
    pub const DEFAULT_CONFIG_FILE: &str = "load_engine.toml";

    /// Service name used in structured logs
    pub const SERVICE_NAME: &str = "training-load-engine";

    /// Get the engine config path from environment
    pub fn config_path() -> Option<String> {
        env::var(CONFIG_PATH_VAR).ok()
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}
