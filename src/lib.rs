// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Training Load Engine
//!
//! Power-zone and training-load analytics for cycling activities.
//! Given a list of activities and the athlete's FTP, the engine produces the
//! numbers a training dashboard charts and narrates.
//!
//! ## Features
//!
//! - **Zone tables**: Seven Coggan power zones derived from FTP
//! - **Zone time**: Seconds per zone from power samples, with pause handling
//! - **Training Stress Score**: Per activity, summed per calendar day
//! - **Fitness / Fatigue / Form**: Exponential moving averages over 42 and 7 days
//! - **Training style**: Polarized, Pyramidal, Threshold, HIIT or Mixed
//!
//! ## Architecture
//!
//! - **Models**: Activity records, power samples and the athlete profile
//! - **Intelligence**: The analytics pipeline and its `TrainingLoadEngine` facade
//! - **Config**: TOML configuration for tunable constants
//! - **Logging**: Structured tracing output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use training_load_engine::config::EngineConfig;
//! use training_load_engine::intelligence::{LookbackWindow, TrainingLoadEngine};
//! use training_load_engine::models::{ActivityRecord, AthleteProfile};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load(None)?;
//!     let engine = TrainingLoadEngine::new(config);
//!
//!     let activities: Vec<ActivityRecord> =
//!         serde_json::from_str(&std::fs::read_to_string("activities.json")?)?;
//!     let profile = AthleteProfile::new(Some(250.0), Some(70.0));
//!     let today = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap_or_default();
//!
//!     let report = engine.analyze(&activities, &profile, LookbackWindow::Quarter, today);
//!     if let Some(form) = report.current_form {
//!         println!("Fitness {} / Fatigue {} / Form {}", form.fitness, form.fatigue, form.form);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Activity and athlete data models
pub mod models;

/// Configuration management and persistence
pub mod config;

/// Analytics constants and configuration values
pub mod constants;

/// Input validation errors
pub mod errors;

/// Zone, load and trend analytics
pub mod intelligence;

/// Structured logging
pub mod logging;
