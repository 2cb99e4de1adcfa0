// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::fs;
use tracing::info;
use training_load_engine::config::EngineConfig;
use training_load_engine::intelligence::{LookbackWindow, TrainingLoadEngine};
use training_load_engine::logging;
use training_load_engine::models::{ActivityRecord, AthleteProfile};

#[derive(Parser, Debug)]
#[command(name = "load-report")]
#[command(about = "Compute zone, load and fitness/fatigue/form analytics for a set of activities")]
struct Args {
    /// JSON file holding an array of activity records
    #[arg(short, long)]
    activities: String,

    /// Functional threshold power in watts
    #[arg(long)]
    ftp: Option<f64>,

    /// Athlete weight in kilograms
    #[arg(long)]
    weight: Option<f64>,

    /// Trend window in days (7, 30, 90, 180, 365 or 730)
    #[arg(short, long, default_value = "90")]
    days: u32,

    /// Last day of the trend window (YYYY-MM-DD), defaults to the local date
    #[arg(long)]
    today: Option<String>,

    /// Engine configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_from_env()?;

    let args = Args::parse();

    let window = LookbackWindow::try_from(args.days)?;
    let today = match args.today.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today date: {}", raw))?,
        None => Local::now().date_naive(),
    };

    let config = EngineConfig::load(args.config)?;
    let activities = read_activities(&args.activities)?;
    info!(
        "Loaded {} activities from {}, window {} days ending {}",
        activities.len(),
        args.activities,
        window.days(),
        today
    );

    let profile = AthleteProfile::new(args.ftp, args.weight);
    let report = TrainingLoadEngine::new(config).analyze(&activities, &profile, window, today);

    let output = if args.pretty {
        report.to_json()?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}

fn read_activities(path: &str) -> Result<Vec<ActivityRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read activities file: {}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse activities file: {}", path))
}
