use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

use pdcurve::display::{format_pace, format_power, format_speed, format_time};
use pdcurve::logging::{self, LogConfig, LogFormat, LogLevel};
use pdcurve::models::{
    CyclingModel, CyclingTestInputs, DistanceEffort, PowerEffort, RunningModel,
    RunningTestInputs, Sex,
};
use pdcurve::scoring::{AthleteScorer, CyclingAthleteProfile, RunningAthleteProfile};
use pdcurve::zones::{
    CyclingThresholdSummary, PowerZone, RunningThresholdSummary, SpeedZone, ZoneCalculator,
};
use pdcurve::{CyclingFitter, RunningFitter};

/// Power-duration and speed-distance modeling from field tests.
#[derive(Parser)]
#[command(name = "pdcurve")]
#[command(version)]
#[command(about = "Fit power-duration and speed-distance models from field tests")]
struct Cli {
    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a cycling power-duration model
    Cycling {
        /// TOML file with the test inputs (alternative to the flags below)
        #[arg(short, long, value_name = "FILE", conflicts_with_all = [
            "pmax", "severe_power", "severe_time", "threshold_power", "threshold_time",
        ])]
        input: Option<PathBuf>,

        /// Maximal 1 s power, watts
        #[arg(long, required_unless_present = "input")]
        pmax: Option<f64>,

        /// Severe-domain test power, watts
        #[arg(long, required_unless_present = "input")]
        severe_power: Option<f64>,

        /// Severe-domain test duration, seconds
        #[arg(long, required_unless_present = "input")]
        severe_time: Option<f64>,

        /// Threshold-domain test power, watts
        #[arg(long, required_unless_present = "input")]
        threshold_power: Option<f64>,

        /// Threshold-domain test duration, seconds
        #[arg(long, required_unless_present = "input")]
        threshold_time: Option<f64>,

        /// Optional sprint test power, watts
        #[arg(long, requires = "short_time")]
        short_power: Option<f64>,

        /// Optional sprint test duration, seconds
        #[arg(long, requires = "short_power")]
        short_time: Option<f64>,

        /// Optional long test power, watts
        #[arg(long, requires = "long_time")]
        long_power: Option<f64>,

        /// Optional long test duration, seconds
        #[arg(long, requires = "long_power")]
        long_time: Option<f64>,

        /// Body weight in kg
        #[arg(short, long)]
        weight: f64,

        /// Athlete sex for benchmark tables (male, female)
        #[arg(short, long)]
        sex: Option<Sex>,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fit a running speed-distance model
    Running {
        /// TOML file with the test inputs (alternative to the flags below)
        #[arg(short, long, value_name = "FILE", conflicts_with_all = [
            "severe_distance", "severe_time", "threshold_distance", "threshold_time",
        ])]
        input: Option<PathBuf>,

        /// Severe-domain test distance, metres
        #[arg(long, required_unless_present = "input")]
        severe_distance: Option<f64>,

        /// Severe-domain test duration, seconds
        #[arg(long, required_unless_present = "input")]
        severe_time: Option<f64>,

        /// Threshold-domain test distance, metres
        #[arg(long, required_unless_present = "input")]
        threshold_distance: Option<f64>,

        /// Threshold-domain test duration, seconds
        #[arg(long, required_unless_present = "input")]
        threshold_time: Option<f64>,

        /// Optional long test distance, kilometres
        #[arg(long, requires = "long_time")]
        long_distance: Option<f64>,

        /// Optional long test duration, seconds
        #[arg(long, requires = "long_distance")]
        long_time: Option<f64>,

        /// Athlete sex for benchmark tables (male, female)
        #[arg(short, long)]
        sex: Option<Sex>,

        /// Emit the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CyclingReport {
    model: CyclingModel,
    thresholds: CyclingThresholdSummary,
    zones: Vec<PowerZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<CyclingAthleteProfile>,
}

#[derive(Serialize)]
struct RunningReport {
    model: RunningModel,
    thresholds: RunningThresholdSummary,
    zones: Vec<SpeedZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<RunningAthleteProfile>,
}

#[derive(Tabled)]
struct PowerZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Domain")]
    domain: String,
}

#[derive(Tabled)]
struct SpeedZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Domain")]
    domain: String,
}

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Slot")]
    slot: &'static str,
    #[tabled(rename = "Score")]
    score: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        format: LogFormat::Pretty,
    })?;

    match cli.command {
        Commands::Cycling {
            input,
            pmax,
            severe_power,
            severe_time,
            threshold_power,
            threshold_time,
            short_power,
            short_time,
            long_power,
            long_time,
            weight,
            sex,
            json,
        } => {
            let inputs = match input {
                Some(path) => load_toml(&path)?,
                None => CyclingTestInputs {
                    // required_unless_present guarantees these are set
                    pmax_power: pmax.unwrap_or_default(),
                    severe_power: severe_power.unwrap_or_default(),
                    severe_time: severe_time.unwrap_or_default(),
                    threshold_power: threshold_power.unwrap_or_default(),
                    threshold_time: threshold_time.unwrap_or_default(),
                    short_test: effort(short_power, short_time),
                    long_test: effort(long_power, long_time),
                },
            };
            run_cycling(&inputs, weight, sex, json)
        }

        Commands::Running {
            input,
            severe_distance,
            severe_time,
            threshold_distance,
            threshold_time,
            long_distance,
            long_time,
            sex,
            json,
        } => {
            let inputs = match input {
                Some(path) => load_toml(&path)?,
                None => RunningTestInputs {
                    severe_distance: severe_distance.unwrap_or_default(),
                    severe_time: severe_time.unwrap_or_default(),
                    threshold_distance: threshold_distance.unwrap_or_default(),
                    threshold_time: threshold_time.unwrap_or_default(),
                    long_test: match (long_distance, long_time) {
                        (Some(distance_km), Some(time)) => {
                            Some(DistanceEffort { distance_km, time })
                        }
                        _ => None,
                    },
                },
            };
            run_running(&inputs, sex, json)
        }
    }
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn effort(power: Option<f64>, time: Option<f64>) -> Option<PowerEffort> {
    match (power, time) {
        (Some(power), Some(time)) => Some(PowerEffort { power, time }),
        _ => None,
    }
}

fn run_cycling(inputs: &CyclingTestInputs, weight: f64, sex: Option<Sex>, json: bool) -> Result<()> {
    let model = CyclingFitter::fit(inputs).context("model fit failed")?;
    let thresholds = ZoneCalculator::cycling_thresholds(&model, weight);
    let zones = ZoneCalculator::cycling_zones(&model);
    let profile = sex.map(|sex| AthleteScorer::cycling_profile(&model, weight, sex));

    if json {
        let report = CyclingReport {
            model,
            thresholds,
            zones,
            profile,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Cycling power-duration model".green().bold());
    println!("  CP:      {}", format_power(model.cp));
    println!("  W':      {:.0} J", model.w_prime);
    println!("  Pmax:    {}", format_power(model.pmax));
    println!("  MAP:     {}", format_power(thresholds.map_watts));
    println!(
        "  MMSS:    {} - {}",
        format_power(thresholds.mmss_min_watts),
        format_power(thresholds.mmss_max_watts)
    );
    println!(
        "  LT1:     {} - {} (est. {})",
        format_power(model.lt1.min),
        format_power(model.lt1.max),
        format_power(model.lt1.estimate)
    );
    println!("  VO2max:  {:.1} ml/kg/min", thresholds.vo2max_ml_kg_min);

    let rows: Vec<PowerZoneRow> = zones
        .iter()
        .map(|z| PowerZoneRow {
            zone: format!("Z{}", z.number),
            name: z.name,
            range: match z.max_watts {
                Some(max) => format!("{} - {}", format_power(z.min_watts), format_power(max)),
                None => format!("> {}", format_power(z.min_watts)),
            },
            domain: format!("{:?}", z.domain).to_lowercase(),
        })
        .collect();
    println!("\n{}", Table::new(rows));

    if let Some(profile) = profile {
        print_profile(
            &profile.stats.map(|s| ScoreRow {
                slot: s.label,
                score: s.score,
            }),
            profile.overall_rating,
            &format!("{:?}", profile.profile),
            profile.rarity.card_label(),
        );
    }

    Ok(())
}

fn run_running(inputs: &RunningTestInputs, sex: Option<Sex>, json: bool) -> Result<()> {
    let model = RunningFitter::fit(inputs).context("model fit failed")?;
    let thresholds = ZoneCalculator::running_thresholds(&model);
    let zones = ZoneCalculator::running_zones(&model);
    let profile = sex.map(|sex| AthleteScorer::running_profile(&model, sex));

    if json {
        let report = RunningReport {
            model,
            thresholds,
            zones,
            profile,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Running speed-distance model".green().bold());
    println!(
        "  CS:        {} ({} /km)",
        format_speed(model.cs),
        format_pace(model.cs_pace)
    );
    println!("  D':        {:.0} m", model.d_prime);
    println!("  MAP pace:  {} /km", format_pace(model.vo2max_pace));
    println!(
        "  LT1 pace:  {} - {} /km (est. {})",
        format_pace(model.lt1.min),
        format_pace(model.lt1.max),
        format_pace(model.lt1.estimate)
    );

    let rows: Vec<SpeedZoneRow> = zones
        .iter()
        .map(|z| SpeedZoneRow {
            zone: format!("Z{}", z.number),
            name: z.name,
            speed: match z.max_speed {
                Some(max) => format!("{} - {}", format_speed(z.min_speed), format_speed(max)),
                None => format!("> {}", format_speed(z.min_speed)),
            },
            domain: format!("{:?}", z.domain).to_lowercase(),
        })
        .collect();
    println!("\n{}", Table::new(rows));

    if let Some(profile) = profile {
        print_profile(
            &profile.stats.map(|s| ScoreRow {
                slot: s.label,
                score: s.score,
            }),
            profile.overall_rating,
            &format!("{:?}", profile.profile),
            profile.rarity.card_label(),
        );

        println!("\n{}", "Predicted race times".cyan().bold());
        for (label, distance) in [
            ("1500 m", 1500.0),
            ("5 km", 5000.0),
            ("10 km", 10000.0),
            ("Half marathon", 21097.5),
            ("Marathon", 42195.0),
        ] {
            let predicted = AthleteScorer::predicted_race_time(&model, distance);
            println!("  {:<14} {}", label, format_time(predicted));
        }
    }

    Ok(())
}

fn print_profile(rows: &[ScoreRow], overall: u32, profile: &str, card_label: &str) {
    println!("\n{}", "Athlete profile".cyan().bold());
    println!("{}", Table::new(rows));
    println!("  Overall: {}", overall.to_string().bold());
    println!("  Profile: {}", profile);
    println!("  Card:    {}", card_label);
}
