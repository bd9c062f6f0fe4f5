//! Core data model shared across fitters, evaluators and derived metrics.
//!
//! A fitted model can only be obtained from a successful fit, so every
//! consumer that holds a `CyclingModel` or `RunningModel` may assume the
//! invariants below without re-checking: all anchor parameters are strictly
//! positive and the LT1 band satisfies `min < estimate < max`.

use serde::{Deserialize, Serialize};

/// Athlete sex, used to select benchmark tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(format!("Invalid sex: {} (expected male or female)", s)),
        }
    }
}

/// A single maximal effort against the clock: power held for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerEffort {
    /// Average power in watts.
    pub power: f64,
    /// Duration in seconds.
    pub time: f64,
}

/// A single maximal effort over ground: distance covered in a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEffort {
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Duration in seconds.
    pub time: f64,
}

/// Raw cycling field-test inputs.
///
/// Three efforts are mandatory: the instantaneous maximum (`pmax_power`), a
/// severe-domain effort (roughly 2-5 min) and a threshold-domain effort
/// (roughly 10-20 min). The short sprint test refines the exponential decay
/// constant; the long test can extend the power-law fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclingTestInputs {
    /// Maximal instantaneous (1 s) power in watts.
    pub pmax_power: f64,
    /// Severe-domain effort power in watts.
    pub severe_power: f64,
    /// Severe-domain effort duration in seconds.
    pub severe_time: f64,
    /// Threshold-domain effort power in watts.
    pub threshold_power: f64,
    /// Threshold-domain effort duration in seconds.
    pub threshold_time: f64,
    /// Optional very short (15-45 s) sprint test.
    #[serde(default)]
    pub short_test: Option<PowerEffort>,
    /// Optional long (> 20 min) endurance test.
    #[serde(default)]
    pub long_test: Option<PowerEffort>,
}

/// Raw running field-test inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningTestInputs {
    /// Severe-domain effort distance in metres.
    pub severe_distance: f64,
    /// Severe-domain effort duration in seconds.
    pub severe_time: f64,
    /// Threshold-domain effort distance in metres.
    pub threshold_distance: f64,
    /// Threshold-domain effort duration in seconds.
    pub threshold_time: f64,
    /// Optional long (> 20 min) test.
    #[serde(default)]
    pub long_test: Option<DistanceEffort>,
}

/// Exponential short-duration model (anaerobic power reserve).
///
/// `P(t) = po3min + amplitude * exp(-decay_rate * t)` for t up to 3 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AprParams {
    /// Power the hyperbolic model implies at 180 s, the APR asymptote.
    pub po3min: f64,
    /// Pmax minus `po3min`; strictly positive for a valid fit.
    pub amplitude: f64,
    /// Exponential decay constant k.
    pub decay_rate: f64,
}

/// Long-duration power-law model.
///
/// Cycling: `P(t) = scale * t^(exponent - 1)`.
/// Running: `v(t) = scale * t^(exponent - 1)`, `d(t) = scale * t^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawParams {
    /// Scale parameter S (watts for cycling, base speed in m/s for running).
    pub scale: f64,
    /// Endurance exponent E, below 1 for any decaying performance curve.
    pub exponent: f64,
}

/// First lactate threshold band. Paces for running (s/km), watts for cycling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lt1Range {
    pub min: f64,
    pub max: f64,
    pub estimate: f64,
}

/// Fitted cycling power-duration model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclingModel {
    /// Critical power in watts.
    pub cp: f64,
    /// Finite work capacity above CP in joules.
    pub w_prime: f64,
    /// Maximal instantaneous power in watts, carried from the inputs.
    pub pmax: f64,
    /// Short-duration exponential model.
    pub apr: AprParams,
    /// Long-duration power-law model.
    pub power_law: PowerLawParams,
    /// LT1 band in watts.
    pub lt1: Lt1Range,
}

/// Fitted running speed-distance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningModel {
    /// Critical speed in m/s.
    pub cs: f64,
    /// Distance capacity above CS in metres.
    pub d_prime: f64,
    /// Critical speed expressed as pace in s/km.
    pub cs_pace: f64,
    /// Long-duration power law; `scale` is the base speed in m/s.
    pub power_law: PowerLawParams,
    /// LT1 band as paces in s/km.
    pub lt1: Lt1Range,
    /// Maximal aerobic pace: sustainable 3-minute pace in s/km.
    pub vo2max_pace: f64,
}
