//! Power-duration and speed-distance modeling for endurance athletes.
//!
//! Fits critical-power / critical-speed, anaerobic-power-reserve and
//! power-law models to sparse field-test data, selects the governing model
//! per duration or distance, and derives training zones, threshold
//! summaries and benchmark-relative athlete profiles from the fit.

pub mod cycling;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod models;
pub mod regression;
pub mod running;
pub mod scoring;
pub mod zones;

pub use cycling::CyclingFitter;
pub use error::{FitError, Result};
pub use evaluator::{
    DualEstimate, ModelKind, PowerDurationEvaluator, PowerEstimate, RunningEstimate,
    SpeedDistanceEvaluator, TimeEstimate,
};
pub use models::{
    AprParams, CyclingModel, CyclingTestInputs, DistanceEffort, Lt1Range, PowerEffort,
    PowerLawParams, RunningModel, RunningTestInputs, Sex,
};
pub use running::RunningFitter;
pub use scoring::{
    AthleteScorer, CyclingAthleteProfile, CyclingProfile, RarityTier, RunningAthleteProfile,
    RunningProfile,
};
pub use zones::{
    CyclingThresholdSummary, IntensityDomain, PowerZone, RunningThresholdSummary, SpeedZone,
    ZoneCalculator,
};
