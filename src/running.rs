//! Running speed-distance model fitting.
//!
//! Fits the hyperbolic critical-speed model (closed form from two efforts)
//! and a long-duration power law, then derives CS pace, the maximal aerobic
//! pace and the LT1 band. Unlike the cycling fitter, the power law here is
//! regressed over velocity points synthesized from the CS-D' fit itself at
//! 5/10/15 minutes rather than the raw test points; the raw points anchor
//! the hyperbola only. Both behaviors are deliberate.

use tracing::debug;

use crate::error::{FitError, Result};
use crate::models::{Lt1Range, PowerLawParams, RunningModel, RunningTestInputs};
use crate::regression;

/// Durations (seconds) of the velocity points synthesized from the CS-D' fit.
const SYNTHESIS_DURATIONS: [f64; 3] = [300.0, 600.0, 900.0];
/// The long test joins the power-law regression only past this duration.
const LONG_TEST_MIN_TIME: f64 = 1200.0;
/// Reference duration for the maximal aerobic pace.
const MAP_REFERENCE_SECS: f64 = 180.0;

/// Endurance-exponent cutoff for the two-branch LT1 rule.
const LT1_ENDURANCE_CUTOFF: f64 = 0.90;
/// LT1 upper speed as a fraction of CS for high-endurance athletes (E > 0.90).
const LT1_HIGH_CS_FRACTION: f64 = 0.84;
/// LT1 upper speed as a fraction of CS otherwise.
const LT1_LOW_CS_FRACTION: f64 = 0.80;
/// LT1 lower speed as a fraction of the upper speed.
const LT1_LOWER_SPEED_FRACTION: f64 = 0.96;

const METERS_PER_KM: f64 = 1000.0;

/// Running model fitter.
pub struct RunningFitter;

impl RunningFitter {
    /// Fit the CS-D' and power-law models from raw test inputs.
    pub fn fit(inputs: &RunningTestInputs) -> Result<RunningModel> {
        if inputs.severe_time <= 0.0 || inputs.threshold_time <= 0.0 {
            return Err(FitError::NonPositiveTime);
        }
        if inputs.severe_time >= inputs.threshold_time {
            return Err(FitError::InconsistentTimeOrder);
        }
        if inputs.severe_distance >= inputs.threshold_distance {
            return Err(FitError::InconsistentDistanceOrder);
        }

        let cs = (inputs.threshold_distance - inputs.severe_distance)
            / (inputs.threshold_time - inputs.severe_time);
        let d_prime = inputs.severe_distance - cs * inputs.severe_time;

        if cs <= 0.0 {
            return Err(FitError::NegativeModelParameters { parameter: "CS" });
        }
        if d_prime <= 0.0 {
            return Err(FitError::NegativeModelParameters { parameter: "D'" });
        }

        let cs_pace = METERS_PER_KM / cs;
        let map_distance = cs * MAP_REFERENCE_SECS + d_prime;
        let vo2max_pace = MAP_REFERENCE_SECS * METERS_PER_KM / map_distance;

        let power_law = Self::fit_power_law(inputs, cs, d_prime)?;
        let lt1 = Self::lt1_band(cs, power_law.exponent);

        debug!(
            cs,
            d_prime,
            exponent = power_law.exponent,
            "fitted running model"
        );

        Ok(RunningModel {
            cs,
            d_prime,
            cs_pace,
            power_law,
            lt1,
            vo2max_pace,
        })
    }

    /// Power law over velocity points synthesized at 5/10/15 minutes, plus
    /// the long test when it runs past 20 minutes.
    fn fit_power_law(
        inputs: &RunningTestInputs,
        cs: f64,
        d_prime: f64,
    ) -> Result<PowerLawParams> {
        let mut points: Vec<(f64, f64)> = SYNTHESIS_DURATIONS
            .iter()
            .map(|&t| {
                let distance = cs * t + d_prime;
                (t, distance / t)
            })
            .collect();

        if let Some(long) = &inputs.long_test {
            if long.time > LONG_TEST_MIN_TIME {
                let distance_m = long.distance_km * METERS_PER_KM;
                points.push((long.time, distance_m / long.time));
            }
        }

        let fit = regression::fit_log_log(&points)?;
        Ok(PowerLawParams {
            scale: fit.scale(),
            exponent: fit.slope + 1.0,
        })
    }

    /// Empirical two-branch LT1 rule keyed on the endurance exponent.
    fn lt1_band(cs: f64, exponent: f64) -> Lt1Range {
        let upper_speed = if exponent > LT1_ENDURANCE_CUTOFF {
            cs * LT1_HIGH_CS_FRACTION
        } else {
            cs * LT1_LOW_CS_FRACTION
        };
        let lower_speed = upper_speed * LT1_LOWER_SPEED_FRACTION;

        // faster speed means lower (faster) pace
        let min_pace = METERS_PER_KM / upper_speed;
        let max_pace = METERS_PER_KM / lower_speed;
        Lt1Range {
            min: min_pace,
            max: max_pace,
            estimate: (min_pace + max_pace) / 2.0,
        }
    }
}
