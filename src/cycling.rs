//! Cycling power-duration model fitting.
//!
//! Fits three complementary models to sparse field-test inputs: the
//! hyperbolic CP/W' model (closed form, exactly determined by the severe and
//! threshold efforts), the exponential anaerobic-power-reserve model for
//! short durations, and a power law for long durations. Also derives the
//! LT1 band from 30-minute power.

use tracing::debug;

use crate::error::{FitError, Result};
use crate::models::{AprParams, CyclingModel, CyclingTestInputs, Lt1Range, PowerLawParams};
use crate::regression;

/// Default APR exponential decay constant when no sprint test is available.
pub const APR_DECAY_DEFAULT: f64 = 0.026;
/// Empirical lower bound for the optimized decay constant.
pub const APR_DECAY_MIN: f64 = 0.015;
/// Empirical upper bound for the optimized decay constant.
pub const APR_DECAY_MAX: f64 = 0.05;

/// LT1 band as fractions of 30-minute power.
const LT1_LOWER_FRACTION: f64 = 0.72;
const LT1_UPPER_FRACTION: f64 = 0.80;
const LT1_ESTIMATE_FRACTION: f64 = 0.75;

/// Cycling model fitter.
pub struct CyclingFitter;

impl CyclingFitter {
    /// Fit all three models from raw test inputs.
    ///
    /// Validation runs before any derivation and the first failure wins:
    /// power ordering, time ordering, positive CP/W', then the Pmax
    /// dominance check against the implied 3-minute power.
    pub fn fit(inputs: &CyclingTestInputs) -> Result<CyclingModel> {
        if inputs.severe_power <= inputs.threshold_power {
            return Err(FitError::InconsistentPowerOrder);
        }
        if inputs.severe_time >= inputs.threshold_time {
            return Err(FitError::InconsistentTimeOrder);
        }

        // Two points fully determine the hyperbola, no regression needed.
        let w_prime = (inputs.severe_power - inputs.threshold_power)
            * inputs.severe_time
            * inputs.threshold_time
            / (inputs.threshold_time - inputs.severe_time);
        let cp = inputs.severe_power - w_prime / inputs.severe_time;

        if cp <= 0.0 {
            return Err(FitError::NegativeModelParameters { parameter: "CP" });
        }
        if w_prime <= 0.0 {
            return Err(FitError::NegativeModelParameters { parameter: "W'" });
        }

        let po3min = cp + w_prime / 180.0;
        if inputs.pmax_power <= po3min {
            return Err(FitError::PmaxTooLow {
                pmax: inputs.pmax_power,
                po3min,
            });
        }

        let amplitude = inputs.pmax_power - po3min;
        let decay_rate = Self::decay_rate(inputs, po3min, amplitude);

        let power_law = Self::fit_power_law(inputs)?;

        let p30min = cp + w_prime / 1800.0;
        let lt1 = Lt1Range {
            min: p30min * LT1_LOWER_FRACTION,
            max: p30min * LT1_UPPER_FRACTION,
            estimate: p30min * LT1_ESTIMATE_FRACTION,
        };

        debug!(cp, w_prime, po3min, decay_rate, "fitted cycling model");

        Ok(CyclingModel {
            cp,
            w_prime,
            pmax: inputs.pmax_power,
            apr: AprParams {
                po3min,
                amplitude,
                decay_rate,
            },
            power_law,
            lt1,
        })
    }

    /// Decay constant k, refined from the sprint test when it is usable.
    ///
    /// The sprint point is only informative when it sits strictly between
    /// the asymptote and Pmax; otherwise the empirical default stands.
    fn decay_rate(inputs: &CyclingTestInputs, po3min: f64, amplitude: f64) -> f64 {
        if let Some(short) = &inputs.short_test {
            if short.power > po3min && amplitude > 0.0 {
                let ratio = (short.power - po3min) / amplitude;
                if ratio > 0.0 && ratio < 1.0 {
                    return (-ratio.ln() / short.time).clamp(APR_DECAY_MIN, APR_DECAY_MAX);
                }
            }
        }
        APR_DECAY_DEFAULT
    }

    /// Power-law fit over the raw test points.
    ///
    /// The long test joins the regression only when it extends the time
    /// range and continues the downward power trend; anything else would
    /// drag the fit without adding information, so it is silently excluded.
    fn fit_power_law(inputs: &CyclingTestInputs) -> Result<PowerLawParams> {
        let mut points = vec![
            (inputs.severe_time, inputs.severe_power),
            (inputs.threshold_time, inputs.threshold_power),
        ];
        if let Some(long) = &inputs.long_test {
            if long.power < inputs.threshold_power && long.time > inputs.threshold_time {
                points.push((long.time, long.power));
            }
        }

        let fit = regression::fit_log_log(&points)?;
        Ok(PowerLawParams {
            scale: fit.scale(),
            exponent: fit.slope + 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> CyclingTestInputs {
        CyclingTestInputs {
            pmax_power: 1110.0,
            severe_power: 397.0,
            severe_time: 240.0,
            threshold_power: 348.0,
            threshold_time: 902.0,
            short_test: None,
            long_test: None,
        }
    }

    #[test]
    fn test_reference_athlete_fit() {
        let model = CyclingFitter::fit(&base_inputs()).unwrap();
        // CP sits below the threshold-test power, W' fills the gap above it
        assert!((model.cp - 330.24).abs() < 0.1);
        assert!((model.w_prime - 16023.4).abs() < 1.0);
        assert!(model.cp < base_inputs().threshold_power);
        assert!(model.apr.po3min < model.pmax);
        assert_eq!(model.apr.decay_rate, APR_DECAY_DEFAULT);
    }

    #[test]
    fn test_hyperbola_passes_through_both_anchors() {
        let inputs = base_inputs();
        let model = CyclingFitter::fit(&inputs).unwrap();
        let severe = model.cp + model.w_prime / inputs.severe_time;
        let threshold = model.cp + model.w_prime / inputs.threshold_time;
        assert!((severe - inputs.severe_power).abs() < 1e-9);
        assert!((threshold - inputs.threshold_power).abs() < 1e-9);
    }

    #[test]
    fn test_swapped_powers_fail_with_power_order() {
        let mut inputs = base_inputs();
        inputs.severe_power = 300.0;
        inputs.threshold_power = 350.0;
        assert_eq!(
            CyclingFitter::fit(&inputs),
            Err(FitError::InconsistentPowerOrder)
        );
    }

    #[test]
    fn test_swapped_times_fail_with_time_order() {
        let mut inputs = base_inputs();
        inputs.severe_time = 902.0;
        inputs.threshold_time = 240.0;
        assert_eq!(
            CyclingFitter::fit(&inputs),
            Err(FitError::InconsistentTimeOrder)
        );
    }

    #[test]
    fn test_power_order_checked_before_time_order() {
        let mut inputs = base_inputs();
        inputs.severe_power = 300.0;
        inputs.threshold_power = 350.0;
        inputs.severe_time = 902.0;
        inputs.threshold_time = 240.0;
        assert_eq!(
            CyclingFitter::fit(&inputs),
            Err(FitError::InconsistentPowerOrder)
        );
    }

    #[test]
    fn test_low_pmax_fails() {
        let mut inputs = base_inputs();
        inputs.pmax_power = 370.0; // below the ~419 W implied at 3 minutes
        assert!(matches!(
            CyclingFitter::fit(&inputs),
            Err(FitError::PmaxTooLow { .. })
        ));
    }

    #[test]
    fn test_sprint_test_refines_decay_rate() {
        let mut inputs = base_inputs();
        inputs.short_test = Some(crate::models::PowerEffort {
            power: 700.0,
            time: 30.0,
        });
        let model = CyclingFitter::fit(&inputs).unwrap();
        // ratio = (700 - po3min) / amplitude is in (0, 1), so k is optimized
        assert_ne!(model.apr.decay_rate, APR_DECAY_DEFAULT);
        assert!(model.apr.decay_rate >= APR_DECAY_MIN);
        assert!(model.apr.decay_rate <= APR_DECAY_MAX);
    }

    #[test]
    fn test_sprint_test_below_asymptote_keeps_default() {
        let mut inputs = base_inputs();
        inputs.short_test = Some(crate::models::PowerEffort {
            power: 400.0, // under po3min, not usable
            time: 30.0,
        });
        let model = CyclingFitter::fit(&inputs).unwrap();
        assert_eq!(model.apr.decay_rate, APR_DECAY_DEFAULT);
    }

    #[test]
    fn test_decay_rate_clamped_to_upper_bound() {
        let mut inputs = base_inputs();
        // Sprint barely above po3min after only 20 s decays extremely fast.
        inputs.short_test = Some(crate::models::PowerEffort {
            power: 480.0,
            time: 20.0,
        });
        let model = CyclingFitter::fit(&inputs).unwrap();
        assert_eq!(model.apr.decay_rate, APR_DECAY_MAX);
    }

    #[test]
    fn test_long_test_extends_power_law() {
        let inputs = base_inputs();
        let without = CyclingFitter::fit(&inputs).unwrap();

        let mut with_long = inputs.clone();
        with_long.long_test = Some(crate::models::PowerEffort {
            power: 320.0,
            time: 3600.0,
        });
        let with = CyclingFitter::fit(&with_long).unwrap();
        assert_ne!(without.power_law, with.power_law);
    }

    #[test]
    fn test_uninformative_long_test_is_excluded() {
        let inputs = base_inputs();
        let without = CyclingFitter::fit(&inputs).unwrap();

        // Long test above threshold power does not continue the downward
        // trend and must not move the fit.
        let mut with_bad_long = inputs.clone();
        with_bad_long.long_test = Some(crate::models::PowerEffort {
            power: 360.0,
            time: 3600.0,
        });
        let with = CyclingFitter::fit(&with_bad_long).unwrap();
        assert_eq!(without.power_law, with.power_law);
    }

    #[test]
    fn test_lt1_band_fractions_of_p30() {
        let model = CyclingFitter::fit(&base_inputs()).unwrap();
        let p30 = model.cp + model.w_prime / 1800.0;
        assert!((model.lt1.min - p30 * 0.72).abs() < 1e-9);
        assert!((model.lt1.max - p30 * 0.80).abs() < 1e-9);
        assert!((model.lt1.estimate - p30 * 0.75).abs() < 1e-9);
        assert!(model.lt1.min < model.lt1.estimate);
        assert!(model.lt1.estimate < model.lt1.max);
    }

    #[test]
    fn test_power_law_exponent_below_one() {
        let model = CyclingFitter::fit(&base_inputs()).unwrap();
        assert!(model.power_law.exponent > 0.0);
        assert!(model.power_law.exponent < 1.0);
    }
}
