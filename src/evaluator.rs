//! Model selection and forward/inverse curve evaluation.
//!
//! This module is the single source of truth for the duration and distance
//! boundaries between the three fitted models. The original duplication of
//! these rules across chart, calculator, table and report surfaces is
//! collapsed here; every consumer queries through these evaluators.
//!
//! Cycling duration bands:
//! - up to 180 s: exponential APR model (1 s returns Pmax exactly)
//! - 180 to 960 s: hyperbolic CP/W'
//! - beyond 960 s: power law
//! - 120 to 180 s is a transition zone where APR and CP/W' are both
//!   considered valid; both are reported and the more conservative value
//!   wins.
//!
//! Running distance selection uses the CS-D' model when the implied time is
//! under 17 minutes (1020 s) and the power law beyond.

use serde::{Deserialize, Serialize};

use crate::models::{CyclingModel, RunningModel};

/// Upper duration bound of the APR model, seconds.
pub const APR_LIMIT_SECS: f64 = 180.0;
/// Start of the APR / hyperbolic transition zone, seconds.
pub const TRANSITION_START_SECS: f64 = 120.0;
/// Upper duration bound of the hyperbolic model, seconds (16 min).
pub const HYPERBOLIC_LIMIT_SECS: f64 = 960.0;
/// Upper implied-time bound of the CS-D' model, seconds (17 min).
pub const CS_LIMIT_SECS: f64 = 1020.0;

/// Bisection tolerances for the APR inverse solve.
const TIME_TOLERANCE_SECS: f64 = 0.01;
const POWER_TOLERANCE_WATTS: f64 = 0.1;
const MAX_ITERATIONS: u32 = 100;

/// Which fitted model produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Exponential anaerobic-power-reserve model.
    Apr,
    /// Hyperbolic CP/W' or CS-D' model.
    Hyperbolic,
    /// Long-duration power law.
    PowerLaw,
}

/// Side-by-side report when both transition-zone models are valid.
///
/// Values are watts for forward queries and seconds for inverse queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualEstimate {
    pub apr: f64,
    pub hyperbolic: f64,
    pub difference: f64,
    pub difference_pct: f64,
}

impl DualEstimate {
    fn new(apr: f64, hyperbolic: f64) -> Self {
        let difference = (apr - hyperbolic).abs();
        let difference_pct = difference / apr.max(hyperbolic) * 100.0;
        Self {
            apr,
            hyperbolic,
            difference,
            difference_pct,
        }
    }
}

/// Forward evaluation result: power at a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerEstimate {
    pub watts: f64,
    pub model: ModelKind,
    /// Present only inside the 120-180 s transition zone.
    pub dual: Option<DualEstimate>,
}

/// Inverse evaluation result: duration at a target power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeEstimate {
    pub seconds: f64,
    pub model: ModelKind,
    /// Present when both APR and hyperbolic solutions land in 120-180 s.
    pub dual: Option<DualEstimate>,
}

/// Running evaluation result: distance or time plus the model that applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningEstimate {
    pub value: f64,
    pub model: ModelKind,
}

/// Duration-based evaluation of a fitted cycling model.
pub struct PowerDurationEvaluator;

impl PowerDurationEvaluator {
    /// Power sustainable for `seconds`, selecting the governing model.
    pub fn power_at(model: &CyclingModel, seconds: f64) -> PowerEstimate {
        if (TRANSITION_START_SECS..=APR_LIMIT_SECS).contains(&seconds) {
            let apr = Self::apr_power(model, seconds);
            let hyperbolic = Self::hyperbolic_power(model, seconds);
            // conservative: the lower prediction is the primary value
            let (watts, kind) = if apr <= hyperbolic {
                (apr, ModelKind::Apr)
            } else {
                (hyperbolic, ModelKind::Hyperbolic)
            };
            return PowerEstimate {
                watts,
                model: kind,
                dual: Some(DualEstimate::new(apr, hyperbolic)),
            };
        }

        if seconds <= APR_LIMIT_SECS {
            PowerEstimate {
                watts: Self::apr_power(model, seconds),
                model: ModelKind::Apr,
                dual: None,
            }
        } else if seconds <= HYPERBOLIC_LIMIT_SECS {
            PowerEstimate {
                watts: Self::hyperbolic_power(model, seconds),
                model: ModelKind::Hyperbolic,
                dual: None,
            }
        } else {
            PowerEstimate {
                watts: Self::power_law_power(model, seconds),
                model: ModelKind::PowerLaw,
                dual: None,
            }
        }
    }

    /// Longest duration the target power is sustainable for, or `None` when
    /// no model domain contains a consistent answer.
    pub fn time_at(model: &CyclingModel, target_watts: f64) -> Option<TimeEstimate> {
        let apr_time = Self::solve_apr_time(model, target_watts);
        let hyperbolic_time = (target_watts > model.cp)
            .then(|| model.w_prime / (target_watts - model.cp));

        if let (Some(apr), Some(hyperbolic)) = (apr_time, hyperbolic_time) {
            let transition = TRANSITION_START_SECS..=APR_LIMIT_SECS;
            if transition.contains(&apr) && transition.contains(&hyperbolic) {
                // dual prediction: the shorter time is the primary answer
                let (seconds, kind) = if apr <= hyperbolic {
                    (apr, ModelKind::Apr)
                } else {
                    (hyperbolic, ModelKind::Hyperbolic)
                };
                return Some(TimeEstimate {
                    seconds,
                    model: kind,
                    dual: Some(DualEstimate::new(apr, hyperbolic)),
                });
            }
        }

        if let Some(apr) = apr_time {
            if (1.0..=APR_LIMIT_SECS).contains(&apr) {
                return Some(TimeEstimate {
                    seconds: apr,
                    model: ModelKind::Apr,
                    dual: None,
                });
            }
        }

        if let Some(hyperbolic) = hyperbolic_time {
            if hyperbolic > APR_LIMIT_SECS && hyperbolic <= HYPERBOLIC_LIMIT_SECS {
                return Some(TimeEstimate {
                    seconds: hyperbolic,
                    model: ModelKind::Hyperbolic,
                    dual: None,
                });
            }
            // short hyperbolic solutions stand in when the APR solve failed
            if hyperbolic <= APR_LIMIT_SECS {
                return Some(TimeEstimate {
                    seconds: hyperbolic,
                    model: ModelKind::Hyperbolic,
                    dual: None,
                });
            }
        }

        let exponent = 1.0 / (model.power_law.exponent - 1.0);
        let seconds = (target_watts / model.power_law.scale).powf(exponent);
        (seconds.is_finite() && seconds > 0.0).then_some(TimeEstimate {
            seconds,
            model: ModelKind::PowerLaw,
            dual: None,
        })
    }

    /// APR model power. The 1 s query returns Pmax exactly; the exponential
    /// form has a boundary singularity there.
    fn apr_power(model: &CyclingModel, seconds: f64) -> f64 {
        if seconds == 1.0 {
            model.pmax
        } else {
            model.apr.po3min + model.apr.amplitude * (-model.apr.decay_rate * seconds).exp()
        }
    }

    fn hyperbolic_power(model: &CyclingModel, seconds: f64) -> f64 {
        model.cp + model.w_prime / seconds
    }

    fn power_law_power(model: &CyclingModel, seconds: f64) -> f64 {
        model.power_law.scale * seconds.powf(model.power_law.exponent - 1.0)
    }

    /// Bisection solve of `po3min + amplitude * exp(-k t) = target` on
    /// [1, 180]. The exponential is monotone decreasing there, and the
    /// clamped decay constant rules out a closed-form rearrangement that
    /// stays consistent with the 1 s Pmax override.
    fn solve_apr_time(model: &CyclingModel, target_watts: f64) -> Option<f64> {
        let max_power = model.pmax;
        let min_power = Self::apr_power(model, APR_LIMIT_SECS);
        if target_watts > max_power || target_watts < min_power {
            return None;
        }
        if (target_watts - model.pmax).abs() < POWER_TOLERANCE_WATTS {
            return Some(1.0);
        }

        let mut lo = 1.0;
        let mut hi = APR_LIMIT_SECS;
        let mut iterations = 0;
        while hi - lo > TIME_TOLERANCE_SECS && iterations < MAX_ITERATIONS {
            let mid = (lo + hi) / 2.0;
            let power = Self::apr_power(model, mid);
            if (power - target_watts).abs() < POWER_TOLERANCE_WATTS {
                return Some(mid);
            }
            if power > target_watts {
                lo = mid;
            } else {
                hi = mid;
            }
            iterations += 1;
        }
        Some((lo + hi) / 2.0)
    }
}

/// Distance-based evaluation of a fitted running model.
pub struct SpeedDistanceEvaluator;

impl SpeedDistanceEvaluator {
    /// Predicted time for a race distance in metres.
    pub fn time_for_distance(model: &RunningModel, distance_m: f64) -> RunningEstimate {
        let implied = (distance_m - model.d_prime) / model.cs;
        if implied > 0.0 && implied < CS_LIMIT_SECS {
            RunningEstimate {
                value: implied,
                model: ModelKind::Hyperbolic,
            }
        } else {
            let seconds =
                (distance_m / model.power_law.scale).powf(1.0 / model.power_law.exponent);
            RunningEstimate {
                value: seconds,
                model: ModelKind::PowerLaw,
            }
        }
    }

    /// Predicted distance coverable in `seconds`.
    pub fn distance_at(model: &RunningModel, seconds: f64) -> RunningEstimate {
        if seconds < CS_LIMIT_SECS {
            RunningEstimate {
                value: model.cs * seconds + model.d_prime,
                model: ModelKind::Hyperbolic,
            }
        } else {
            RunningEstimate {
                value: model.power_law.scale * seconds.powf(model.power_law.exponent),
                model: ModelKind::PowerLaw,
            }
        }
    }

    /// Sustainable velocity in m/s for a duration; zone derivation uses the
    /// CS-D' form up to 3 minutes and the power law beyond.
    pub fn velocity_at(model: &RunningModel, seconds: f64) -> f64 {
        if seconds <= 180.0 {
            (model.cs * seconds + model.d_prime) / seconds
        } else {
            model.power_law.scale * seconds.powf(model.power_law.exponent - 1.0)
        }
    }
}
