//! Training zones and threshold summaries derived from fitted models.

use serde::Serialize;

use crate::evaluator::SpeedDistanceEvaluator;
use crate::models::{CyclingModel, Lt1Range, RunningModel};

/// Slope and intercept of the linear 5-minute-power VO2max estimate.
const VO2MAX_SLOPE: f64 = 7.44;
const VO2MAX_INTERCEPT: f64 = 27.51;

/// Duration anchoring the lower edge of the maximal-metabolic-steady-state
/// band, 50 minutes.
const MMSS_LOWER_SECS: f64 = 3000.0;

const METERS_PER_KM: f64 = 1000.0;

/// Exercise-intensity domain a zone falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityDomain {
    Moderate,
    Heavy,
    Severe,
    Extreme,
}

/// One cycling power zone. `max_watts` is `None` for the open-ended top zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerZone {
    pub number: u8,
    pub name: &'static str,
    pub min_watts: f64,
    pub max_watts: Option<f64>,
    pub domain: IntensityDomain,
}

/// One running speed zone in m/s. `max_speed` is `None` for the top zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedZone {
    pub number: u8,
    pub name: &'static str,
    pub min_speed: f64,
    pub max_speed: Option<f64>,
    pub domain: IntensityDomain,
}

/// Key cycling thresholds in one place, absolute and per-kilogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclingThresholdSummary {
    pub pmax_watts: f64,
    /// Maximal aerobic power, the 3-minute asymptote.
    pub map_watts: f64,
    pub cp_watts: f64,
    pub w_prime_joules: f64,
    /// Maximal metabolic steady state band, watts.
    pub mmss_min_watts: f64,
    pub mmss_max_watts: f64,
    pub lt1: Lt1Range,
    /// Estimated VO2max in ml/kg/min from relative 5-minute power.
    pub vo2max_ml_kg_min: f64,
    pub pmax_wkg: f64,
    pub map_wkg: f64,
    pub cp_wkg: f64,
}

/// Key running thresholds, speeds in m/s and paces in s/km.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunningThresholdSummary {
    pub cs_speed: f64,
    pub cs_pace: f64,
    pub d_prime_meters: f64,
    /// Maximal aerobic (3-minute) pace.
    pub vo2max_pace: f64,
    pub lt1_pace: Lt1Range,
}

/// Zone and threshold derivation.
pub struct ZoneCalculator;

impl ZoneCalculator {
    /// Six-zone power scheme anchored on LT1, CP and the 3-minute power.
    pub fn cycling_zones(model: &CyclingModel) -> Vec<PowerZone> {
        let lt1 = model.lt1.estimate;
        let boundaries = [
            0.8 * lt1,
            lt1,
            0.92 * model.cp,
            1.02 * model.cp,
            model.apr.po3min,
        ];
        let names = [
            "Recovery",
            "Endurance",
            "Tempo",
            "Threshold",
            "VO2max",
            "Anaerobic",
        ];
        let domains = [
            IntensityDomain::Moderate,
            IntensityDomain::Moderate,
            IntensityDomain::Heavy,
            IntensityDomain::Heavy,
            IntensityDomain::Severe,
            IntensityDomain::Extreme,
        ];

        Self::build_zones(&boundaries, &names, &domains, |number, name, min, max, domain| {
            PowerZone {
                number,
                name,
                min_watts: min,
                max_watts: max,
                domain,
            }
        })
    }

    /// Six-zone speed scheme anchored on LT1 speed and the 60/25/3-minute
    /// sustainable velocities.
    pub fn running_zones(model: &RunningModel) -> Vec<SpeedZone> {
        let lt1_speed = METERS_PER_KM / model.lt1.estimate;
        let v60 = SpeedDistanceEvaluator::velocity_at(model, 3600.0);
        let v25 = SpeedDistanceEvaluator::velocity_at(model, 1500.0);
        let v3 = SpeedDistanceEvaluator::velocity_at(model, 180.0);
        let boundaries = [0.86 * lt1_speed, lt1_speed, v60, v25, v3];
        let names = [
            "Recovery",
            "Endurance",
            "Tempo",
            "Threshold",
            "VO2max",
            "Anaerobic",
        ];
        let domains = [
            IntensityDomain::Moderate,
            IntensityDomain::Moderate,
            IntensityDomain::Heavy,
            IntensityDomain::Heavy,
            IntensityDomain::Severe,
            IntensityDomain::Extreme,
        ];

        Self::build_zones(&boundaries, &names, &domains, |number, name, min, max, domain| {
            SpeedZone {
                number,
                name,
                min_speed: min,
                max_speed: max,
                domain,
            }
        })
    }

    /// Threshold summary including the VO2max estimate and the MMSS band.
    ///
    /// The 5-minute power feeding the VO2max formula is always the
    /// hyperbolic `cp + w_prime/300`, independent of the evaluator's band
    /// selection; the published regression was calibrated on that form.
    pub fn cycling_thresholds(model: &CyclingModel, body_weight_kg: f64) -> CyclingThresholdSummary {
        let p5min = model.cp + model.w_prime / 300.0;
        let vo2max = VO2MAX_SLOPE * (p5min / body_weight_kg) + VO2MAX_INTERCEPT;
        let mmss_min =
            model.power_law.scale * MMSS_LOWER_SECS.powf(model.power_law.exponent - 1.0);

        CyclingThresholdSummary {
            pmax_watts: model.pmax,
            map_watts: model.apr.po3min,
            cp_watts: model.cp,
            w_prime_joules: model.w_prime,
            mmss_min_watts: mmss_min,
            mmss_max_watts: model.cp,
            lt1: model.lt1,
            vo2max_ml_kg_min: vo2max,
            pmax_wkg: model.pmax / body_weight_kg,
            map_wkg: model.apr.po3min / body_weight_kg,
            cp_wkg: model.cp / body_weight_kg,
        }
    }

    pub fn running_thresholds(model: &RunningModel) -> RunningThresholdSummary {
        RunningThresholdSummary {
            cs_speed: model.cs,
            cs_pace: model.cs_pace,
            d_prime_meters: model.d_prime,
            vo2max_pace: model.vo2max_pace,
            lt1_pace: model.lt1,
        }
    }

    /// Stitch five interior boundaries into six contiguous zones.
    fn build_zones<Z>(
        boundaries: &[f64; 5],
        names: &[&'static str; 6],
        domains: &[IntensityDomain; 6],
        make: impl Fn(u8, &'static str, f64, Option<f64>, IntensityDomain) -> Z,
    ) -> Vec<Z> {
        let mut zones = Vec::with_capacity(6);
        let mut lower = 0.0;
        for i in 0..6 {
            let upper = boundaries.get(i).copied();
            zones.push(make(i as u8 + 1, names[i], lower, upper, domains[i]));
            if let Some(upper) = upper {
                lower = upper;
            }
        }
        zones
    }
}
