//! Athlete scoring, profile classification and rarity tiers.
//!
//! Converts a fitted model into five duration (or distance) scores against
//! sex-specific benchmarks, an overall rating, a Z-score specialization
//! profile and a rarity tier. The classifier is a relative-peak detector:
//! it flags the athlete's single strongest slot when it stands out
//! statistically from their own other four, not against any absolute bar.

use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

use crate::evaluator::PowerDurationEvaluator;
use crate::models::{CyclingModel, RunningModel, Sex};

/// Benchmark normalization multiplier: a benchmark-level performance scores 95.
pub const SCORE_SCALE: f64 = 95.0;
/// Z-score above which the peak slot marks a specialist.
pub const SPECIALIZATION_Z_THRESHOLD: f64 = 1.0;
/// Body-weight boundary between climber and time-trialist builds, kg.
pub const CLIMBER_WEIGHT_LIMIT_KG: f64 = 70.0;

/// Scored cycling durations in seconds: 5 s, 1 min, 5 min, 20 min, 60 min.
pub const CYCLING_SCORE_DURATIONS: [f64; 5] = [5.0, 60.0, 300.0, 1200.0, 3600.0];
/// Scored running distances in metres: 1500 m, 5000 m, 10 km, half, marathon.
pub const RUNNING_SCORE_DISTANCES: [f64; 5] = [1500.0, 5000.0, 10000.0, 21097.5, 42195.0];

/// Labels for the five cycling score slots, in duration order.
pub const CYCLING_SLOT_LABELS: [&str; 5] = ["NM", "LACT", "VO2", "THR", "STA"];
/// Labels for the five running score slots, in distance order.
pub const RUNNING_SLOT_LABELS: [&str; 5] = ["1500m", "5000m", "10km", "Half", "Marathon"];

/// Sex-specific W/kg benchmarks for the cycling slots.
const MALE_CYCLING_BENCHMARKS_WKG: [f64; 5] = [24.65, 11.33, 7.65, 6.59, 5.76];
const FEMALE_CYCLING_BENCHMARKS_WKG: [f64; 5] = [17.2, 9.4, 6.5, 5.5, 4.9];

/// Sex-specific world-record benchmarks for the running slots, seconds.
const MALE_RUNNING_BENCHMARKS_SECS: [f64; 5] = [206.0, 769.0, 1584.0, 3451.0, 7235.0];
const FEMALE_RUNNING_BENCHMARKS_SECS: [f64; 5] = [229.0, 853.0, 1801.0, 3916.0, 8221.0];

/// Running race scoring keeps the CS-D' prediction up to this implied time.
const SCORING_CS_LIMIT_SECS: f64 = 960.0;

/// Rarity tier derived from the overall rating. Canonical scheme; the card
/// visuals use [`RarityTier::card_label`] as a pure presentation remap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RarityTier {
    Alien,
    Hero,
    Pro,
    Elite,
    Standard,
}

impl RarityTier {
    /// Tier thresholds: 100 / 95 / 90 / 85.
    pub fn from_rating(overall_rating: u32) -> Self {
        match overall_rating {
            r if r >= 100 => RarityTier::Alien,
            r if r >= 95 => RarityTier::Hero,
            r if r >= 90 => RarityTier::Pro,
            r if r >= 85 => RarityTier::Elite,
            _ => RarityTier::Standard,
        }
    }

    /// Card-visual label scheme layered on the same rating.
    pub fn card_label(&self) -> &'static str {
        match self {
            RarityTier::Alien | RarityTier::Hero => "GOAT",
            RarityTier::Pro => "LEGGENDA",
            RarityTier::Elite => "ELITE",
            RarityTier::Standard => "BASE",
        }
    }
}

/// Cycling rider specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclingProfile {
    Sprinter,
    Puncheur,
    Climber,
    TimeTrialist,
    AllRounder,
}

/// Running athlete specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunningProfile {
    FastMiddleDistance,
    MiddleDistance,
    LongDistance,
    HalfMarathonSpecialist,
    Marathoner,
    AllRounder,
}

/// One scored slot: label plus its 0-100-ish score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSlot {
    pub label: &'static str,
    pub score: u32,
}

/// Complete cycling athlete profile, recomputed on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclingAthleteProfile {
    pub stats: [ScoreSlot; 5],
    pub overall_rating: u32,
    pub profile: CyclingProfile,
    pub rarity: RarityTier,
}

/// Complete running athlete profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunningAthleteProfile {
    pub stats: [ScoreSlot; 5],
    pub overall_rating: u32,
    pub profile: RunningProfile,
    pub rarity: RarityTier,
}

/// Scoring engine.
pub struct AthleteScorer;

impl AthleteScorer {
    /// Score a cycling model against sex-specific W/kg benchmarks.
    pub fn cycling_profile(
        model: &CyclingModel,
        body_weight_kg: f64,
        sex: Sex,
    ) -> CyclingAthleteProfile {
        let benchmarks = match sex {
            Sex::Male => &MALE_CYCLING_BENCHMARKS_WKG,
            Sex::Female => &FEMALE_CYCLING_BENCHMARKS_WKG,
        };

        let mut scores = [0u32; 5];
        for (i, &duration) in CYCLING_SCORE_DURATIONS.iter().enumerate() {
            let watts = PowerDurationEvaluator::power_at(model, duration).watts;
            let wkg = watts / body_weight_kg;
            scores[i] = (wkg / benchmarks[i] * SCORE_SCALE).round() as u32;
        }

        let overall_rating = Self::overall_rating(&scores);
        let profile = Self::classify_cycling(&scores, body_weight_kg);
        debug!(overall_rating, ?profile, "scored cycling athlete");

        CyclingAthleteProfile {
            stats: Self::slots(&CYCLING_SLOT_LABELS, &scores),
            overall_rating,
            profile,
            rarity: RarityTier::from_rating(overall_rating),
        }
    }

    /// Score a running model against sex-specific world-record times.
    ///
    /// Lower predicted time is better, hence the inverted ratio.
    pub fn running_profile(model: &RunningModel, sex: Sex) -> RunningAthleteProfile {
        let benchmarks = match sex {
            Sex::Male => &MALE_RUNNING_BENCHMARKS_SECS,
            Sex::Female => &FEMALE_RUNNING_BENCHMARKS_SECS,
        };

        let mut scores = [0u32; 5];
        for (i, &distance) in RUNNING_SCORE_DISTANCES.iter().enumerate() {
            let predicted = Self::predicted_race_time(model, distance);
            scores[i] = Self::race_score(benchmarks[i], predicted);
        }

        let overall_rating = Self::overall_rating(&scores);
        let profile = Self::classify_running(&scores);
        debug!(overall_rating, ?profile, "scored running athlete");

        RunningAthleteProfile {
            stats: Self::slots(&RUNNING_SLOT_LABELS, &scores),
            overall_rating,
            profile,
            rarity: RarityTier::from_rating(overall_rating),
        }
    }

    /// Race-time prediction for scoring. Note the 960 s CS-D' cutoff here:
    /// the scoring path has always used 16 minutes where the interactive
    /// calculators use 17, and the two are kept as-is.
    pub fn predicted_race_time(model: &RunningModel, distance_m: f64) -> f64 {
        let implied = (distance_m - model.d_prime) / model.cs;
        if implied <= SCORING_CS_LIMIT_SECS {
            implied.max(0.0)
        } else {
            (distance_m / model.power_law.scale).powf(1.0 / model.power_law.exponent)
        }
    }

    /// Benchmark-relative score for one race slot. A D' at or beyond the
    /// race distance collapses the CS-D' prediction to zero; that slot
    /// scores 0 instead of letting the ratio saturate the integer cast.
    fn race_score(benchmark_secs: f64, predicted_secs: f64) -> u32 {
        if predicted_secs <= 0.0 {
            return 0;
        }
        (benchmark_secs / predicted_secs * SCORE_SCALE).round() as u32
    }

    /// Mean of the five slot scores, rounded.
    fn overall_rating(scores: &[u32; 5]) -> u32 {
        let values: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
        values.iter().mean().round() as u32
    }

    /// Index of the specialist peak, or `None` for a generalist.
    ///
    /// Z-scores use the population standard deviation of the athlete's own
    /// five scores. A flat score line (zero deviation) is a generalist by
    /// definition. Ties resolve to the earliest slot.
    pub fn specialist_index(scores: &[u32; 5]) -> Option<usize> {
        let values: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
        let mean = values.iter().mean();
        let std_dev = values.iter().population_std_dev();
        if !(std_dev > 0.0) {
            return None;
        }

        let mut peak = 0;
        let mut max_z = f64::NEG_INFINITY;
        for (i, value) in values.iter().enumerate() {
            let z = (value - mean) / std_dev;
            if z > max_z {
                max_z = z;
                peak = i;
            }
        }

        (max_z > SPECIALIZATION_Z_THRESHOLD).then_some(peak)
    }

    fn classify_cycling(scores: &[u32; 5], body_weight_kg: f64) -> CyclingProfile {
        match Self::specialist_index(scores) {
            Some(0) => CyclingProfile::Sprinter,
            Some(1) | Some(2) => CyclingProfile::Puncheur,
            Some(3) | Some(4) => {
                if body_weight_kg <= CLIMBER_WEIGHT_LIMIT_KG {
                    CyclingProfile::Climber
                } else {
                    CyclingProfile::TimeTrialist
                }
            }
            _ => CyclingProfile::AllRounder,
        }
    }

    fn classify_running(scores: &[u32; 5]) -> RunningProfile {
        match Self::specialist_index(scores) {
            Some(0) => RunningProfile::FastMiddleDistance,
            Some(1) => RunningProfile::MiddleDistance,
            Some(2) => RunningProfile::LongDistance,
            Some(3) => RunningProfile::HalfMarathonSpecialist,
            Some(4) => RunningProfile::Marathoner,
            _ => RunningProfile::AllRounder,
        }
    }

    fn slots(labels: &[&'static str; 5], scores: &[u32; 5]) -> [ScoreSlot; 5] {
        let mut slots = [ScoreSlot {
            label: "",
            score: 0,
        }; 5];
        for i in 0..5 {
            slots[i] = ScoreSlot {
                label: labels[i],
                score: scores[i],
            };
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycling::CyclingFitter;
    use crate::models::{CyclingTestInputs, RunningTestInputs};
    use crate::running::RunningFitter;

    fn cycling_model() -> CyclingModel {
        CyclingFitter::fit(&CyclingTestInputs {
            pmax_power: 1110.0,
            severe_power: 397.0,
            severe_time: 240.0,
            threshold_power: 348.0,
            threshold_time: 902.0,
            short_test: None,
            long_test: None,
        })
        .unwrap()
    }

    fn running_model() -> RunningModel {
        RunningFitter::fit(&RunningTestInputs {
            severe_distance: 870.0,
            severe_time: 180.0,
            threshold_distance: 3030.0,
            threshold_time: 720.0,
            long_test: None,
        })
        .unwrap()
    }

    #[test]
    fn test_cycling_profile_has_five_ordered_slots() {
        let profile = AthleteScorer::cycling_profile(&cycling_model(), 72.0, Sex::Male);
        let labels: Vec<&str> = profile.stats.iter().map(|s| s.label).collect();
        assert_eq!(labels, CYCLING_SLOT_LABELS);
        assert!(profile.stats.iter().all(|s| s.score > 0));
    }

    #[test]
    fn test_female_benchmarks_score_higher_for_same_output() {
        let model = cycling_model();
        let male = AthleteScorer::cycling_profile(&model, 72.0, Sex::Male);
        let female = AthleteScorer::cycling_profile(&model, 72.0, Sex::Female);
        assert!(female.overall_rating > male.overall_rating);
    }

    #[test]
    fn test_score_monotonicity_in_severe_power() {
        let base = CyclingTestInputs {
            pmax_power: 1110.0,
            severe_power: 397.0,
            severe_time: 240.0,
            threshold_power: 348.0,
            threshold_time: 902.0,
            short_test: None,
            long_test: None,
        };
        let mut stronger = base.clone();
        stronger.severe_power = 420.0;

        let weak = AthleteScorer::cycling_profile(
            &CyclingFitter::fit(&base).unwrap(),
            72.0,
            Sex::Male,
        );
        let strong = AthleteScorer::cycling_profile(
            &CyclingFitter::fit(&stronger).unwrap(),
            72.0,
            Sex::Male,
        );
        assert!(strong.overall_rating >= weak.overall_rating);
    }

    #[test]
    fn test_specialist_detected_above_z_threshold() {
        // one score a clear standout over a flat base
        let scores = [90, 60, 60, 60, 60];
        assert_eq!(AthleteScorer::specialist_index(&scores), Some(0));
    }

    #[test]
    fn test_balanced_scores_are_generalist() {
        let scores = [62, 60, 61, 60, 62];
        assert_eq!(AthleteScorer::specialist_index(&scores), None);
    }

    #[test]
    fn test_flat_scores_are_generalist() {
        let scores = [60, 60, 60, 60, 60];
        assert_eq!(AthleteScorer::specialist_index(&scores), None);
    }

    #[test]
    fn test_classification_invariant_under_uniform_shift() {
        let scores = [90, 60, 60, 60, 60];
        let shifted = [110, 80, 80, 80, 80];
        assert_eq!(
            AthleteScorer::specialist_index(&scores),
            AthleteScorer::specialist_index(&shifted)
        );
    }

    #[test]
    fn test_uniform_scaling_preserves_classification_but_not_rating() {
        // z-scores divide centered values by the spread, so doubling every
        // score leaves the specialist unchanged
        let scores = [90, 60, 60, 60, 60];
        let doubled = [180, 120, 120, 120, 120];
        assert_eq!(
            AthleteScorer::specialist_index(&scores),
            AthleteScorer::specialist_index(&doubled)
        );

        // the rest of the profile is not scale-free: the mean doubles and
        // drags the rarity tier with it
        assert_eq!(RarityTier::from_rating(66), RarityTier::Standard);
        assert_eq!(RarityTier::from_rating(132), RarityTier::Alien);
    }

    #[test]
    fn test_threshold_specialist_splits_on_body_weight() {
        let scores = [60, 60, 60, 90, 60];
        assert_eq!(
            AthleteScorer::classify_cycling(&scores, 65.0),
            CyclingProfile::Climber
        );
        assert_eq!(
            AthleteScorer::classify_cycling(&scores, 80.0),
            CyclingProfile::TimeTrialist
        );
    }

    #[test]
    fn test_sprint_specialist_maps_to_sprinter() {
        let scores = [95, 60, 60, 60, 60];
        assert_eq!(
            AthleteScorer::classify_cycling(&scores, 72.0),
            CyclingProfile::Sprinter
        );
    }

    #[test]
    fn test_running_specialist_mapping_is_one_to_one() {
        let expectations = [
            RunningProfile::FastMiddleDistance,
            RunningProfile::MiddleDistance,
            RunningProfile::LongDistance,
            RunningProfile::HalfMarathonSpecialist,
            RunningProfile::Marathoner,
        ];
        for (peak, expected) in expectations.iter().enumerate() {
            let mut scores = [60u32; 5];
            scores[peak] = 95;
            assert_eq!(AthleteScorer::classify_running(&scores), *expected);
        }
    }

    #[test]
    fn test_rarity_tier_thresholds() {
        assert_eq!(RarityTier::from_rating(101), RarityTier::Alien);
        assert_eq!(RarityTier::from_rating(100), RarityTier::Alien);
        assert_eq!(RarityTier::from_rating(97), RarityTier::Hero);
        assert_eq!(RarityTier::from_rating(92), RarityTier::Pro);
        assert_eq!(RarityTier::from_rating(85), RarityTier::Elite);
        assert_eq!(RarityTier::from_rating(84), RarityTier::Standard);
    }

    #[test]
    fn test_card_labels_remap_canonical_tiers() {
        assert_eq!(RarityTier::Alien.card_label(), "GOAT");
        assert_eq!(RarityTier::Hero.card_label(), "GOAT");
        assert_eq!(RarityTier::Pro.card_label(), "LEGGENDA");
        assert_eq!(RarityTier::Elite.card_label(), "ELITE");
        assert_eq!(RarityTier::Standard.card_label(), "BASE");
    }

    #[test]
    fn test_running_scoring_uses_16_minute_cutoff() {
        let model = running_model();
        // 1500 m implies ~340 s, well under the cutoff
        let t1500 = AthleteScorer::predicted_race_time(&model, 1500.0);
        assert!((t1500 - (1500.0 - model.d_prime) / model.cs).abs() < 1e-9);

        // marathon goes through the power law
        let marathon = AthleteScorer::predicted_race_time(&model, 42195.0);
        let pl = (42195.0 / model.power_law.scale).powf(1.0 / model.power_law.exponent);
        assert!((marathon - pl).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_race_prediction_scores_zero() {
        // D' above 1500 m collapses the shortest race prediction to zero
        let model = RunningFitter::fit(&RunningTestInputs {
            severe_distance: 2000.0,
            severe_time: 100.0,
            threshold_distance: 3000.0,
            threshold_time: 800.0,
            long_test: None,
        })
        .unwrap();
        assert!(model.d_prime > 1500.0);
        assert_eq!(AthleteScorer::predicted_race_time(&model, 1500.0), 0.0);

        let profile = AthleteScorer::running_profile(&model, Sex::Male);
        assert_eq!(profile.stats[0].score, 0);
        assert!(profile.stats.iter().all(|s| s.score < 1000));
        assert_ne!(profile.rarity, RarityTier::Alien);
    }

    #[test]
    fn test_running_profile_scores_increase_with_speed() {
        let slow = RunningFitter::fit(&RunningTestInputs {
            severe_distance: 870.0,
            severe_time: 180.0,
            threshold_distance: 3030.0,
            threshold_time: 720.0,
            long_test: None,
        })
        .unwrap();
        let fast = RunningFitter::fit(&RunningTestInputs {
            severe_distance: 960.0,
            severe_time: 180.0,
            threshold_distance: 3300.0,
            threshold_time: 720.0,
            long_test: None,
        })
        .unwrap();
        let slow_profile = AthleteScorer::running_profile(&slow, Sex::Male);
        let fast_profile = AthleteScorer::running_profile(&fast, Sex::Male);
        assert!(fast_profile.overall_rating >= slow_profile.overall_rating);
    }
}
