use crate::domain::PlanetLabel;
use serde::{Deserialize, Serialize};

/// Width of the STRONG CANDIDATE band below the threshold.
pub const STRONG_BAND: f64 = 0.15;
/// Distance below the threshold where FALSE POSITIVE starts.
pub const WEAK_BAND: f64 = 0.30;

/// Tolerance for float noise at the computed lower edges: `0.7 - 0.3`
/// evaluates to `0.39999999999999997`, and a confidence of exactly `0.4` must
/// still land in the higher band. The threshold itself is compared exactly.
const EDGE_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Classification threshold `T`.
///
/// Not clamped: values outside `[0, 1]` are kept as given, so bands may become
/// unreachable (e.g. `T < 0.3` leaves no room for FALSE POSITIVE in `[0, 1]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

fn at_or_above(confidence: f64, edge: f64) -> bool {
    confidence >= edge - EDGE_TOLERANCE
}

/// Map a confidence to its band under `threshold`. Lower edges are inclusive.
pub fn classify(confidence: f64, threshold: Threshold) -> PlanetLabel {
    let t = threshold.value();
    if confidence >= t {
        PlanetLabel::ConfirmedPlanet
    } else if at_or_above(confidence, t - STRONG_BAND) {
        PlanetLabel::StrongCandidate
    } else if at_or_above(confidence, t - WEAK_BAND) {
        PlanetLabel::WeakCandidate
    } else {
        PlanetLabel::FalsePositive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn threshold_boundary_is_confirmed() {
        let t = Threshold::new(0.7);
        assert_eq!(classify(0.7, t), PlanetLabel::ConfirmedPlanet);
        assert_eq!(classify(0.69999, t), PlanetLabel::StrongCandidate);
        assert_eq!(classify(0.95, t), PlanetLabel::ConfirmedPlanet);
    }

    #[test]
    fn just_below_threshold_is_not_confirmed() {
        let t = Threshold::new(0.7);
        assert_eq!(classify(0.7 - 1e-12, t), PlanetLabel::StrongCandidate);
        assert_eq!(classify(0.7 - 1e-10, t), PlanetLabel::StrongCandidate);
        assert_eq!(classify(f64::from_bits(0.7f64.to_bits() - 1), t), PlanetLabel::StrongCandidate);
    }

    #[test]
    fn lower_edges_belong_to_the_higher_band() {
        let t = Threshold::new(0.7);
        assert_eq!(classify(0.55, t), PlanetLabel::StrongCandidate);
        assert_eq!(classify(0.5499, t), PlanetLabel::WeakCandidate);
        assert_eq!(classify(0.4, t), PlanetLabel::WeakCandidate);
        assert_eq!(classify(0.3999, t), PlanetLabel::FalsePositive);
        assert_eq!(classify(0.39, t), PlanetLabel::FalsePositive);
        assert_eq!(classify(0.0, t), PlanetLabel::FalsePositive);
    }

    #[test]
    fn low_threshold_makes_false_positive_unreachable() {
        let t = Threshold::new(0.2);
        assert_eq!(classify(0.0, t), PlanetLabel::WeakCandidate);
    }

    #[test]
    fn threshold_is_not_clamped() {
        let t = Threshold::new(1.5);
        assert_eq!(t.value(), 1.5);
        assert_eq!(classify(1.0, t), PlanetLabel::FalsePositive);
    }

    proptest! {
        #[test]
        fn bands_are_monotone_in_confidence(
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
            t in 0.0f64..=1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            // Higher confidence never yields a lower band (PlanetLabel orders high band first).
            prop_assert!(classify(hi, Threshold::new(t)) <= classify(lo, Threshold::new(t)));
        }

        #[test]
        fn classification_is_deterministic(c in 0.0f64..=1.0, t in 0.0f64..=1.0) {
            let th = Threshold::new(t);
            prop_assert_eq!(classify(c, th), classify(c, th));
        }

        #[test]
        fn each_label_matches_its_interval(c in 0.0f64..=1.0, t in 0.35f64..=1.0) {
            let label = classify(c, Threshold::new(t));
            let expected = if c >= t {
                PlanetLabel::ConfirmedPlanet
            } else if c >= t - STRONG_BAND - EDGE_TOLERANCE {
                PlanetLabel::StrongCandidate
            } else if c >= t - WEAK_BAND - EDGE_TOLERANCE {
                PlanetLabel::WeakCandidate
            } else {
                PlanetLabel::FalsePositive
            };
            prop_assert_eq!(label, expected);
        }
    }
}
