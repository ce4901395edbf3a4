use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold-derived classification shown to the user.
///
/// Variants are declared from the highest band to the lowest, so the derived
/// `Ord` sorts summaries in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetLabel {
    #[serde(rename = "CONFIRMED PLANET")]
    ConfirmedPlanet,
    #[serde(rename = "STRONG CANDIDATE")]
    StrongCandidate,
    #[serde(rename = "WEAK CANDIDATE")]
    WeakCandidate,
    #[serde(rename = "FALSE POSITIVE")]
    FalsePositive,
}

impl PlanetLabel {
    pub const ALL: [PlanetLabel; 4] = [
        PlanetLabel::ConfirmedPlanet,
        PlanetLabel::StrongCandidate,
        PlanetLabel::WeakCandidate,
        PlanetLabel::FalsePositive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlanetLabel::ConfirmedPlanet => "CONFIRMED PLANET",
            PlanetLabel::StrongCandidate => "STRONG CANDIDATE",
            PlanetLabel::WeakCandidate => "WEAK CANDIDATE",
            PlanetLabel::FalsePositive => "FALSE POSITIVE",
        }
    }
}

impl fmt::Display for PlanetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown classification label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for PlanetLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PlanetLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Categorical tag derived from the scorer's raw label code.
///
/// `"1"` and `"0"` are the service's binary codes; any other code is
/// upper-cased and kept as is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionTag(String);

impl PredictionTag {
    pub const CONFIRMED: &'static str = "CONFIRMED";
    pub const FALSE: &'static str = "FALSE";

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "1" => Self(Self::CONFIRMED.to_string()),
            "0" => Self(Self::FALSE.to_string()),
            other => Self(other.to_uppercase()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PredictionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_display() {
        for label in PlanetLabel::ALL {
            assert_eq!(label.to_string().parse::<PlanetLabel>(), Ok(label));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            " weak candidate ".parse::<PlanetLabel>(),
            Ok(PlanetLabel::WeakCandidate)
        );
        assert!("PC".parse::<PlanetLabel>().is_err());
    }

    #[test]
    fn ordering_follows_bands() {
        let mut labels = vec![
            PlanetLabel::FalsePositive,
            PlanetLabel::ConfirmedPlanet,
            PlanetLabel::WeakCandidate,
            PlanetLabel::StrongCandidate,
        ];
        labels.sort();
        assert_eq!(labels, PlanetLabel::ALL.to_vec());
    }

    #[test]
    fn tag_maps_binary_codes() {
        assert_eq!(PredictionTag::from_raw("1").as_str(), "CONFIRMED");
        assert_eq!(PredictionTag::from_raw("0").as_str(), "FALSE");
        assert_eq!(PredictionTag::from_raw("pc").as_str(), "PC");
        assert_eq!(PredictionTag::from_raw("False Positive").as_str(), "FALSE POSITIVE");
    }

    #[test]
    fn label_serializes_with_display_name() {
        let json = serde_json::to_string(&PlanetLabel::StrongCandidate).unwrap();
        assert_eq!(json, "\"STRONG CANDIDATE\"");
    }
}
