use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative risk preference; wider ranges for higher risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [RiskProfile::Low, RiskProfile::Medium, RiskProfile::High];

    /// Number of price standard deviations on each side of the mean.
    pub fn multiplier(self) -> f64 {
        match self {
            RiskProfile::Low => 1.5,
            RiskProfile::Medium => 2.0,
            RiskProfile::High => 2.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskProfile::Low => "low",
            RiskProfile::Medium => "medium",
            RiskProfile::High => "high",
        }
    }
}

impl FromStr for RiskProfile {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskProfile::Low),
            "medium" => Ok(RiskProfile::Medium),
            "high" => Ok(RiskProfile::High),
            _ => Err(EngineError::InvalidRiskLevel(s.trim().to_string())),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("LOW".parse::<RiskProfile>().unwrap(), RiskProfile::Low);
        assert_eq!(" Medium ".parse::<RiskProfile>().unwrap(), RiskProfile::Medium);
        assert_eq!("high".parse::<RiskProfile>().unwrap(), RiskProfile::High);
    }

    #[test]
    fn test_unknown_level_is_validation_error() {
        let err = "extreme".parse::<RiskProfile>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("'extreme'"));
    }

    #[test]
    fn test_multipliers_increase() {
        let m: Vec<f64> = RiskProfile::ALL.iter().map(|r| r.multiplier()).collect();
        assert_eq!(m, vec![1.5, 2.0, 2.5]);
    }

    #[test]
    fn test_display_round_trips() {
        for risk in RiskProfile::ALL {
            assert_eq!(risk.to_string().parse::<RiskProfile>().unwrap(), risk);
        }
    }
}
