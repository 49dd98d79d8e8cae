// Price range selection from summary statistics and a risk preference.
use crate::models::RiskProfile;
use shared::models::{PriceRange, StatisticalSummary};

pub struct RangeSelector;

impl RangeSelector {
    /// Symmetric interval of `multiplier × std_price` around the mean price.
    /// The lower bound is not clamped at zero.
    pub fn select(summary: &StatisticalSummary, risk: RiskProfile) -> PriceRange {
        let half_width = risk.multiplier() * summary.std_price;
        PriceRange {
            lowest: summary.mean_price - half_width,
            highest: summary.mean_price + half_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mean_price: f64, std_price: f64) -> StatisticalSummary {
        StatisticalSummary {
            mean_price,
            std_price,
            avg_amplitude: 1.0,
            sharpe_ratio: 0.5,
            var_95: -0.02,
            current_price: mean_price,
        }
    }

    #[test]
    fn test_medium_range() {
        let range = RangeSelector::select(&summary(100.0, 10.0), RiskProfile::Medium);
        assert_eq!(range, PriceRange { lowest: 80.0, highest: 120.0 });
    }

    #[test]
    fn test_ranges_are_nested() {
        let s = summary(57.3, 4.2);
        let low = RangeSelector::select(&s, RiskProfile::Low);
        let medium = RangeSelector::select(&s, RiskProfile::Medium);
        let high = RangeSelector::select(&s, RiskProfile::High);
        assert!(medium.contains(&low));
        assert!(high.contains(&medium));
        assert!(low.lowest > medium.lowest && medium.lowest > high.lowest);
        for r in [low, medium, high] {
            assert!((r.center() - 57.3).abs() < 1e-12);
            assert!(r.lowest < r.highest);
        }
    }

    #[test]
    fn test_lower_bound_not_clamped() {
        let range = RangeSelector::select(&summary(10.0, 8.0), RiskProfile::High);
        assert_eq!(range.lowest, -10.0);
        assert_eq!(range.highest, 30.0);
    }
}
