// Summary statistics of a daily price series.
use crate::error::{EngineError, Result};
use crate::models::PriceSeries;
use shared::models::StatisticalSummary;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

/// Annual risk-free rate subtracted from the annualized mean return.
pub const RISK_FREE_RATE: f64 = 0.02;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Tail probability of the reported Value-at-Risk.
pub const VAR_TAIL_PROBABILITY: f64 = 0.05;

pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Computes the summary a grid range is derived from.
    ///
    /// Dispersion of closes is the population standard deviation; the return
    /// volatility used for the Sharpe ratio and VaR is the sample standard
    /// deviation. VaR is parametric: the 5% quantile of a normal distribution
    /// with the returns' mean and volatility.
    pub fn summarize(series: &PriceSeries) -> Result<StatisticalSummary> {
        series.ensure_min_len()?;

        let closes: Vec<f64> = series.closes().collect();
        let returns = series.daily_returns();

        let mean_price = closes.iter().mean();
        let std_price = closes.iter().population_std_dev();
        let avg_amplitude = series.candles().iter().map(|c| c.amplitude()).mean();

        let mean_return = returns.iter().mean();
        let return_volatility = returns.iter().std_dev();
        if !mean_return.is_finite() || !return_volatility.is_finite() || return_volatility == 0.0 {
            tracing::warn!(
                mean_return,
                return_volatility,
                "Daily returns have no usable volatility, Sharpe ratio is undefined"
            );
            return Err(EngineError::UndefinedSharpeRatio);
        }

        let sharpe_ratio = (mean_return * TRADING_DAYS_PER_YEAR - RISK_FREE_RATE)
            / (return_volatility * TRADING_DAYS_PER_YEAR.sqrt());
        let var_95 = Normal::new(mean_return, return_volatility)
            .map_err(|e| {
                tracing::warn!(error = %e, "Cannot build return distribution for VaR");
                EngineError::UndefinedSharpeRatio
            })?
            .inverse_cdf(VAR_TAIL_PROBABILITY);

        // ensure_min_len guarantees a last record
        let current_price = closes[closes.len() - 1];

        tracing::debug!(
            records = series.len(),
            mean_price,
            std_price,
            avg_amplitude,
            sharpe_ratio,
            var_95,
            "Computed price series statistics"
        );

        Ok(StatisticalSummary {
            mean_price,
            std_price,
            avg_amplitude,
            sharpe_ratio,
            var_95,
            current_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::price_series::test_support::{candles_from_closes, wavy_closes};

    // Standard normal 5% quantile
    const STANDARD_NORMAL_5PCT: f64 = -1.6448536269514722;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(candles_from_closes(closes)).unwrap()
    }

    fn alternating(len: usize) -> Vec<f64> {
        (0..len).map(|i| if i % 2 == 0 { 90.0 } else { 110.0 }).collect()
    }

    #[test]
    fn test_mean_and_population_std() {
        let summary = StatisticsEngine::summarize(&series(&alternating(20))).unwrap();
        assert!((summary.mean_price - 100.0).abs() < 1e-12);
        assert!((summary.std_price - 10.0).abs() < 1e-12);
        assert_eq!(summary.current_price, 110.0);
        assert!((summary.avg_amplitude - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharpe_and_var_follow_return_moments() {
        let closes = alternating(20);
        let s = series(&closes);
        let returns = s.daily_returns();
        let mean_r = returns.iter().sum::<f64>() / returns.len() as f64;
        let var_r = returns.iter().map(|r| (r - mean_r).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
        let std_r = var_r.sqrt();

        let summary = StatisticsEngine::summarize(&s).unwrap();
        let expected_sharpe = (mean_r * 252.0 - 0.02) / (std_r * 252f64.sqrt());
        assert!((summary.sharpe_ratio - expected_sharpe).abs() < 1e-10);
        let expected_var = mean_r + std_r * STANDARD_NORMAL_5PCT;
        assert!((summary.var_95 - expected_var).abs() < 1e-10);
        assert!(summary.var_95 < mean_r);
    }

    #[test]
    fn test_flat_prices_make_sharpe_undefined() {
        let err = StatisticsEngine::summarize(&series(&[50.0; 25])).unwrap_err();
        assert!(matches!(err, EngineError::UndefinedSharpeRatio));
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_short_series_is_data_error() {
        let err = StatisticsEngine::summarize(&series(&wavy_closes(10))).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { actual: 10, .. }));
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let s = series(&wavy_closes(60));
        let a = StatisticsEngine::summarize(&s).unwrap();
        let b = StatisticsEngine::summarize(&s).unwrap();
        assert_eq!(a.sharpe_ratio.to_bits(), b.sharpe_ratio.to_bits());
        assert_eq!(a.var_95.to_bits(), b.var_95.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_var_from_known_returns() {
        // +2% and -1% alternating: mean 0.005, sample std sqrt(20 * 0.015^2 / 19)
        let mut closes = vec![100.0];
        for i in 0..20 {
            let r = if i % 2 == 0 { 0.02 } else { -0.01 };
            let next = closes[i] * (1.0 + r);
            closes.push(next);
        }
        let summary = StatisticsEngine::summarize(&series(&closes)).unwrap();

        let std_r = (20.0 * 0.015f64.powi(2) / 19.0).sqrt();
        assert!((std_r - 0.01538967528127731).abs() < 1e-15);
        assert!((summary.var_95 - (0.005 + STANDARD_NORMAL_5PCT * std_r)).abs() < 1e-9);
        assert!((summary.var_95 - -0.0203137632040144).abs() < 1e-9);
        assert!((summary.sharpe_ratio - 5.075653405778494).abs() < 1e-6);
    }
}
