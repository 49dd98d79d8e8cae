// Synchronous grid parameter pipeline: validate, summarize, select range, optimize each horizon.
use crate::analytics::{GridOptimizer, RangeSelector, StatisticsEngine};
use crate::error::{EngineError, Result};
use crate::models::{CostModel, PriceSeries, RiskProfile};
use shared::models::{GridParameters, HorizonStrategy, PriceRange, StatisticalSummary};

/// Caller choices for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    /// Investment horizons in days, in the order results should be reported.
    pub horizons: Vec<u32>,
    pub risk: RiskProfile,
    pub cost: CostModel,
}

impl GridRequest {
    pub fn new(horizons: Vec<u32>, risk: RiskProfile, cost: CostModel) -> Self {
        Self { horizons, risk, cost }
    }
}

/// Everything computed before the per-horizon searches.
#[derive(Debug, Clone, Copy)]
pub struct PreparedGrid {
    pub summary: StatisticalSummary,
    pub range: PriceRange,
    pub optimizer: GridOptimizer,
}

pub struct GridParameterCalculator;

impl GridParameterCalculator {
    /// Full pipeline. Horizons are optimized sequentially in request order and
    /// the first failure aborts the calculation.
    pub fn compute(series: &PriceSeries, request: &GridRequest) -> Result<GridParameters> {
        let horizons = Self::validate(series, request)?;
        let prepared = Self::prepare(series, request)?;

        let mut per_horizon = Vec::with_capacity(horizons.len());
        for horizon_days in horizons {
            let result = prepared.optimizer.optimize(horizon_days)?;
            per_horizon.push(HorizonStrategy { horizon_days, result });
        }
        Ok(Self::assemble(&prepared, per_horizon))
    }

    /// Checks the request and the series length. Returns the horizons to
    /// evaluate: request order, repeated horizons reported once.
    pub fn validate(series: &PriceSeries, request: &GridRequest) -> Result<Vec<u32>> {
        let horizons = Self::normalize_horizons(&request.horizons)?;
        series.ensure_min_len()?;
        Ok(horizons)
    }

    pub fn normalize_horizons(horizons: &[u32]) -> Result<Vec<u32>> {
        if horizons.is_empty() {
            return Err(EngineError::NoHorizons);
        }
        let mut unique: Vec<u32> = Vec::with_capacity(horizons.len());
        for &h in horizons {
            if h == 0 {
                return Err(EngineError::InvalidHorizon(0));
            }
            if !unique.contains(&h) {
                unique.push(h);
            }
        }
        Ok(unique)
    }

    /// Statistics, price range and a ready optimizer for the request.
    pub fn prepare(series: &PriceSeries, request: &GridRequest) -> Result<PreparedGrid> {
        let summary = StatisticsEngine::summarize(series)?;
        let range = RangeSelector::select(&summary, request.risk);
        tracing::info!(
            risk = %request.risk,
            lowest = range.lowest,
            highest = range.highest,
            sharpe_ratio = summary.sharpe_ratio,
            "Selected grid price range"
        );
        let optimizer = GridOptimizer::new(range, request.cost).with_avg_amplitude(summary.avg_amplitude);
        Ok(PreparedGrid {
            summary,
            range,
            optimizer,
        })
    }

    pub fn assemble(prepared: &PreparedGrid, per_horizon: Vec<HorizonStrategy>) -> GridParameters {
        GridParameters {
            price_range: prepared.range,
            current_price: prepared.summary.current_price,
            sharpe_ratio: prepared.summary.sharpe_ratio,
            var_95: prepared.summary.var_95,
            per_horizon,
        }
    }
}

/// Entry point taking the inputs one by one.
pub fn compute_grid_parameters(
    series: &PriceSeries,
    horizons: &[u32],
    risk: RiskProfile,
    commission_rate: f64,
    fixed_fee: f64,
    trade_volume: f64,
) -> Result<GridParameters> {
    let cost = CostModel::new(commission_rate, fixed_fee, trade_volume)?;
    GridParameterCalculator::compute(series, &GridRequest::new(horizons.to_vec(), risk, cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::price_series::test_support::{candles_from_closes, wavy_closes};

    fn series(len: usize) -> PriceSeries {
        PriceSeries::new(candles_from_closes(&wavy_closes(len))).unwrap()
    }

    fn request(horizons: Vec<u32>, risk: RiskProfile) -> GridRequest {
        GridRequest::new(horizons, risk, CostModel::new(0.001, 0.01, 100.0).unwrap())
    }

    #[test]
    fn test_results_follow_requested_order() {
        let params = GridParameterCalculator::compute(&series(120), &request(vec![180, 30, 90], RiskProfile::Medium)).unwrap();
        assert_eq!(params.horizons().collect::<Vec<_>>(), vec![180, 30, 90]);
        assert!((20..=50).contains(&params.strategy_for(180).unwrap().grid_count));
        assert!((5..=15).contains(&params.strategy_for(30).unwrap().grid_count));
        assert!((10..=25).contains(&params.strategy_for(90).unwrap().grid_count));
    }

    #[test]
    fn test_aggregate_matches_components() {
        let s = series(120);
        let req = request(vec![30], RiskProfile::High);
        let params = GridParameterCalculator::compute(&s, &req).unwrap();

        let summary = StatisticsEngine::summarize(&s).unwrap();
        let range = RangeSelector::select(&summary, RiskProfile::High);
        assert_eq!(params.price_range, range);
        assert_eq!(params.current_price, summary.current_price);
        assert_eq!(params.sharpe_ratio, summary.sharpe_ratio);
        assert_eq!(params.var_95, summary.var_95);
        let expected = GridOptimizer::new(range, req.cost).optimize(30).unwrap();
        assert_eq!(params.strategy_for(30), Some(&expected));
    }

    #[test]
    fn test_identical_inputs_identical_outputs() {
        let s = series(90);
        let req = request(vec![14, 60, 200], RiskProfile::Low);
        let a = GridParameterCalculator::compute(&s, &req).unwrap();
        let b = GridParameterCalculator::compute(&s, &req).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.per_horizon.iter().zip(&b.per_horizon) {
            assert_eq!(x.result.estimated_profit.to_bits(), y.result.estimated_profit.to_bits());
        }
    }

    #[test]
    fn test_short_series_fails_before_statistics() {
        let err = GridParameterCalculator::compute(&series(10), &request(vec![30], RiskProfile::Medium)).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { required: 20, actual: 10 }));
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_invalid_horizons() {
        let s = series(60);
        assert!(matches!(
            GridParameterCalculator::compute(&s, &request(vec![], RiskProfile::Medium)),
            Err(EngineError::NoHorizons)
        ));
        let err = GridParameterCalculator::compute(&s, &request(vec![30, 0], RiskProfile::Medium)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidHorizon(0)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_repeated_horizons_reported_once() {
        assert_eq!(GridParameterCalculator::normalize_horizons(&[90, 30, 90]).unwrap(), vec![90, 30]);
    }

    #[test]
    fn test_unprofitable_horizon_aborts_calculation() {
        let cost = CostModel::new(0.5, 1000.0, 1.0).unwrap();
        let err = GridParameterCalculator::compute(&series(60), &GridRequest::new(vec![30, 90], RiskProfile::Low, cost))
            .unwrap_err();
        assert!(matches!(err, EngineError::NoProfitableGrid { horizon: 30 }));
    }

    #[test]
    fn test_flat_series_is_computation_error() {
        let flat = PriceSeries::new(candles_from_closes(&[42.0; 30])).unwrap();
        let err = GridParameterCalculator::compute(&flat, &request(vec![30], RiskProfile::Medium)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_entry_point_validates_costs() {
        let err = compute_grid_parameters(&series(60), &[30], RiskProfile::Medium, 0.001, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTradeVolume(_)));
        let ok = compute_grid_parameters(&series(60), &[30, 90], RiskProfile::Medium, 0.001, 0.01, 100.0).unwrap();
        assert_eq!(ok.per_horizon.len(), 2);
    }
}
