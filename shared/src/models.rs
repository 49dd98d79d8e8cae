use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Intraday range of the record (high - low).
    pub fn amplitude(&self) -> f64 {
        self.high - self.low
    }
}

/// Statistics derived once from a price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub mean_price: f64,
    /// Population standard deviation of the close prices.
    pub std_price: f64,
    pub avg_amplitude: f64,
    /// Annualized Sharpe ratio of the daily close-to-close returns.
    pub sharpe_ratio: f64,
    /// 5th percentile of the fitted normal return distribution (a daily return, usually negative).
    pub var_95: f64,
    pub current_price: f64,
}

/// Closed price interval a grid is laid over. `lowest` is not clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub lowest: f64,
    pub highest: f64,
}

impl PriceRange {
    pub fn width(&self) -> f64 {
        self.highest - self.lowest
    }

    pub fn center(&self) -> f64 {
        (self.lowest + self.highest) / 2.0
    }

    /// True when `other` lies entirely within this range.
    pub fn contains(&self, other: &PriceRange) -> bool {
        self.lowest <= other.lowest && other.highest <= self.highest
    }
}

/// Winning candidate of a grid search for one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub grid_count: u32,
    pub grid_size: f64,
    pub estimated_profit: f64,
}

impl GridSearchResult {
    pub fn estimated_daily_profit(&self, horizon_days: u32) -> f64 {
        self.estimated_profit / f64::from(horizon_days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonStrategy {
    pub horizon_days: u32,
    pub result: GridSearchResult,
}

/// Aggregate produced by one calculation. `per_horizon` keeps the order the
/// horizons were requested in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParameters {
    pub price_range: PriceRange,
    pub current_price: f64,
    pub sharpe_ratio: f64,
    pub var_95: f64,
    pub per_horizon: Vec<HorizonStrategy>,
}

impl GridParameters {
    pub fn strategy_for(&self, horizon_days: u32) -> Option<&GridSearchResult> {
        self.per_horizon
            .iter()
            .find(|s| s.horizon_days == horizon_days)
            .map(|s| &s.result)
    }

    pub fn horizons(&self) -> impl Iterator<Item = u32> + '_ {
        self.per_horizon.iter().map(|s| s.horizon_days)
    }
}
