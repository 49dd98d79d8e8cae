// Brute-force grid count search for one investment horizon.
use crate::error::{EngineError, Result};
use crate::models::CostModel;
use shared::models::{GridSearchResult, PriceRange};
use std::ops::RangeInclusive;

/// Candidate grid counts for horizons up to `max_horizon_days` (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTier {
    pub max_horizon_days: u32,
    pub min_grids: u32,
    pub max_grids: u32,
}

/// Short, medium and long horizon tiers. The last tier covers every longer horizon.
pub const GRID_TIERS: [GridTier; 3] = [
    GridTier { max_horizon_days: 30, min_grids: 5, max_grids: 15 },
    GridTier { max_horizon_days: 90, min_grids: 10, max_grids: 25 },
    GridTier { max_horizon_days: u32::MAX, min_grids: 20, max_grids: 50 },
];

/// Assumed ceiling on round trips: two trades per week.
const TRADES_PER_WEEK: f64 = 2.0;

/// Profit model breakdown for a single grid count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCandidate {
    pub grid_count: u32,
    pub grid_size: f64,
    pub transaction_cost: f64,
    pub avg_profit_per_trade: f64,
    pub estimated_trades: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct GridOptimizer {
    range: PriceRange,
    cost: CostModel,
    avg_amplitude: f64,
}

impl GridOptimizer {
    pub fn new(range: PriceRange, cost: CostModel) -> Self {
        Self {
            range,
            cost,
            avg_amplitude: 0.0,
        }
    }

    /// Records the series' average daily amplitude. The profit model does not
    /// read it yet; it is carried so amplitude-aware trade estimates can be
    /// added without changing callers.
    pub fn with_avg_amplitude(mut self, avg_amplitude: f64) -> Self {
        self.avg_amplitude = avg_amplitude;
        self
    }

    pub fn avg_amplitude(&self) -> f64 {
        self.avg_amplitude
    }

    pub fn tier_for(horizon_days: u32) -> GridTier {
        GRID_TIERS
            .iter()
            .copied()
            .find(|tier| horizon_days <= tier.max_horizon_days)
            .unwrap_or(GRID_TIERS[GRID_TIERS.len() - 1])
    }

    pub fn candidate_counts(horizon_days: u32) -> RangeInclusive<u32> {
        let tier = Self::tier_for(horizon_days);
        tier.min_grids..=tier.max_grids
    }

    /// Profit estimate for `grid_count` grids over `horizon_days`. Commission is
    /// charged at the midpoint of the lowest grid cell.
    pub fn evaluate(&self, grid_count: u32, horizon_days: u32) -> GridCandidate {
        let count = f64::from(grid_count);
        let volume = self.cost.trade_volume();

        let grid_size = self.range.width() / count;
        let transaction_cost = self.cost.transaction_cost(self.range.lowest + grid_size / 2.0);
        let avg_profit_per_trade = grid_size * volume - transaction_cost;
        let weeks = f64::from(horizon_days) / 7.0;
        let estimated_trades = (count * 2.0).min(weeks * TRADES_PER_WEEK);

        GridCandidate {
            grid_count,
            grid_size,
            transaction_cost,
            avg_profit_per_trade,
            estimated_trades,
            total_profit: avg_profit_per_trade * estimated_trades,
        }
    }

    /// Every candidate of the horizon's tier, in ascending grid count.
    pub fn candidates(&self, horizon_days: u32) -> Vec<GridCandidate> {
        Self::candidate_counts(horizon_days)
            .map(|g| self.evaluate(g, horizon_days))
            .collect()
    }

    /// Picks the grid count with the highest positive total profit. Ties keep
    /// the smaller count. Fails with `NoProfitableGrid` when no candidate beats zero.
    pub fn optimize(&self, horizon_days: u32) -> Result<GridSearchResult> {
        if horizon_days == 0 {
            return Err(EngineError::InvalidHorizon(0));
        }

        let best = Self::candidate_counts(horizon_days).fold(None::<GridCandidate>, |best, g| {
            let candidate = self.evaluate(g, horizon_days);
            let baseline = best.map_or(0.0, |b| b.total_profit);
            if candidate.total_profit > baseline {
                Some(candidate)
            } else {
                best
            }
        });

        match best {
            Some(winner) => {
                tracing::debug!(
                    horizon = horizon_days,
                    grid_count = winner.grid_count,
                    grid_size = winner.grid_size,
                    estimated_profit = winner.total_profit,
                    "Selected grid count"
                );
                Ok(GridSearchResult {
                    grid_count: winner.grid_count,
                    grid_size: winner.grid_size,
                    estimated_profit: winner.total_profit,
                })
            }
            None => {
                tracing::warn!(horizon = horizon_days, "No grid count yields a positive profit");
                Err(EngineError::NoProfitableGrid { horizon: horizon_days })
            }
        }
    }
}
