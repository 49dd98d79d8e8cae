use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Per-trade costs, constant across every horizon of one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    commission_rate: f64,
    fixed_fee: f64,
    trade_volume: f64,
}

impl CostModel {
    pub fn new(commission_rate: f64, fixed_fee: f64, trade_volume: f64) -> Result<Self> {
        if !commission_rate.is_finite() || commission_rate < 0.0 {
            return Err(EngineError::InvalidCommissionRate(commission_rate));
        }
        if !fixed_fee.is_finite() || fixed_fee < 0.0 {
            return Err(EngineError::InvalidFixedFee(fixed_fee));
        }
        if !trade_volume.is_finite() || trade_volume <= 0.0 {
            return Err(EngineError::InvalidTradeVolume(trade_volume));
        }
        Ok(Self {
            commission_rate,
            fixed_fee,
            trade_volume,
        })
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn fixed_fee(&self) -> f64 {
        self.fixed_fee
    }

    pub fn trade_volume(&self) -> f64 {
        self.trade_volume
    }

    /// Cost of one trade executed at `price`. The fixed fee is charged per unit of volume.
    pub fn transaction_cost(&self, price: f64) -> f64 {
        price * self.commission_rate * self.trade_volume + self.fixed_fee * self.trade_volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cost_model() {
        let cost = CostModel::new(0.001, 1.0, 100.0).unwrap();
        assert!((cost.transaction_cost(82.0) - 108.2).abs() < 1e-9);
    }

    #[test]
    fn test_zero_costs_allowed() {
        let cost = CostModel::new(0.0, 0.0, 1.0).unwrap();
        assert_eq!(cost.transaction_cost(50.0), 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(CostModel::new(-0.1, 1.0, 100.0), Err(EngineError::InvalidCommissionRate(_))));
        assert!(matches!(CostModel::new(0.001, -1.0, 100.0), Err(EngineError::InvalidFixedFee(_))));
        assert!(matches!(CostModel::new(0.001, 1.0, 0.0), Err(EngineError::InvalidTradeVolume(_))));
        assert!(matches!(CostModel::new(0.001, 1.0, -5.0), Err(EngineError::InvalidTradeVolume(_))));
        assert!(matches!(CostModel::new(f64::NAN, 1.0, 100.0), Err(EngineError::InvalidCommissionRate(_))));
    }
}
