// Text and JSON renderings of a grid calculation
use std::fmt;

use crate::analytics::GridOptimizer;
use crate::models::RiskProfile;
use crate::services::GridCalculation;
use serde::Serialize;
use shared::models::GridParameters;
use shared::utils::{format_currency, format_decimal, format_percent};

/// Options for [`TextReport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Append every evaluated grid count per horizon.
    pub show_candidates: bool,
}

pub fn risk_assessment(sharpe_ratio: f64) -> &'static str {
    if sharpe_ratio > 1.0 {
        "Good Sharpe ratio, indicating favorable returns relative to risk."
    } else if sharpe_ratio > 0.0 {
        "Positive Sharpe ratio but not high; returns exceed risk-free rate but with relatively high risk."
    } else {
        "Negative Sharpe ratio, indicating returns below the risk-free rate; strategy needs reevaluation."
    }
}

const HORIZON_NOTES: [&str; 3] = [
    "Short-term (up to 30 days): Fewer grids, suitable for volatile markets.",
    "Medium-term (31-90 days): Balanced grid count and profit per grid, suitable for typical market conditions.",
    "Long-term (over 90 days): More grids, suitable for long-term investment and stable markets.",
];

/// Range and risk figures, one block per horizon in request order, then the
/// horizon tier notes and the Sharpe assessment.
pub struct TextReport<'a> {
    pub calc: &'a GridCalculation,
    pub options: ReportOptions,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calc = self.calc;
        let params = &calc.parameters;

        writeln!(f, "Grid trading parameters for {}:", calc.symbol)?;
        writeln!(
            f,
            "Suggested price range: {} - {}",
            format_currency(params.price_range.lowest),
            format_currency(params.price_range.highest)
        )?;
        writeln!(f, "Current price: {}", format_currency(params.current_price))?;
        writeln!(f, "Annualized Sharpe Ratio: {}", format_decimal(params.sharpe_ratio))?;
        writeln!(f, "95% Daily VaR: {}", format_percent(-params.var_95))?;

        writeln!(f, "\nGrid parameters for different investment periods:")?;
        for strategy in &params.per_horizon {
            let r = &strategy.result;
            writeln!(f, "\n{}-day investment period:", strategy.horizon_days)?;
            writeln!(f, "  Recommended grid count: {}", r.grid_count)?;
            writeln!(f, "  Grid size: {}", format_currency(r.grid_size))?;
            writeln!(f, "  Estimated total profit: {}", format_currency(r.estimated_profit))?;
            writeln!(
                f,
                "  Estimated daily profit: {}",
                format_currency(r.estimated_daily_profit(strategy.horizon_days))
            )?;
            if self.options.show_candidates {
                write!(f, "{}", CandidateTable { calc, horizon_days: strategy.horizon_days })?;
            }
        }

        writeln!(f, "\nInvestment period explanations:")?;
        for note in HORIZON_NOTES {
            writeln!(f, "{}", note)?;
        }

        writeln!(f, "\nRisk assessment:")?;
        writeln!(f, "{}", risk_assessment(params.sharpe_ratio))?;
        writeln!(
            f,
            "VaR indicates that in the worst 5% of cases, daily losses could reach {}.",
            format_percent(-params.var_95)
        )
    }
}

/// Profit breakdown of every grid count tried for one horizon.
pub struct CandidateTable<'a> {
    pub calc: &'a GridCalculation,
    pub horizon_days: u32,
}

impl fmt::Display for CandidateTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optimizer = GridOptimizer::new(self.calc.parameters.price_range, self.calc.cost);
        writeln!(
            f,
            "    {:>5}  {:>10}  {:>10}  {:>12}  {:>7}  {:>12}",
            "grids", "size", "cost", "per trade", "trades", "total"
        )?;
        for c in optimizer.candidates(self.horizon_days) {
            writeln!(
                f,
                "    {:>5}  {:>10.2}  {:>10.2}  {:>12.2}  {:>7.2}  {:>12.2}",
                c.grid_count, c.grid_size, c.transaction_cost, c.avg_profit_per_trade, c.estimated_trades, c.total_profit
            )?;
        }
        Ok(())
    }
}

pub fn render_text(calc: &GridCalculation, options: ReportOptions) -> String {
    TextReport { calc, options }.to_string()
}

pub fn render_candidates(calc: &GridCalculation, horizon_days: u32) -> String {
    CandidateTable { calc, horizon_days }.to_string()
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    calculation_id: String,
    symbol: &'a str,
    risk_level: RiskProfile,
    commission_rate: f64,
    fixed_fee: f64,
    trade_volume: f64,
    records_used: usize,
    parameters: &'a GridParameters,
}

pub fn render_json(calc: &GridCalculation, pretty: bool) -> serde_json::Result<String> {
    let report = JsonReport {
        calculation_id: calc.calculation_id.to_string(),
        symbol: &calc.symbol,
        risk_level: calc.risk,
        commission_rate: calc.cost.commission_rate(),
        fixed_fee: calc.cost.fixed_fee(),
        trade_volume: calc.cost.trade_volume(),
        records_used: calc.records_used,
        parameters: &calc.parameters,
    };
    if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
}
