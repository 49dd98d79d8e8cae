// Handler for a grid calculation against the shared store
use tracing::Instrument;
use uuid::Uuid;

use super::{helpers, GridCalculation, GridService};
use crate::data::market_data::{normalize_symbol, MarketDataProvider};
use crate::error::{EngineError, Result};
use crate::services::calculator::{GridParameterCalculator, GridRequest};

/// Fetches the symbol's history (loading it from the data directory on first
/// use), then runs the calculator pipeline with horizons spread over the
/// configured workers.
pub async fn handle_calculate_grid(symbol: &str, request: GridRequest, service: &GridService) -> Result<GridCalculation> {
    let calculation_id = Uuid::new_v4();
    let symbol = normalize_symbol(symbol);
    let span = tracing::info_span!("grid_calculation", %calculation_id, symbol = %symbol);

    async move {
        let store = service.store();
        let lookback_days = service.settings().lookback_days;

        let cached = store.read().await.contains(&symbol);
        let series = if cached {
            store.read().await.fetch_history(&symbol, lookback_days)?
        } else {
            let series = service.file_provider().fetch_history(&symbol, lookback_days)?;
            let total = store.write().await.add_candles(&symbol, series.candles().to_vec());
            tracing::info!(records = total, "Cached history from data directory");
            series
        };

        let horizons = GridParameterCalculator::validate(&series, &request)?;
        let prepared = GridParameterCalculator::prepare(&series, &request)?;
        let per_horizon =
            helpers::optimize_horizons(prepared.optimizer, horizons, service.settings().worker_threads).await?;
        let parameters = GridParameterCalculator::assemble(&prepared, per_horizon);

        tracing::info!(
            records = series.len(),
            horizons = parameters.per_horizon.len(),
            "Grid calculation complete"
        );

        Ok::<_, EngineError>(GridCalculation {
            calculation_id,
            symbol,
            risk: request.risk,
            cost: request.cost,
            records_used: series.len(),
            parameters,
        })
    }
    .instrument(span)
    .await
}
