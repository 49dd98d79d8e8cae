// Handler for loading a CSV export into the shared store
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::csv_parser::{CsvFormat, CsvParser};
use crate::data::market_data::{normalize_symbol, MarketDataStore};
use crate::error::Result;

/// Parses `file_path` and merges its candles into the store. Returns the number of parsed records.
pub async fn handle_load_csv_data(
    file_path: &Path,
    symbol: &str,
    format: CsvFormat,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> Result<usize> {
    let symbol = normalize_symbol(symbol);
    let candles = match CsvParser::load_candles_from_csv(file_path, format, &symbol) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(symbol = %symbol, path = %file_path.display(), error = %e, "Failed to load CSV data");
            return Err(e);
        }
    };

    let candles_loaded = candles.len();
    let mut store = market_data_store.write().await;
    let total = store.add_candles(&symbol, candles);
    tracing::info!(
        symbol = %symbol,
        loaded = candles_loaded,
        total,
        "Stored CSV candles"
    );
    Ok(candles_loaded)
}
