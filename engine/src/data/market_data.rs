// Sources of daily price history
use super::csv_parser::{CsvFormat, CsvParser};
use crate::error::{EngineError, Result};
use crate::models::PriceSeries;
use chrono::{Duration, NaiveDate};
use shared::models::Candle;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Supplies a symbol's daily history, ascending by date.
pub trait MarketDataProvider: Send + Sync {
    /// Candles from the `lookback_days` calendar days ending at the most recent record.
    fn fetch_history(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries>;
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Collapses bars sharing a date into one daily candle: first open, highest
/// high, lowest low, last close, summed volume. Output is ascending by date.
pub fn aggregate_daily(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    let mut daily: Vec<Candle> = Vec::with_capacity(candles.len());
    for bar in candles {
        match daily.last_mut() {
            Some(day) if day.timestamp.date_naive() == bar.timestamp.date_naive() => {
                day.high = day.high.max(bar.high);
                day.low = day.low.min(bar.low);
                day.close = bar.close;
                day.volume += bar.volume;
            }
            _ => daily.push(bar),
        }
    }
    daily
}

/// In-memory daily candles per symbol, kept sorted with one record per date.
pub struct MarketDataStore {
    data: HashMap<String, Vec<Candle>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
        }
    }

    /// Merges candles into the symbol's history. Intraday bars are aggregated
    /// per date, and a date already stored is replaced by the newly added one.
    /// Returns how many records the symbol now has.
    pub fn add_candles(&mut self, symbol: &str, new_candles: Vec<Candle>) -> usize {
        let daily = aggregate_daily(new_candles);
        let new_dates: HashSet<NaiveDate> = daily.iter().map(|c| c.timestamp.date_naive()).collect();

        let history = self.data.entry(normalize_symbol(symbol)).or_default();
        history.retain(|c| !new_dates.contains(&c.timestamp.date_naive()));
        history.extend(daily);
        history.sort_by_key(|c| c.timestamp);
        history.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.data.contains_key(&normalize_symbol(symbol))
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataProvider for MarketDataStore {
    fn fetch_history(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries> {
        let history = self
            .data
            .get(&normalize_symbol(symbol))
            .filter(|candles| !candles.is_empty())
            .ok_or_else(|| EngineError::SymbolNotFound(normalize_symbol(symbol)))?;

        // non-empty per the filter above
        let latest = history[history.len() - 1].timestamp;
        let cutoff = latest - Duration::days(i64::from(lookback_days));
        let window: Vec<Candle> = history
            .iter()
            .filter(|c| c.timestamp > cutoff)
            .cloned()
            .collect();

        tracing::debug!(
            symbol = %normalize_symbol(symbol),
            lookback_days,
            records = window.len(),
            "Fetched price history from store"
        );
        PriceSeries::new(window)
    }
}

/// Reads `<data_dir>/<SYMBOL>.csv` on every fetch.
pub struct CsvMarketDataProvider {
    data_dir: PathBuf,
    format: CsvFormat,
}

impl CsvMarketDataProvider {
    pub fn new(data_dir: impl Into<PathBuf>, format: CsvFormat) -> Self {
        Self {
            data_dir: data_dir.into(),
            format,
        }
    }

    // Tries the symbol as given, upper-case and lower-case.
    fn path_for(&self, symbol: &str) -> Option<PathBuf> {
        let trimmed = symbol.trim();
        [trimmed.to_string(), trimmed.to_uppercase(), trimmed.to_lowercase()]
            .iter()
            .map(|name| self.data_dir.join(format!("{}.csv", name)))
            .find(|path| path.is_file())
    }
}

impl MarketDataProvider for CsvMarketDataProvider {
    fn fetch_history(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries> {
        let path = self.path_for(symbol).ok_or_else(|| {
            tracing::warn!(symbol = %symbol, data_dir = %self.data_dir.display(), "No CSV export for symbol");
            EngineError::SymbolNotFound(normalize_symbol(symbol))
        })?;
        let candles = CsvParser::load_candles_from_csv(&path, self.format, &normalize_symbol(symbol))?;
        let mut store = MarketDataStore::new();
        store.add_candles(symbol, candles);
        store.fetch_history(symbol, lookback_days)
    }
}
