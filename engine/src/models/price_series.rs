// Validated view over a symbol's daily candles.
use crate::error::{EngineError, Result};
use shared::models::Candle;

/// Fewest records the statistics are computed from.
pub const MIN_SERIES_LEN: usize = 20;

/// Daily candles in strictly ascending date order, no duplicate dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Wraps candles that are already sorted. Out-of-order or repeated dates are rejected.
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        for (index, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp.date_naive() <= pair[0].timestamp.date_naive() {
                return Err(EngineError::UnorderedSeries { index: index + 1 });
            }
        }
        Ok(Self { candles })
    }

    /// Fails with `EmptySeries` or `InsufficientData` when the series is too short to summarize.
    pub fn ensure_min_len(&self) -> Result<()> {
        if self.candles.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        if self.candles.len() < MIN_SERIES_LEN {
            return Err(EngineError::InsufficientData {
                required: MIN_SERIES_LEN,
                actual: self.candles.len(),
            });
        }
        Ok(())
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.candles.iter().map(|c| c.close)
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close-to-close percentage changes; one shorter than the series.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.candles
            .windows(2)
            .map(|pair| (pair[1].close - pair[0].close) / pair[0].close)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::Candle;

    pub fn candle_on(day: i64, close: f64) -> Candle {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
        Candle {
            symbol: "TEST".to_string(),
            timestamp,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| candle_on(i as i64, close))
            .collect()
    }

    /// Oscillating closes around 100 with a slight upward drift.
    pub fn wavy_closes(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + 0.05 * i as f64 + 5.0 * ((i as f64) * 0.7).sin())
            .collect()
    }
}
