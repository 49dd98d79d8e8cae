use crate::error::Result;
use anyhow::{anyhow, Context};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Layout of a daily history export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CsvFormat {
    /// `Date,Open,High,Low,Close[,Adj Close],Volume` with ISO dates, as exported by Yahoo Finance.
    #[default]
    Standard,
    /// `Ativo;Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume[;Quantidade]` with `dd/mm/yyyy` dates and `1.234,56` decimals.
    Brazilian,
}

impl CsvFormat {
    fn delimiter(self) -> u8 {
        match self {
            CsvFormat::Standard => b',',
            CsvFormat::Brazilian => b';',
        }
    }
}

// Brazilian number and date handling
pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use std::str::FromStr;

    // Parses decimals like "1.234,56" or "123,45" into f64
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim()
            .replace('.', "")  // thousand separators
            .replace(',', ".");

        f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // Parses "dd/mm/yyyy" plus an optional "HH:MM:SS"; daily exports may omit the time.
    pub fn parse_datetime(date_str: &str, time_str: Option<&str>) -> Result<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(date_str.trim(), "%d/%m/%Y")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))?;
        let time = match time_str.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S")
                .map_err(|e| anyhow!("Failed to parse time '{}': {}", t, e))?,
            None => NaiveTime::MIN,
        };
        Ok(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
    }

}

/// Parses ISO dates, ignoring any time/offset suffix such as `2024-01-02 00:00:00-05:00`.
fn parse_iso_date(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = s.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))?;
    Ok(DateTime::from_naive_utc_and_offset(date.and_time(chrono::NaiveTime::MIN), Utc))
}

fn is_missing_value(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case("null") || t.eq_ignore_ascii_case("nan")
}

pub struct CsvParser;

impl CsvParser {
    pub fn load_candles_from_csv(file_path: &Path, format: CsvFormat, default_symbol: &str) -> Result<Vec<Candle>> {
        let file = File::open(file_path)?;
        let candles = Self::parse_candles(BufReader::new(file), format, default_symbol)?;
        tracing::info!(
            path = %file_path.display(),
            ?format,
            candles = candles.len(),
            "Loaded candles from CSV"
        );
        Ok(candles)
    }

    /// Reads every data row. Standard-format rows with `null` prices (market holidays) are skipped.
    pub fn parse_candles<R: Read>(reader: R, format: CsvFormat, default_symbol: &str) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(format.delimiter())
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;
            let parsed = match format {
                CsvFormat::Standard => Self::parse_standard_record(&record, &headers, default_symbol, line)?,
                CsvFormat::Brazilian => Some(Self::parse_brazilian_record(&record, &headers, default_symbol, line)?),
            };
            match parsed {
                Some(candle) => candles.push(candle),
                None => tracing::warn!(line, "Skipping CSV row with missing prices"),
            }
        }
        Ok(candles)
    }

    fn parse_standard_record(
        record: &StringRecord,
        headers: &StringRecord,
        symbol: &str,
        line: usize,
    ) -> anyhow::Result<Option<Candle>> {
        let date_str = Self::required_field(record, headers, "Date", line)?;
        let open_raw = Self::required_field(record, headers, "Open", line)?;
        let high_raw = Self::required_field(record, headers, "High", line)?;
        let low_raw = Self::required_field(record, headers, "Low", line)?;
        let close_raw = Self::required_field(record, headers, "Close", line)?;
        if [open_raw, high_raw, low_raw, close_raw].iter().any(|f| is_missing_value(f)) {
            return Ok(None);
        }

        let timestamp = parse_iso_date(date_str).with_context(|| format!("Error parsing 'Date' at line {}", line))?;
        let price = |name: &str, raw: &str| -> anyhow::Result<f64> {
            raw.parse::<f64>()
                .map_err(|e| anyhow!("Error parsing '{}' at line {}: Failed to parse decimal '{}': {}", name, line, raw, e))
        };
        let open = price("Open", open_raw)?;
        let high = price("High", high_raw)?;
        let low = price("Low", low_raw)?;
        let close = price("Close", close_raw)?;
        let volume = match Self::get_field(record, headers, "Volume") {
            Some(v) if !is_missing_value(v) => v
                .trim()
                .parse::<f64>()
                .map_err(|e| anyhow!("Error parsing 'Volume' at line {}: {}", line, e))?,
            _ => 0.0,
        };

        Ok(Some(Candle {
            symbol: symbol.to_string(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }))
    }

    // Header: Ativo;Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume;Quantidade
    fn parse_brazilian_record(
        record: &StringRecord,
        headers: &StringRecord,
        default_symbol: &str,
        line: usize,
    ) -> anyhow::Result<Candle> {
        let decimal = |name: &str| -> anyhow::Result<f64> {
            brazilian_format::parse_decimal(Self::required_field(record, headers, name, line)?)
                .with_context(|| format!("Error parsing '{}' at line {}", name, line))
        };

        let symbol = Self::get_field(record, headers, "Ativo")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default_symbol);
        let timestamp = brazilian_format::parse_datetime(Self::required_field(record, headers, "Data", line)?, Self::get_field(record, headers, "Hora"))
            .with_context(|| format!("Error parsing datetime at line {}", line))?;

        Ok(Candle {
            symbol: symbol.to_string(),
            timestamp,
            open: decimal("Abertura")?,
            high: decimal("Máximo")?,
            low: decimal("Mínimo")?,
            close: decimal("Fechamento")?,
            volume: decimal("Volume")?,
        })
    }

    fn required_field<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
        line: usize,
    ) -> anyhow::Result<&'a str> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Looks a field up by header name so column order does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header == name)
            .and_then(|pos| record.get(pos))
    }
}
