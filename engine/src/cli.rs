// Command-line arguments and interactive input for grid-advisor
use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::CalculationDefaults;
use crate::data::market_data::normalize_symbol;
use crate::data::CsvFormat;
use crate::error::{EngineError, Result};
use crate::models::{CostModel, RiskProfile};
use crate::services::GridRequest;

#[derive(Debug, Parser)]
#[command(
    name = "grid-advisor",
    version,
    about = "Suggests grid trading parameters from historical daily prices"
)]
pub struct Cli {
    /// JSON settings file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory with one `<SYMBOL>.csv` per instrument (overrides the config file).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Layout of the CSV exports.
    #[arg(long, value_enum)]
    pub format: Option<CsvFormat>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Pretty-print JSON output.
    #[arg(long, requires = "json")]
    pub pretty: bool,

    /// Ticker symbol, e.g. AAPL.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Commission rate as a fraction of the traded value (0.001 = 0.1%).
    #[arg(long)]
    pub commission: Option<f64>,

    /// Fixed fee per share per trade, in the quote currency.
    #[arg(long)]
    pub fixed_fee: Option<f64>,

    /// Shares per trade.
    #[arg(long)]
    pub volume: Option<f64>,

    /// Risk level: low, medium or high.
    #[arg(long)]
    pub risk: Option<String>,

    /// Investment horizons in days, comma separated.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub horizons: Option<Vec<i64>>,

    /// Never prompt; fail with a non-zero exit status instead.
    #[arg(long)]
    pub non_interactive: bool,

    /// Show the profit of every grid count evaluated per horizon.
    #[arg(long)]
    pub show_candidates: bool,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> InputOverrides {
        InputOverrides {
            symbol: self.symbol.clone(),
            commission: self.commission,
            fixed_fee: self.fixed_fee,
            volume: self.volume,
            risk: self.risk.clone(),
            horizons: self.horizons.clone(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }

    /// Filter from `RUST_LOG` when it is set and valid, else from `-v`.
    pub fn log_filter(&self, rust_log: Option<String>) -> EnvFilter {
        match rust_log.filter(|d| !d.trim().is_empty()).map(EnvFilter::try_new) {
            Some(Ok(filter)) => filter,
            _ => EnvFilter::default().add_directive(self.log_level().into()),
        }
    }
}

/// Calculation inputs already fixed on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOverrides {
    pub symbol: Option<String>,
    pub commission: Option<f64>,
    pub fixed_fee: Option<f64>,
    pub volume: Option<f64>,
    pub risk: Option<String>,
    pub horizons: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInputs {
    pub symbol: String,
    pub request: GridRequest,
}

pub trait Prompter {
    /// Shows `question` and returns the trimmed answer. Empty means "use the default".
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Answers every question with an empty string.
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask(&mut self, _question: &str) -> Result<String> {
        Ok(String::new())
    }
}

pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(line.trim().to_string())
    }
}

pub fn parse_number(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| EngineError::InvalidInput {
        field,
        value: raw.trim().to_string(),
    })
}

/// Parses a comma separated list of day counts, e.g. `"30, 90,180"`.
pub fn parse_horizons(raw: &str) -> Result<Vec<u32>> {
    let days = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|_| EngineError::InvalidInput {
                field: "investment horizon",
                value: part.to_string(),
            })
        })
        .collect::<Result<Vec<i64>>>()?;
    to_horizons(&days)
}

pub fn to_horizons(days: &[i64]) -> Result<Vec<u32>> {
    if days.is_empty() {
        return Err(EngineError::NoHorizons);
    }
    days.iter()
        .map(|&d| match u32::try_from(d) {
            Ok(h) if h > 0 => Ok(h),
            _ => Err(EngineError::InvalidHorizon(d)),
        })
        .collect()
}

fn ask_or_default<P: Prompter>(prompter: &mut P, question: &str) -> Result<Option<String>> {
    let answer = prompter.ask(question)?;
    Ok(if answer.is_empty() { None } else { Some(answer) })
}

fn number_input<P: Prompter>(
    prompter: &mut P,
    given: Option<f64>,
    field: &'static str,
    question: &str,
    default: f64,
) -> Result<f64> {
    if let Some(value) = given {
        return Ok(value);
    }
    match ask_or_default(prompter, question)? {
        Some(raw) => parse_number(field, &raw),
        None => Ok(default),
    }
}

/// Fills every input from `overrides`, then `prompter`, then `defaults`.
/// Values are validated as they are read, so the first bad one is reported.
pub fn resolve_inputs<P: Prompter>(
    overrides: &InputOverrides,
    defaults: &CalculationDefaults,
    prompter: &mut P,
) -> Result<CalculationInputs> {
    let symbol = match &overrides.symbol {
        Some(s) => s.clone(),
        None => prompter.ask("Please enter the stock ticker (e.g., AAPL): ")?,
    };
    let symbol = normalize_symbol(&symbol);
    if symbol.is_empty() {
        return Err(EngineError::MissingInput("ticker symbol"));
    }

    let commission_rate = number_input(
        prompter,
        overrides.commission,
        "commission rate",
        &format!("Please enter the commission rate (e.g., 0.001 for 0.1%) [{}]: ", defaults.commission_rate),
        defaults.commission_rate,
    )?;
    let fixed_fee = number_input(
        prompter,
        overrides.fixed_fee,
        "fixed fee",
        &format!("Please enter the fixed fee per trade [{}]: ", defaults.fixed_fee),
        defaults.fixed_fee,
    )?;
    let trade_volume = number_input(
        prompter,
        overrides.volume,
        "trade volume",
        &format!("Please enter the number of shares per trade [{}]: ", defaults.trade_volume),
        defaults.trade_volume,
    )?;
    let cost = CostModel::new(commission_rate, fixed_fee, trade_volume)?;

    let risk = match &overrides.risk {
        Some(r) => r.parse::<RiskProfile>()?,
        None => match ask_or_default(
            prompter,
            &format!("Please choose a risk level (low/medium/high) [{}]: ", defaults.risk_level),
        )? {
            Some(r) => r.parse::<RiskProfile>()?,
            None => defaults.risk_level,
        },
    };

    let horizons = match &overrides.horizons {
        Some(days) => to_horizons(days)?,
        None => match ask_or_default(
            prompter,
            "Enter the investment periods (in days, separated by commas), or press Enter to use default periods: ",
        )? {
            Some(raw) => parse_horizons(&raw)?,
            None => defaults.horizons.clone(),
        },
    };

    Ok(CalculationInputs {
        symbol,
        request: GridRequest::new(horizons, risk, cost),
    })
}

/// True when the answer to "try again?" is yes.
pub fn wants_retry<P: Prompter>(prompter: &mut P) -> bool {
    prompter
        .ask("Would you like to try again? (y/n): ")
        .map(|a| a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}
