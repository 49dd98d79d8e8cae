use thiserror::Error;

/// Broad class of a failure, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Price history missing, malformed or too short.
    Data,
    /// Caller-supplied parameter outside its allowed domain.
    Validation,
    /// The inputs were valid but the model has no defined answer.
    Computation,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Price series is empty")]
    EmptySeries,

    #[error("Insufficient historical data: {actual} records, at least {required} required")]
    InsufficientData { required: usize, actual: usize },

    #[error("Price series is not strictly chronological at record {index}")]
    UnorderedSeries { index: usize },

    #[error("No market data found for symbol '{0}'")]
    SymbolNotFound(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Invalid risk level '{0}', please choose from low, medium, or high")]
    InvalidRiskLevel(String),

    #[error("Trade volume must be positive, got {0}")]
    InvalidTradeVolume(f64),

    #[error("Commission rate must be a non-negative number, got {0}")]
    InvalidCommissionRate(f64),

    #[error("Fixed fee must be a non-negative number, got {0}")]
    InvalidFixedFee(f64),

    #[error("Investment horizon must be a positive number of days, got {0}")]
    InvalidHorizon(i64),

    #[error("At least one investment horizon is required")]
    NoHorizons,

    #[error("Invalid {field}: '{value}' is not a number")]
    InvalidInput { field: &'static str, value: String },

    #[error("A {0} is required")]
    MissingInput(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Sharpe ratio is undefined: daily returns have zero volatility")]
    UndefinedSharpeRatio,

    #[error("No profitable grid count found for the {horizon}-day horizon")]
    NoProfitableGrid { horizon: u32 },

    #[error("Worker task failed: {0}")]
    WorkerFailure(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptySeries
            | EngineError::InsufficientData { .. }
            | EngineError::UnorderedSeries { .. }
            | EngineError::SymbolNotFound(_)
            | EngineError::CsvSystemError { .. }
            | EngineError::IoError { .. }
            | EngineError::CsvDataFormatError(_) => ErrorKind::Data,

            EngineError::InvalidRiskLevel(_)
            | EngineError::InvalidTradeVolume(_)
            | EngineError::InvalidCommissionRate(_)
            | EngineError::InvalidFixedFee(_)
            | EngineError::InvalidHorizon(_)
            | EngineError::NoHorizons
            | EngineError::InvalidInput { .. }
            | EngineError::MissingInput(_)
            | EngineError::ConfigError(_) => ErrorKind::Validation,

            EngineError::UndefinedSharpeRatio
            | EngineError::NoProfitableGrid { .. }
            | EngineError::WorkerFailure(_) => ErrorKind::Computation,
        }
    }
}

// The CSV layer builds its messages with anyhow; they surface as format errors.
impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::CsvDataFormatError(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
