pub mod csv_parser;
pub mod market_data;

pub use csv_parser::{CsvFormat, CsvParser};
pub use market_data::{CsvMarketDataProvider, MarketDataProvider, MarketDataStore};
