// Statistics, range selection and grid search over a price series
pub mod grid;
pub mod range;
pub mod statistics;

pub use grid::{GridCandidate, GridOptimizer, GridTier, GRID_TIERS};
pub use range::RangeSelector;
pub use statistics::StatisticsEngine;
