// Calculation services: the synchronous calculator pipeline and the async
// service that feeds it from the market data store.
pub mod calculator;
pub mod grid_service;

pub use calculator::{compute_grid_parameters, GridParameterCalculator, GridRequest};
pub use grid_service::{GridCalculation, GridService};
