// Engine-side input types. The serializable result types live in `shared::models`.
pub mod cost_model;
pub mod price_series;
pub mod risk;

pub use cost_model::CostModel;
pub use price_series::{PriceSeries, MIN_SERIES_LEN};
pub use risk::RiskProfile;
