pub mod settings;

pub use settings::{CalculationDefaults, EngineSettings};
