// Value types shared between the calculation engine and its callers.
pub mod models;
pub mod utils;
