// Engine library root
// Price statistics, grid optimization and the services that drive them.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use error::{EngineError, ErrorKind, Result};
