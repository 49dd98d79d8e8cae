// engine/src/services/grid_service/mod.rs
// Async front of the calculator: owns the shared market data store and the
// worker settings, and dispatches to the handlers below.
use crate::config::EngineSettings;
use crate::data::{CsvMarketDataProvider, MarketDataStore};
use crate::error::Result;
use crate::models::{CostModel, RiskProfile};
use crate::services::calculator::GridRequest;
use shared::models::GridParameters;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod calculate_grid;
pub mod helpers;
pub mod load_csv_data;

/// Result of one service calculation, with the inputs it was computed from.
#[derive(Debug, Clone)]
pub struct GridCalculation {
    pub calculation_id: Uuid,
    pub symbol: String,
    pub risk: RiskProfile,
    pub cost: CostModel,
    pub records_used: usize,
    pub parameters: GridParameters,
}

pub struct GridService {
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: EngineSettings,
}

impl GridService {
    pub fn new(market_data_store: Arc<RwLock<MarketDataStore>>, settings: EngineSettings) -> Self {
        GridService {
            market_data_store,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> Arc<RwLock<MarketDataStore>> {
        self.market_data_store.clone()
    }

    /// Provider for symbols not yet in the store.
    pub fn file_provider(&self) -> CsvMarketDataProvider {
        CsvMarketDataProvider::new(self.settings.data_dir.clone(), self.settings.csv_format)
    }

    pub async fn load_csv_data(&self, file_path: &Path, symbol: &str) -> Result<usize> {
        tracing::info!(
            symbol = %symbol,
            path = %file_path.display(),
            "Received CSV load request, dispatching to handler."
        );
        load_csv_data::handle_load_csv_data(file_path, symbol, self.settings.csv_format, self.store()).await
    }

    pub async fn calculate(&self, symbol: &str, request: GridRequest) -> Result<GridCalculation> {
        tracing::info!(
            symbol = %symbol,
            horizons = ?request.horizons,
            risk = %request.risk,
            "Received grid calculation request, dispatching to handler."
        );
        calculate_grid::handle_calculate_grid(symbol, request, self).await
    }
}
