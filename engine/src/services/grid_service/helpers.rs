// Per-horizon optimization, optionally spread over blocking workers
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::analytics::GridOptimizer;
use crate::error::{EngineError, Result};
use shared::models::HorizonStrategy;

fn optimize_one(optimizer: &GridOptimizer, horizon_days: u32) -> Result<HorizonStrategy> {
    optimizer
        .optimize(horizon_days)
        .map(|result| HorizonStrategy { horizon_days, result })
}

async fn run_horizon(optimizer: GridOptimizer, horizon_days: u32, permits: Arc<Semaphore>) -> Result<HorizonStrategy> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|e| EngineError::WorkerFailure(e.to_string()))?;
    tokio::task::spawn_blocking(move || optimize_one(&optimizer, horizon_days))
        .await
        .map_err(|e| EngineError::WorkerFailure(format!("horizon {}: {}", horizon_days, e)))?
}

/// Optimizes every horizon and returns the strategies in input order.
///
/// With more than one worker each horizon runs on the blocking pool, at most
/// `worker_threads` at a time. Horizons are independent, so the output equals
/// the sequential one. On failure the error of the earliest failing horizon
/// (in input order) is returned and unfinished tasks are aborted.
pub async fn optimize_horizons(
    optimizer: GridOptimizer,
    horizons: Vec<u32>,
    worker_threads: usize,
) -> Result<Vec<HorizonStrategy>> {
    if worker_threads <= 1 || horizons.len() <= 1 {
        return horizons
            .into_iter()
            .map(|h| optimize_one(&optimizer, h))
            .collect();
    }

    let permits = Arc::new(Semaphore::new(worker_threads));
    let handles: Vec<_> = horizons
        .into_iter()
        .map(|h| tokio::spawn(run_horizon(optimizer, h, permits.clone())))
        .collect();

    let mut per_horizon = Vec::with_capacity(handles.len());
    let mut pending = handles.into_iter();
    while let Some(handle) = pending.next() {
        let outcome = handle
            .await
            .map_err(|e| EngineError::WorkerFailure(e.to_string()))
            .and_then(|r| r);
        match outcome {
            Ok(strategy) => per_horizon.push(strategy),
            Err(e) => {
                pending.by_ref().for_each(|h| h.abort());
                return Err(e);
            }
        }
    }
    Ok(per_horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostModel;
    use shared::models::PriceRange;

    fn optimizer() -> GridOptimizer {
        GridOptimizer::new(
            PriceRange { lowest: 80.0, highest: 120.0 },
            CostModel::new(0.001, 1.0, 100.0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_sequential_and_pooled_agree() {
        let horizons = vec![365, 30, 7, 90, 31, 91, 60, 120];
        let sequential = optimize_horizons(optimizer(), horizons.clone(), 1).await.unwrap();
        let pooled = optimize_horizons(optimizer(), horizons.clone(), 3).await.unwrap();
        assert_eq!(sequential, pooled);
        assert_eq!(pooled.iter().map(|s| s.horizon_days).collect::<Vec<_>>(), horizons);
    }

    #[tokio::test]
    async fn test_pooled_error_is_first_in_order() {
        let losing = GridOptimizer::new(
            PriceRange { lowest: 99.0, highest: 101.0 },
            CostModel::new(0.01, 5.0, 100.0).unwrap(),
        );
        let err = optimize_horizons(losing, vec![45, 10, 200], 4).await.unwrap_err();
        assert!(matches!(err, EngineError::NoProfitableGrid { horizon: 45 }));
    }
}
