use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulator configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("trial failed on a worker thread: {message}")]
    WorkerPanicked { message: String },
}

impl SimulationError {
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::WorkerPanicked { message }
    }
}
