use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;

impl From<SimulationError> for String {
    fn from(e: SimulationError) -> Self {
        e.to_string()
    }
}

impl From<rayon::ThreadPoolBuildError> for SimulationError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        SimulationError::ThreadPool(e.to_string())
    }
}
