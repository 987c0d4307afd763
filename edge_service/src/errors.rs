use pathsim::utils::errors::SimulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Simulation(#[from] SimulationError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Scenario oracle failed: {0}")]
    Oracle(String),
    #[error("Scenario oracle is not configured")]
    OracleUnavailable,
    #[error("Run store error: {0}")]
    Store(String),
}

impl ServiceError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Simulation(SimulationError::InvalidConfig(_))
            | ServiceError::Json(_)
            | ServiceError::BadRequest(_) => 400,
            ServiceError::OracleUnavailable => 503,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<ServiceError> for String {
    fn from(e: ServiceError) -> Self {
        e.to_string()
    }
}
