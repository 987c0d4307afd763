use std::sync::Mutex;

use chrono::{DateTime, Utc};
use pathsim::prelude::{RiskMetrics, SimulationConfig};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ServiceError};

/// Number of runs returned by the history endpoint.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub paths_count: usize,
    pub last_value_preview: Option<f64>,
    pub risk: RiskMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub scenario: String,
    pub config: SimulationConfig,
    pub summary: RunSummary,
}

/// Persistence of completed runs. Passed to the service explicitly.
pub trait RunStore: Send + Sync {
    fn save(
        &self,
        scenario: &str,
        config: &SimulationConfig,
        summary: RunSummary,
    ) -> Result<RunRecord>;

    /// Most recent runs first, at most `limit` of them.
    fn history(&self, limit: usize) -> Result<Vec<RunRecord>>;
}

#[derive(Default)]
pub struct InMemoryRunStore {
    records: Mutex<Vec<RunRecord>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for InMemoryRunStore {
    fn save(
        &self,
        scenario: &str,
        config: &SimulationConfig,
        summary: RunSummary,
    ) -> Result<RunRecord> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| ServiceError::Store(e.to_string()))?;
        let record = RunRecord {
            id: records.len() as u64 + 1,
            created_at: Utc::now(),
            scenario: scenario.to_string(),
            config: config.clone(),
            summary,
        };
        records.push(record.clone());
        Ok(record)
    }

    fn history(&self, limit: usize) -> Result<Vec<RunRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| ServiceError::Store(e.to_string()))?;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
