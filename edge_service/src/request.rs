use pathsim::prelude::{SimulationConfig, YearlyModifier};
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_PRICE: f64 = 1_000_000.0;
pub const DEFAULT_YEARS: usize = 30;
pub const DEFAULT_VOLATILITY: f64 = 0.20;
pub const DEFAULT_DRIFT: f64 = 0.05;
pub const DEFAULT_NUM_PATHS: usize = 1_000;

/// Body of a simulation request. Every field is optional; unset fields take
/// the service defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub start_price: Option<f64>,
    pub years: Option<usize>,
    pub drift: Option<f64>,
    pub volatility: Option<f64>,
    pub num_paths: Option<usize>,
    pub modifiers: Option<Vec<YearlyModifier>>,
    pub jump_intensity: Option<f64>,
    pub jump_mean: Option<f64>,
    pub jump_std_dev: Option<f64>,
    pub seed: Option<u64>,
    pub scenario: Option<String>,
}

impl SimulationRequest {
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig::new(
            self.start_price.unwrap_or(DEFAULT_START_PRICE),
            self.years.unwrap_or(DEFAULT_YEARS),
            self.drift.unwrap_or(DEFAULT_DRIFT),
            self.volatility.unwrap_or(DEFAULT_VOLATILITY),
            self.num_paths.unwrap_or(DEFAULT_NUM_PATHS),
        )
        .with_modifiers(self.modifiers.clone().unwrap_or_default())
        .with_jumps(
            self.jump_intensity.unwrap_or(0.0),
            self.jump_mean.unwrap_or(0.0),
            self.jump_std_dev.unwrap_or(0.0),
        )
    }

    pub fn scenario(&self) -> &str {
        self.scenario.as_deref().unwrap_or("")
    }
}
