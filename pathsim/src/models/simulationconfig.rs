use serde::{Deserialize, Serialize};

use super::modifierschedule::ModifierSchedule;
use super::pathsimulator::DT;
use crate::utils::errors::{Result, SimulationError};

/// Largest accepted effective annual volatility, modifiers included.
pub const MAX_VOLATILITY: f64 = 10.0;
/// Largest accepted absolute effective annual drift, modifiers included.
pub const MAX_ABS_DRIFT: f64 = 10.0;
/// Width, in standard deviations, of the log-price band that must stay
/// inside the range where `exp` is normal and finite.
const LOG_PRICE_SIGMAS: f64 = 10.0;

/// Additive drift and volatility adjustment for a single year of the horizon.
///
/// `year` is 1-based: year 1 is the first step away from the start price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyModifier {
    pub year: usize,
    pub drift_mod: f64,
    pub volatility_mod: f64,
}

impl YearlyModifier {
    pub fn new(year: usize, drift_mod: f64, volatility_mod: f64) -> Self {
        Self {
            year,
            drift_mod,
            volatility_mod,
        }
    }

    /// A modifier that leaves the base parameters untouched.
    pub fn neutral(year: usize) -> Self {
        Self::new(year, 0.0, 0.0)
    }
}

/// # SimulationConfig
/// Parameters of a yearly-stepped geometric Brownian motion, optionally with
/// Merton log-normal jumps.
///
/// ## Details
/// - `drift` and `volatility` are annualized.
/// - `modifiers` adjust drift/volatility additively for single years. When two
///   modifiers name the same year the first one wins.
/// - `jump_intensity` is the expected number of jumps per year, `jump_mean`
///   and `jump_std_dev` describe the log jump size.
///
/// ## Example
/// ```
/// use pathsim::prelude::*;
/// let config = SimulationConfig::new(100.0, 10, 0.05, 0.2, 1_000)
///     .with_modifiers(vec![YearlyModifier::new(1, -0.10, 0.15)])
///     .with_jumps(0.1, -0.2, 0.1);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.years(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    start_price: f64,
    years: usize,
    drift: f64,
    volatility: f64,
    num_paths: usize,
    #[serde(default)]
    modifiers: Vec<YearlyModifier>,
    #[serde(default)]
    jump_intensity: f64,
    #[serde(default)]
    jump_mean: f64,
    #[serde(default)]
    jump_std_dev: f64,
}

impl SimulationConfig {
    pub fn new(
        start_price: f64,
        years: usize,
        drift: f64,
        volatility: f64,
        num_paths: usize,
    ) -> Self {
        Self {
            start_price,
            years,
            drift,
            volatility,
            num_paths,
            modifiers: Vec::new(),
            jump_intensity: 0.0,
            jump_mean: 0.0,
            jump_std_dev: 0.0,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<YearlyModifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_jumps(mut self, intensity: f64, mean: f64, std_dev: f64) -> Self {
        self.jump_intensity = intensity;
        self.jump_mean = mean;
        self.jump_std_dev = std_dev;
        self
    }

    pub fn start_price(&self) -> f64 {
        self.start_price
    }

    pub fn years(&self) -> usize {
        self.years
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    pub fn modifiers(&self) -> &[YearlyModifier] {
        &self.modifiers
    }

    pub fn jump_intensity(&self) -> f64 {
        self.jump_intensity
    }

    pub fn jump_mean(&self) -> f64 {
        self.jump_mean
    }

    pub fn jump_std_dev(&self) -> f64 {
        self.jump_std_dev
    }

    pub fn has_jumps(&self) -> bool {
        self.jump_intensity > 0.0
    }

    /// Checks every parameter before any path is generated. Modifiers for
    /// years outside the horizon are tolerated; they never match a step.
    pub fn validate(&self) -> Result<()> {
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(invalid("start_price", self.start_price, "must be finite and > 0"));
        }
        if !self.drift.is_finite() {
            return Err(invalid("drift", self.drift, "must be finite"));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(invalid("volatility", self.volatility, "must be finite and >= 0"));
        }
        if !self.jump_intensity.is_finite() || self.jump_intensity < 0.0 {
            return Err(invalid(
                "jump_intensity",
                self.jump_intensity,
                "must be finite and >= 0",
            ));
        }
        // the Poisson count compares against exp(-λ·dt), which must not underflow
        if !(-self.jump_intensity * DT).exp().is_normal() {
            return Err(invalid(
                "jump_intensity",
                self.jump_intensity,
                "is too large for exp(-intensity) to be representable",
            ));
        }
        if !self.jump_mean.is_finite() {
            return Err(invalid("jump_mean", self.jump_mean, "must be finite"));
        }
        if !self.jump_std_dev.is_finite() || self.jump_std_dev < 0.0 {
            return Err(invalid(
                "jump_std_dev",
                self.jump_std_dev,
                "must be finite and >= 0",
            ));
        }
        for m in &self.modifiers {
            if !m.drift_mod.is_finite() || !m.volatility_mod.is_finite() {
                return Err(SimulationError::InvalidConfig(format!(
                    "modifier for year {} has non-finite adjustments ({}, {})",
                    m.year, m.drift_mod, m.volatility_mod
                )));
            }
        }
        self.validate_log_price_range()
    }

    /// Bounds the effective per-year parameters and checks that the log price
    /// stays, within a wide band around its expected path, where `exp` yields
    /// a normal positive f64.
    fn validate_log_price_range(&self) -> Result<()> {
        let schedule = ModifierSchedule::from_config(self);
        let jump_drift = self.jump_intensity * self.jump_mean;
        let jump_variance =
            self.jump_intensity * (self.jump_mean * self.jump_mean + self.jump_std_dev * self.jump_std_dev);

        let mut mean = self.start_price.ln();
        let mut variance = 0.0;
        for year in 1..=self.years {
            let (d, v) = schedule.parameters(year);
            if d.abs() > MAX_ABS_DRIFT {
                return Err(SimulationError::InvalidConfig(format!(
                    "effective drift {} in year {} exceeds {} in magnitude",
                    d, year, MAX_ABS_DRIFT
                )));
            }
            if v.abs() > MAX_VOLATILITY {
                return Err(SimulationError::InvalidConfig(format!(
                    "effective volatility {} in year {} exceeds {} in magnitude",
                    v, year, MAX_VOLATILITY
                )));
            }
            mean += (d - 0.5 * v * v + jump_drift) * DT;
            variance += (v * v + jump_variance) * DT;
        }

        let band = LOG_PRICE_SIGMAS * variance.sqrt();
        let (low, high) = (mean - band, mean + band);
        if !(low > f64::MIN_POSITIVE.ln() && high < f64::MAX.ln()) {
            return Err(SimulationError::InvalidConfig(format!(
                "log price band [{:.1}, {:.1}] over {} years leaves the representable range",
                low, high, self.years
            )));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: f64, constraint: &str) -> SimulationError {
    SimulationError::InvalidConfig(format!("{} = {} {}", field, value, constraint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() -> Result<()> {
        let config = SimulationConfig::new(1_000_000.0, 30, 0.05, 0.2, 1000);
        config.validate()?;
        assert!(!config.has_jumps());
        assert!(config.modifiers().is_empty());
        Ok(())
    }

    #[test]
    fn test_rejects_bad_start_price() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SimulationConfig::new(price, 1, 0.0, 0.1, 1);
            assert!(matches!(
                config.validate(),
                Err(SimulationError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_rejects_negative_volatility() {
        let config = SimulationConfig::new(100.0, 1, 0.0, -0.1, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_jump_parameters() {
        let base = SimulationConfig::new(100.0, 1, 0.0, 0.1, 1);
        assert!(base.clone().with_jumps(-0.5, 0.0, 0.1).validate().is_err());
        assert!(base.clone().with_jumps(0.5, f64::NAN, 0.1).validate().is_err());
        assert!(base.clone().with_jumps(0.5, 0.0, -0.1).validate().is_err());
        assert!(base.with_jumps(0.5, -0.1, 0.1).validate().is_ok());
    }

    #[test]
    fn test_rejects_extreme_volatility() {
        let config = SimulationConfig::new(100.0, 2, 0.05, 40.0, 4);
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_extreme_effective_parameters_from_modifiers() {
        let base = SimulationConfig::new(100.0, 5, 0.05, 0.2, 4);
        let vol_spike = base
            .clone()
            .with_modifiers(vec![YearlyModifier::new(3, 0.0, 39.8)]);
        assert!(vol_spike.validate().is_err());
        let negative_vol = base
            .clone()
            .with_modifiers(vec![YearlyModifier::new(2, 0.0, -40.0)]);
        assert!(negative_vol.validate().is_err());
        let drift_spike = base.with_modifiers(vec![YearlyModifier::new(1, 800.0, 0.0)]);
        assert!(drift_spike.validate().is_err());
    }

    #[test]
    fn test_rejects_horizon_that_leaves_float_range() {
        // each year is within bounds but the accumulated decay underflows exp
        let config = SimulationConfig::new(100.0, 200, -9.0, 0.0, 1);
        assert!(config.validate().is_err());
        let shorter = SimulationConfig::new(100.0, 20, -9.0, 0.0, 1);
        assert!(shorter.validate().is_ok());
    }

    #[test]
    fn test_accepts_long_realistic_horizon() {
        let config = SimulationConfig::new(1_000_000.0, 500, 0.05, 0.3, 1)
            .with_jumps(0.2, -0.1, 0.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_intensity_with_underflowing_threshold() {
        let base = SimulationConfig::new(100.0, 0, 0.0, 0.1, 1);
        assert!(base.clone().with_jumps(1e6, 0.001, 0.0).validate().is_err());
        assert!(base.clone().with_jumps(720.0, 0.0, 0.0).validate().is_err());
        assert!(base.with_jumps(700.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_modifier() {
        let config = SimulationConfig::new(100.0, 5, 0.0, 0.1, 1)
            .with_modifiers(vec![YearlyModifier::new(2, f64::INFINITY, 0.0)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_horizon_modifier_is_tolerated() {
        let config = SimulationConfig::new(100.0, 5, 0.0, 0.1, 1)
            .with_modifiers(vec![YearlyModifier::new(30, 0.1, 0.1)]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let json = r#"{"start_price":100.0,"years":3,"drift":0.05,"volatility":0.2,"num_paths":10}"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.num_paths(), 10);
        assert_eq!(config.jump_intensity(), 0.0);
        assert!(config.modifiers().is_empty());
    }

    #[test]
    fn test_negative_counts_do_not_deserialize() {
        let json = r#"{"start_price":100.0,"years":-3,"drift":0.05,"volatility":0.2,"num_paths":10}"#;
        assert!(serde_json::from_str::<SimulationConfig>(json).is_err());
    }
}
