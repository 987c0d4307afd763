use tracing::debug;

use super::simulationconfig::{SimulationConfig, YearlyModifier};

/// Dense per-year lookup of drift/volatility adjustments.
///
/// Built once per simulation so each step resolves its parameters by index
/// instead of scanning the modifier list.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierSchedule {
    drift: f64,
    volatility: f64,
    // slot 0 is unused, years are 1-based
    adjustments: Vec<Option<(f64, f64)>>,
}

impl ModifierSchedule {
    pub fn new(drift: f64, volatility: f64, years: usize, modifiers: &[YearlyModifier]) -> Self {
        let mut adjustments = vec![None; years + 1];
        for m in modifiers {
            match adjustments.get_mut(m.year) {
                Some(slot) if m.year > 0 => {
                    // first match wins
                    if slot.is_none() {
                        *slot = Some((m.drift_mod, m.volatility_mod));
                    }
                }
                _ => debug!(year = m.year, years, "ignoring modifier outside horizon"),
            }
        }
        Self {
            drift,
            volatility,
            adjustments,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.drift(),
            config.volatility(),
            config.years(),
            config.modifiers(),
        )
    }

    /// Effective `(drift, volatility)` for the given 1-based year.
    #[inline]
    pub fn parameters(&self, year: usize) -> (f64, f64) {
        match self.adjustments.get(year).copied().flatten() {
            Some((d, v)) => (self.drift + d, self.volatility + v),
            None => (self.drift, self.volatility),
        }
    }
}
