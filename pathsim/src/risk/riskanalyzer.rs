use serde::{Deserialize, Serialize};

use crate::utils::errors::{Result, SimulationError};

/// Tail-risk figures of a set of terminal values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub var_95: f64,
    pub var_99: f64,
    pub cvar_95: f64,
    pub cvar_99: f64,
}

/// # RiskAnalyzer
/// Nearest-rank Value-at-Risk and Conditional VaR.
///
/// ## Details
/// - For confidence `c` the VaR index is `floor((1 - c) * n)`, clamped to
///   `[0, n - 1]`, into the ascending sort of the values.
/// - CVaR is the mean of the sorted values up to and including that index.
/// - No interpolation between ranks.
///
/// ## Example
/// ```
/// use pathsim::prelude::*;
/// let values: Vec<f64> = (1..=10).rev().map(|v| v as f64 * 10.0).collect();
/// let metrics = RiskAnalyzer::analyze(&values);
/// assert_eq!(metrics.var_95, 10.0);
/// assert_eq!(metrics.cvar_99, 10.0);
/// ```
pub struct RiskAnalyzer;

impl RiskAnalyzer {
    /// VaR/CVaR at 95% and 99%. Empty input gives all zeros.
    pub fn analyze(terminal_values: &[f64]) -> RiskMetrics {
        let sorted = sorted_copy(terminal_values);
        let (var_95, cvar_95) = tail_of_sorted(&sorted, 0.95);
        let (var_99, cvar_99) = tail_of_sorted(&sorted, 0.99);
        RiskMetrics {
            var_95,
            var_99,
            cvar_95,
            cvar_99,
        }
    }

    /// `(VaR, CVaR)` at an arbitrary confidence strictly between 0 and 1.
    pub fn tail_risk(values: &[f64], confidence: f64) -> Result<(f64, f64)> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "confidence = {} must lie in (0, 1)",
                confidence
            )));
        }
        Ok(tail_of_sorted(&sorted_copy(values), confidence))
    }
}

/// Index of the VaR observation in an ascending sample of size `n > 0`.
pub fn var_index(n: usize, confidence: f64) -> usize {
    let alpha = 1.0 - confidence;
    let idx = (alpha * n as f64).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn tail_of_sorted(sorted: &[f64], confidence: f64) -> (f64, f64) {
    if sorted.is_empty() {
        return (0.0, 0.0);
    }
    let idx = var_index(sorted.len(), confidence);
    let tail = &sorted[..=idx];
    let cvar = tail.iter().sum::<f64>() / tail.len() as f64;
    (sorted[idx], cvar)
}
