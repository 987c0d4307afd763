//! Monte Carlo price paths with tail-risk analytics.
//!
//! A [`SimulationConfig`](models::simulationconfig::SimulationConfig) is run by
//! the [`PathSimulator`](models::pathsimulator::PathSimulator), which returns
//! every trajectory; the terminal values feed the
//! [`RiskAnalyzer`](risk::riskanalyzer::RiskAnalyzer).
//!
//! ```
//! use pathsim::prelude::*;
//!
//! let config = SimulationConfig::new(1_000_000.0, 30, 0.05, 0.2, 1_000)
//!     .with_jumps(0.1, -0.15, 0.1);
//! let result = PathSimulator::new().with_seed(7).simulate(&config)?;
//! let metrics = RiskAnalyzer::analyze(&result.terminal_values());
//! assert!(metrics.cvar_99 <= metrics.var_99);
//! # Ok::<(), SimulationError>(())
//! ```

pub mod models;
pub mod prelude;
pub mod risk;
pub mod utils;
