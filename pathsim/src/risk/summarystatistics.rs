use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

/// Descriptive statistics of a terminal value distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStatistics {
    /// Empty input gives all zeros; `std_dev` is the sample deviation and
    /// zero below two observations.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let std_dev = if values.len() < 2 {
            0.0
        } else {
            Statistics::std_dev(values.iter())
        };
        Self {
            mean: Statistics::mean(values.iter()),
            median: Data::new(values.to_vec()).median(),
            std_dev,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        }
    }
}
