use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Price trajectory of a single path; index 0 is the start price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    values: Vec<f64>,
}

impl Trajectory {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last value of the path, `None` only for an empty trajectory.
    pub fn terminal_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl From<Vec<f64>> for Trajectory {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// All trajectories of a run, trajectory `i` being simulation path `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    paths: Vec<Trajectory>,
}

impl SimulationResult {
    pub fn new(paths: Vec<Trajectory>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[Trajectory] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Trajectory> {
        self.paths
    }

    pub fn get(&self, index: usize) -> Option<&Trajectory> {
        self.paths.get(index)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn terminal_values(&self) -> Vec<f64> {
        self.paths
            .iter()
            .filter_map(Trajectory::terminal_value)
            .collect()
    }
}

impl Index<usize> for SimulationResult {
    type Output = Trajectory;

    fn index(&self, index: usize) -> &Trajectory {
        &self.paths[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_values() {
        let result = SimulationResult::new(vec![
            Trajectory::new(vec![1.0, 2.0, 3.0]),
            Trajectory::new(vec![1.0, 0.5, 0.25]),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.terminal_values(), vec![3.0, 0.25]);
        assert_eq!(result[1].terminal_value(), Some(0.25));
    }

    #[test]
    fn test_serializes_as_nested_arrays() {
        let result = SimulationResult::new(vec![Trajectory::new(vec![1.0, 2.0])]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"paths":[[1.0,2.0]]}"#);
    }
}
