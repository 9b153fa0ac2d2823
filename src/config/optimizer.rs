use serde::{Deserialize, Serialize};

use super::Validate;
use crate::utils::ConfigError;

/// Configuration for the penalty/L-BFGS optimization backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptiConfig {
    /// Maximum L-BFGS iterations per penalty round
    pub max_iterations: u64,
    /// Penalty weight of the first round
    pub penalty_weight: f64,
    /// Factor the penalty weight grows by between rounds
    pub penalty_growth: f64,
    /// Maximum number of penalty rounds
    pub penalty_rounds: usize,
    /// Largest bound or constraint violation accepted as converged
    pub constraint_tolerance: f64,
    /// L-BFGS history length
    pub lbfgs_memory: usize,
    /// Gradient norm below which a round stops
    pub gradient_tolerance: f64,
    /// Relative cost change below which a round stops
    pub cost_tolerance: f64,
}

impl Default for OptiConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            penalty_weight: 10.0,
            penalty_growth: 10.0,
            penalty_rounds: 8,
            constraint_tolerance: 1e-4,
            lbfgs_memory: 7,
            gradient_tolerance: 1e-9,
            cost_tolerance: 1e-14,
        }
    }
}

impl Validate for OptiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 || self.penalty_rounds == 0 || self.lbfgs_memory == 0 {
            return Err(ConfigError::ValidationError(
                "iteration, round and memory counts must be positive".to_string(),
            ));
        }
        if self.penalty_weight <= 0.0 || self.penalty_growth < 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "penalty weight {} must be positive and growth {} at least 1",
                self.penalty_weight, self.penalty_growth
            )));
        }
        if self.constraint_tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(
                "constraint tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
