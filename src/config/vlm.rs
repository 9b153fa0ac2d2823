use serde::{Deserialize, Serialize};

use super::{MeshConfig, Validate};
use crate::utils::{ConfigError, SINGULARITY_EPSILON, SINGULAR_PIVOT_TOLERANCE};

/// Configuration for the vortex-lattice solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlmConfig {
    pub mesh: MeshConfig,
    /// Regularization of the induced-velocity kernel near vortex lines, in
    /// squared bound-leg lengths
    pub singularity_epsilon: f64,
    /// Relative pivot size below which the influence matrix is singular
    pub singular_pivot_tolerance: f64,
}

impl Default for VlmConfig {
    fn default() -> Self {
        Self {
            mesh: MeshConfig::default(),
            singularity_epsilon: SINGULARITY_EPSILON,
            singular_pivot_tolerance: SINGULAR_PIVOT_TOLERANCE,
        }
    }
}

impl Validate for VlmConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.mesh.validate()?;
        if !(self.singularity_epsilon > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "singularity epsilon must be positive, got {}",
                self.singularity_epsilon
            )));
        }
        if !(self.singular_pivot_tolerance > 0.0 && self.singular_pivot_tolerance < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "pivot tolerance must lie in (0, 1), got {}",
                self.singular_pivot_tolerance
            )));
        }
        Ok(())
    }
}
