use serde::{Deserialize, Serialize};

use super::Validate;
use crate::utils::{ConfigError, GeometryError};

/// Discretization of lifting surfaces and bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Panels per wing section along the span
    pub spanwise_resolution: usize,
    /// Panels along each section's chord
    pub chordwise_resolution: usize,
    /// Points around each fuselage cross-section
    pub fuselage_circumferential_resolution: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            spanwise_resolution: 6,
            chordwise_resolution: 6,
            fuselage_circumferential_resolution: 24,
        }
    }
}

impl MeshConfig {
    /// Resolution check in the geometry error domain, used by the meshers.
    pub fn check(&self) -> Result<(), GeometryError> {
        if self.spanwise_resolution < 1 {
            return Err(GeometryError::InvalidResolution(format!(
                "spanwise resolution must be at least 1, got {}",
                self.spanwise_resolution
            )));
        }
        if self.chordwise_resolution < 2 {
            return Err(GeometryError::InvalidResolution(format!(
                "chordwise resolution must be at least 2, got {}",
                self.chordwise_resolution
            )));
        }
        if self.fuselage_circumferential_resolution < 3 {
            return Err(GeometryError::InvalidResolution(format!(
                "circumferential resolution must be at least 3, got {}",
                self.fuselage_circumferential_resolution
            )));
        }
        Ok(())
    }
}

impl Validate for MeshConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.check()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MeshConfig::default().check().is_ok());
    }

    #[test]
    fn test_zero_spanwise_resolution() {
        let config = MeshConfig {
            spanwise_resolution: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.check(),
            Err(GeometryError::InvalidResolution(_))
        ));
    }
}
