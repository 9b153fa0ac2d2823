use serde::de::DeserializeOwned;
use std::path::Path;

use crate::utils::ConfigError;

/// Checks a deserialized configuration for values serde cannot reject.
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Parses and validates a configuration record from YAML. Missing fields fall
/// back to the record's defaults.
pub fn from_yaml_str<C>(yaml: &str) -> Result<C, ConfigError>
where
    C: DeserializeOwned + Validate,
{
    let config: C = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates a configuration record from a YAML file.
pub fn from_yaml_file<C, P>(path: P) -> Result<C, ConfigError>
where
    C: DeserializeOwned + Validate,
    P: AsRef<Path>,
{
    let contents = std::fs::read_to_string(path)?;
    from_yaml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MeshConfig, OptiConfig, VlmConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: VlmConfig = from_yaml_str(
            "mesh:\n  spanwise_resolution: 10\nsingularity_epsilon: 1.0e-10\n",
        )
        .unwrap();

        assert_eq!(config.mesh.spanwise_resolution, 10);
        assert_eq!(
            config.mesh.chordwise_resolution,
            MeshConfig::default().chordwise_resolution
        );
        assert_eq!(config.singularity_epsilon, 1e-10);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let result: Result<MeshConfig, _> = from_yaml_str("chordwise_resolution: 1\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result: Result<OptiConfig, _> = from_yaml_str("penalty_weight: -1.0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let result: Result<OptiConfig, _> = from_yaml_str("max_iterations: [1, 2");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<OptiConfig, _> = from_yaml_file("/nonexistent/aerolattice.yaml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }
}
