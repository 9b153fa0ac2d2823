use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::utils::ConfigError;

/// Solved variable values grouped by category, in declaration order within
/// each category.
///
/// A later [`Opti`](super::Opti) that freezes a category reads the value for
/// its n-th variable of that category from here, so two problems only need
/// to declare a category's variables in the same order to share them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableCache {
    categories: BTreeMap<String, Vec<f64>>,
}

impl VariableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups `values` by their category; uncategorized variables are not
    /// cached.
    pub fn from_values(values: &[f64], categories: &[Option<String>]) -> Self {
        let mut cache = Self::new();
        for (value, category) in values.iter().zip(categories) {
            if let Some(name) = category {
                cache.push(name, *value);
            }
        }
        cache
    }

    pub fn push(&mut self, category: &str, value: f64) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .push(value);
    }

    /// Value of the `ordinal`-th variable declared in `category`.
    pub fn get(&self, category: &str, ordinal: usize) -> Option<f64> {
        self.categories
            .get(category)
            .and_then(|values| values.get(ordinal))
            .copied()
    }

    pub fn category(&self, category: &str) -> Option<&[f64]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }
}
