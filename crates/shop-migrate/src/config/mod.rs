//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Relative dump and store paths are resolved against the directory of
    /// the configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    fn resolve_paths(&mut self, dir: &Path) {
        for path in [
            &mut self.source.dump,
            &mut self.destination.dump,
            &mut self.mapping.store,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}
