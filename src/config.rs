//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/snipsplicer/snipsplicer.toml`
//! 3. Local config: `./.snipsplicer.toml` (working directory)
//! 4. Environment variables: `SNIPSPLICER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::placement::{DROP_EDGE_FRACTION, HOVER_EDGE_FRACTION};

/// Drop-zone classifier fractions.
///
/// The hover preview is tuned shallower than the drop decision; the two
/// values are independent on purpose and both must sit strictly between
/// 0 and 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Edge fraction for hover feedback previews
    pub hover_fraction: f64,
    /// Edge fraction for the final drop decision
    pub drop_fraction: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hover_fraction: HOVER_EDGE_FRACTION,
            drop_fraction: DROP_EDGE_FRACTION,
        }
    }
}

/// Raw classifier config for intermediate parsing (fields are Option to
/// detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawClassifierConfig {
    pub hover_fraction: Option<f64>,
    pub drop_fraction: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    #[serde(default)]
    pub classifier: RawClassifierConfig,
}

impl ClassifierConfig {
    /// Merge overlay config onto self (base): overlay wins if Some,
    /// otherwise keep base.
    fn merge(&self, overlay: &RawClassifierConfig) -> Self {
        Self {
            hover_fraction: overlay.hover_fraction.unwrap_or(self.hover_fraction),
            drop_fraction: overlay.drop_fraction.unwrap_or(self.drop_fraction),
        }
    }
}

/// Unified configuration for snipsplicer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Drop-zone classifier fractions
    pub classifier: ClassifierConfig,
}

/// Get the XDG config directory for snipsplicer.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "snipsplicer").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("snipsplicer.toml"))
}

/// Get the path to the local config file in a working directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".snipsplicer.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base); specified fields win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            classifier: self.classifier.merge(&overlay.classifier),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.snipsplicer.toml`
    ///   (the working directory when None)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/snipsplicer/snipsplicer.toml`
    /// 3. Local config: `<local_dir>/.snipsplicer.toml`
    /// 4. Environment variables: `SNIPSPLICER_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Merge the global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Merge the local config
        let local_path = match local_dir {
            Some(dir) => local_config_path(dir),
            None => local_config_path(Path::new(".")),
        };
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Apply environment variables (explicit overrides)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply SNIPSPLICER_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore:
    /// `SNIPSPLICER_CLASSIFIER__DROP_FRACTION=0.25`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use the config crate just for env var parsing
        let builder = Config::builder()
            .add_source(Environment::with_prefix("SNIPSPLICER").separator("__"));

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_float("classifier.hover_fraction") {
            settings.classifier.hover_fraction = val;
        }
        if let Ok(val) = config.get_float("classifier.drop_fraction") {
            settings.classifier.drop_fraction = val;
        }

        Ok(settings)
    }

    /// Refuse fractions a classifier cannot work with.
    ///
    /// At 0 the edge margins vanish; at 1 and beyond every pointer sits in a
    /// margin and nesting becomes unreachable.
    fn validate(&self) -> Result<(), ApplicationError> {
        let fractions = [
            ("classifier.hover_fraction", self.classifier.hover_fraction),
            ("classifier.drop_fraction", self.classifier.drop_fraction),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(ApplicationError::Config {
                    message: format!(
                        "{name} must be a fraction strictly between 0 and 1, got {value}"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# snipsplicer configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/snipsplicer/snipsplicer.toml
#   Local:  ./.snipsplicer.toml
#   Env:    SNIPSPLICER_* environment variables (explicit overrides)
#
# Nested env var keys use a double underscore:
#   SNIPSPLICER_CLASSIFIER__DROP_FRACTION=0.25

[classifier]
# Edge fraction for hover feedback previews.
# Fractions must sit strictly between 0 and 1.
# hover_fraction = 0.2

# Edge fraction for the final drop decision.
# drop_fraction = 0.3
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
