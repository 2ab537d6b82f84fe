//! Configuration for lineage ordering runs.
//!
//! A run is described by one TOML document:
//!
//! ```toml
//! [sorter]
//! strategy = "sliced"
//!
//! [landmarks]
//! south = { x = 0.0, y = 0.0, z = 0.0 }
//! north = { x = 0.0, y = 0.0, z = 10.0 }
//!
//! [thresholds]
//! layering_lower_deg = 30.0
//! left_right_cutoff_deg = 60.0
//!
//! [layout]
//! column_width = 40
//! line_style = "bended"
//! ```
//!
//! Missing sections fall back to defaults; missing thresholds fall back to the
//! chosen strategy's own.

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lineage_order::{LayoutError, LayoutOptions};
use lineage_sorter::{Landmarks, Sorter, SorterError, StrategyKind, Thresholds};
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file to use when none is given.
pub const CONFIG_ENV_VAR: &str = "LINEAGE_ORDER_CONFIG";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config{}: {source}", .path.as_ref().map(|p| format!(" file {}", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Sorter(#[from] SorterError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterSection {
    pub strategy: StrategyKind,
}

/// Threshold overrides in degrees; unset values take the strategy default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsSection {
    pub layering_lower_deg: Option<f64>,
    pub layering_upper_deg: Option<f64>,
    pub left_right_cutoff_deg: Option<f64>,
}

impl ThresholdsSection {
    /// Merge the overrides into the defaults of `strategy` and validate.
    pub fn resolve(&self, strategy: StrategyKind) -> Result<Thresholds> {
        let defaults = strategy.default_thresholds();
        let thresholds = Thresholds::new(
            self.layering_lower_deg
                .unwrap_or(defaults.layering_lower_deg()),
            self.layering_upper_deg
                .unwrap_or(defaults.layering_upper_deg()),
            self.left_right_cutoff_deg
                .unwrap_or(defaults.left_right_cutoff_deg()),
        )?;
        if strategy == StrategyKind::FullFrame && self.left_right_cutoff_deg.is_some() {
            tracing::warn!("left_right_cutoff_deg has no effect on the full-frame strategy");
        }
        Ok(thresholds)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub sorter: SorterSection,
    pub landmarks: Landmarks,
    pub thresholds: ThresholdsSection,
    /// Geometry of the drawn tree; unset keys keep [`LayoutOptions::default`].
    pub layout: LayoutOptions,
}

impl LineageConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), strategy = %config.sorter.strategy, "loaded config");
        Ok(config)
    }

    /// Load from `explicit`, else from [`CONFIG_ENV_VAR`], else from the
    /// platform config directory; defaults when none of them exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Self::load(Path::new(&path));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<platform config dir>/config.toml`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "lineage-order", "lineage-order")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.resolve(self.sorter.strategy)?;
        self.layout.validate()?;
        Ok(())
    }

    pub fn resolved_thresholds(&self) -> Result<Thresholds> {
        self.thresholds.resolve(self.sorter.strategy)
    }

    /// Build the configured sorter from the configured landmarks.
    pub fn build_sorter(&self) -> Result<Sorter> {
        let thresholds = self.resolved_thresholds()?;
        Ok(Sorter::from_landmarks(
            self.sorter.strategy,
            &self.landmarks,
            Some(thresholds),
        )?)
    }
}
