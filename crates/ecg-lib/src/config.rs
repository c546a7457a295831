use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{detectors::ecg::PeakDetectorConfig, error::ConfigError, report::DEFAULT_REPORT_PATH};

pub const DEFAULT_PLOT_PATH: &str = "ecg_signal.png";

/// Settings for one analysis run, usually read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub detector: PeakDetectorConfig,
    pub report: ReportConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub path: PathBuf,
    pub max_points: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PLOT_PATH),
            max_points: 4000,
            width: 1200,
            height: 600,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        if self.plot.max_points == 0 {
            return Err(ConfigError::Zero("plot.max_points"));
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(ConfigError::Zero("plot size"));
        }
        Ok(())
    }
}
