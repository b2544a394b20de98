//! Tool configuration (`dtx.toml`).
//!
//! Every field is optional in the file; missing values fall back to the
//! defaults below. Platform scoping lives separately in
//! `config/platforms.json` (see [`crate::adapter::PlatformConfigs`]).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{DtxError, Result, Viewport};

/// File name looked up in the workspace root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dtx.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub capture: CaptureConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    pub viewport: Viewport,
    /// Number of DOM elements (document order) whose computed styles are sampled.
    pub max_elements: usize,
    #[serde(with = "humantime_serde")]
    pub navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub network_idle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub process_timeout: Duration,
    pub node_command: String,
    pub headless: bool,
    pub full_page: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            max_elements: 800,
            navigation_timeout: Duration::from_secs(30),
            network_idle_timeout: Duration::from_secs(10),
            process_timeout: Duration::from_secs(60),
            node_command: "node".to_string(),
            headless: true,
            full_page: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    /// k for the screenshot k-means pass.
    pub clusters: usize,
    /// Sample every Nth pixel in both directions.
    pub sample_stride: u32,
    pub iterations: usize,
    /// Drop fully transparent DOM colors before the bg/fg lightness sort.
    pub skip_transparent_colors: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            clusters: 16,
            sample_stride: 4,
            iterations: 10,
            skip_transparent_colors: false,
        }
    }
}

impl Config {
    /// Loads `path` if given, else `<root>/dtx.toml` if it exists, else defaults.
    pub fn load(path: Option<&Path>, root: &Path) -> Result<(Self, Option<PathBuf>)> {
        let source = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            }
        };
        let Some(source) = source else {
            return Ok((Config::default(), None));
        };

        let text = fs::read_to_string(&source).map_err(|e| {
            DtxError::Config(format!("Failed to read config {}: {}", source.display(), e))
        })?;
        let cfg = Self::from_toml(&text).map_err(|e| match e {
            DtxError::Config(msg) => {
                DtxError::Config(format!("Invalid config ({}): {}", source.display(), msg))
            }
            other => other,
        })?;
        Ok((cfg, Some(source)))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(text).map_err(|e| DtxError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capture.max_elements == 0 {
            return Err(DtxError::Config(
                "capture.max_elements must be at least 1".to_string(),
            ));
        }
        if self.capture.node_command.trim().is_empty() {
            return Err(DtxError::Config(
                "capture.node_command must not be empty".to_string(),
            ));
        }
        if self.synthesis.clusters == 0 {
            return Err(DtxError::Config(
                "synthesis.clusters must be at least 1".to_string(),
            ));
        }
        if self.synthesis.sample_stride == 0 {
            return Err(DtxError::Config(
                "synthesis.sample_stride must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
