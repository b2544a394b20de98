use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::PlatformKind;
use crate::{DtxError, Result};

/// Per-platform scoping options from `config/platforms.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    pub scope_selector: String,
    #[serde(default)]
    pub specificity_boost: u32,
}

impl PlatformConfig {
    pub fn new(scope_selector: impl Into<String>, specificity_boost: u32) -> Self {
        Self {
            scope_selector: scope_selector.into(),
            specificity_boost,
        }
    }

    /// Built-in configuration for a platform.
    pub fn default_for(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::Tistory => Self::new("#app", 1),
            PlatformKind::Wordpress => Self::new("body", 0),
            PlatformKind::Pages => Self::new("body", 0),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.scope_selector.trim().is_empty() {
            return Err(DtxError::Config(format!(
                "platform '{}' has an empty scopeSelector",
                name
            )));
        }
        if self.scope_selector.contains(['{', '}', ',', ';']) {
            return Err(DtxError::Config(format!(
                "platform '{}' scopeSelector must be a single selector, got '{}'",
                name, self.scope_selector
            )));
        }
        Ok(())
    }
}

/// Platform name → [`PlatformConfig`] table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformConfigs(BTreeMap<String, PlatformConfig>);

impl Default for PlatformConfigs {
    fn default() -> Self {
        Self(
            PlatformKind::all()
                .into_iter()
                .map(|kind| (kind.to_string(), PlatformConfig::default_for(kind)))
                .collect(),
        )
    }
}

impl PlatformConfigs {
    /// Reads the table from `path`, falling back to built-in defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "{} not found; using built-in platform defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|err| match err {
            DtxError::Config(msg) => DtxError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let configs: Self = serde_json::from_str(text)
            .map_err(|e| DtxError::Config(format!("invalid platform config: {}", e)))?;
        for (name, cfg) in &configs.0 {
            cfg.validate(name)?;
        }
        Ok(configs)
    }

    pub fn get(&self, name: &str) -> Option<&PlatformConfig> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, config: PlatformConfig) {
        self.0.insert(name.into(), config);
    }

}
