use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{PagesAdapter, PlatformConfig, TistoryAdapter, WordpressAdapter};
use crate::{DtxError, Result};

/// A publishing target that knows how to consume token CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Tistory,
    Wordpress,
    Pages,
}

impl PlatformKind {
    pub const fn all() -> [PlatformKind; 3] {
        [PlatformKind::Tistory, PlatformKind::Wordpress, PlatformKind::Pages]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Tistory => "tistory",
            PlatformKind::Wordpress => "wordpress",
            PlatformKind::Pages => "pages",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PlatformKind {
    type Err = DtxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tistory" => Ok(PlatformKind::Tistory),
            "wordpress" | "wp" => Ok(PlatformKind::Wordpress),
            "pages" => Ok(PlatformKind::Pages),
            _ => Err(DtxError::Config(format!("Unknown platform: {}", s.trim()))),
        }
    }
}

/// One output file, relative to the `dist/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub relative_path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(relative_path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            contents: contents.into(),
        }
    }
}

/// Turns token CSS into the files a platform needs.
///
/// Implementations are pure: the same CSS and config always yield the same artifacts.
pub trait PlatformAdapter: Send + Sync {
    fn kind(&self) -> PlatformKind;
    fn produce_artifacts(&self, tokens_css: &str, config: &PlatformConfig) -> Result<Vec<Artifact>>;
}

/// Returns one adapter per supported platform.
pub fn default_adapters() -> Vec<Box<dyn PlatformAdapter>> {
    vec![
        Box::new(TistoryAdapter),
        Box::new(WordpressAdapter),
        Box::new(PagesAdapter),
    ]
}

/// Lookup table from platform kind to adapter, built once at startup.
pub struct AdapterRegistry {
    adapters: HashMap<PlatformKind, Box<dyn PlatformAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new(default_adapters())
    }
}

impl AdapterRegistry {
    pub fn new(adapters: Vec<Box<dyn PlatformAdapter>>) -> Self {
        Self {
            adapters: adapters.into_iter().map(|a| (a.kind(), a)).collect(),
        }
    }

    pub fn get(&self, kind: PlatformKind) -> Option<&dyn PlatformAdapter> {
        self.adapters.get(&kind).map(|a| a.as_ref())
    }

    /// Resolves a user-supplied platform name; `None` for unknown names.
    pub fn lookup(&self, name: &str) -> Option<&dyn PlatformAdapter> {
        name.parse::<PlatformKind>().ok().and_then(|kind| self.get(kind))
    }
}
