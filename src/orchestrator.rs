//! Multi-platform build.
//!
//! Platforms run one at a time in the requested order. Unknown names are
//! logged and skipped; the first adapter or write error aborts the build.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapter::{AdapterRegistry, PlatformConfig, PlatformConfigs, PlatformKind};
use crate::workspace::Workspace;
use crate::{DtxError, Result};

pub const DEFAULT_PLATFORMS: &str = "tistory,wordpress,pages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducedPlatform {
    pub platform: PlatformKind,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub produced: Vec<ProducedPlatform>,
    pub skipped: Vec<String>,
}

/// Splits a comma-separated platform list, trimming names and dropping empties.
pub fn parse_platform_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs a single adapter and writes its artifacts.
pub fn adapt_platform(
    workspace: &Workspace,
    registry: &AdapterRegistry,
    kind: PlatformKind,
    tokens_css: &str,
    config: &PlatformConfig,
) -> Result<Vec<PathBuf>> {
    let adapter = registry
        .get(kind)
        .ok_or_else(|| DtxError::adapter(kind.to_string(), "no adapter registered"))?;
    let artifacts = adapter
        .produce_artifacts(tokens_css, config)
        .map_err(|err| match err {
            err @ DtxError::Adapter { .. } => err,
            other => DtxError::adapter(kind.to_string(), other.to_string()),
        })?;
    let paths = workspace.write_artifacts(&artifacts)?;
    for path in &paths {
        info!(platform = %kind, "wrote {}", path.display());
    }
    Ok(paths)
}

/// Builds every requested platform from `styles/tokens.css`.
pub fn build_platforms(
    workspace: &Workspace,
    registry: &AdapterRegistry,
    configs: &PlatformConfigs,
    platforms: &[String],
) -> Result<BuildReport> {
    let tokens_css = workspace.load_tokens_css("build")?;
    let mut report = BuildReport::default();

    for name in platforms {
        let Some(config) = configs.get(name) else {
            warn!("Unknown platform: {}", name);
            report.skipped.push(name.clone());
            continue;
        };
        let Some(kind) = registry.lookup(name).map(|adapter| adapter.kind()) else {
            warn!("No adapter for configured platform: {}", name);
            report.skipped.push(name.clone());
            continue;
        };
        if report.produced.iter().any(|p| p.platform == kind) {
            continue;
        }
        let paths = adapt_platform(workspace, registry, kind, &tokens_css, config)?;
        report.produced.push(ProducedPlatform {
            platform: kind,
            paths,
        });
    }

    info!(
        produced = report.produced.len(),
        skipped = report.skipped.len(),
        "build finished"
    );
    Ok(report)
}
