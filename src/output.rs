use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::adapter::PlatformKind;
use crate::audit::AuditReport;
use crate::error::ErrorPayload;
use crate::history::HistoryEntry;
use crate::orchestrator::BuildReport;
use crate::tokens::DesignTokenSet;

/// Schema version for output payloads.
pub const DTX_OUTPUT_VERSION: &str = "0.1.0";

/// Result document printed by every command, tagged by `mode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DtxOutput {
    Capture(CaptureOutput),
    Extract(ExtractOutput),
    Tokens(TokensOutput),
    Audit(AuditOutput),
    Adapt(AdaptOutput),
    Build(BuildOutput),
    Run(RunOutput),
    History(HistoryOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    pub fonts: usize,
    pub radii: usize,
    pub shadows: usize,
    pub colors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOutput {
    pub version: String,
    pub url: String,
    pub title: String,
    pub snapshot_path: PathBuf,
    pub screenshot_path: PathBuf,
    pub signals: SignalCounts,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub theme_path: PathBuf,
    pub history: HistoryEntry,
    pub tokens: DesignTokenSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensOutput {
    pub version: String,
    pub path: PathBuf,
    pub css: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOutput {
    pub version: String,
    pub path: PathBuf,
    pub report: AuditReport,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub below_aa: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptOutput {
    pub version: String,
    pub platform: PlatformKind,
    pub scope_selector: String,
    pub specificity_boost: u32,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    pub version: String,
    #[serde(flatten)]
    pub report: BuildReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub version: String,
    pub url: String,
    pub theme_path: PathBuf,
    pub tokens_path: PathBuf,
    pub audit_path: PathBuf,
    pub tokens: DesignTokenSet,
    pub audit: AuditReport,
    pub build: BuildReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOutput {
    pub version: String,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
}
