use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum DtxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Missing input for {stage}: {} not found", path.display())]
    MissingInput { stage: String, path: PathBuf },

    #[error("Color error: {0}")]
    Color(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Adapter error ({platform}): {message}")]
    Adapter { platform: String, message: String },
}

impl DtxError {
    pub fn missing_input(stage: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DtxError::MissingInput {
            stage: stage.into(),
            path: path.into(),
        }
    }

    pub fn adapter(platform: impl Into<String>, message: impl Into<String>) -> Self {
        DtxError::Adapter {
            platform: platform.into(),
            message: message.into(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DtxError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions under the workspace root.",
            ),
            DtxError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Pass an absolute URL including the scheme (e.g., https://example.com).",
            ),
            DtxError::Image(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Re-run `dtx capture <URL>`; reports/source.png may be truncated or not a PNG.",
            ),
            DtxError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "A persisted JSON file is malformed; re-run the stage that produces it.",
            ),
            DtxError::Capture(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("playwright npm package is missing") {
                    ErrorPayload::new(
                        ErrorCategory::Capture,
                        msg.to_string(),
                        "Install Playwright (`npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("not found on path") {
                    ErrorPayload::new(
                        ErrorCategory::Capture,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH (or set capture.node_command).",
                    )
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorPayload::new(
                        ErrorCategory::Capture,
                        msg.to_string(),
                        "Raise capture.navigation_timeout/network_idle_timeout in dtx.toml or check that the page settles.",
                    )
                } else if lower.contains("err_name_not_resolved") || lower.contains("net::") {
                    ErrorPayload::new(
                        ErrorCategory::Capture,
                        msg.to_string(),
                        "The page could not be reached; check DNS/connectivity and re-run.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Capture,
                        msg.to_string(),
                        "Re-run with --verbose for browser output.",
                    )
                }
            }
            DtxError::MissingInput { stage, path } => ErrorPayload::new(
                ErrorCategory::MissingInput,
                self.to_string(),
                format!(
                    "Run the upstream stage before `{}` ({} is produced earlier in the pipeline).",
                    stage,
                    path.display()
                ),
            ),
            DtxError::Color(msg) => ErrorPayload::new(
                ErrorCategory::Input,
                msg.to_string(),
                "Token colors must be three space-separated channels 0-255 (e.g., \"17 24 39\").",
            ),
            DtxError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.to_string(),
                "Check dtx.toml and config/platforms.json, or the positional arguments.",
            ),
            DtxError::Adapter { platform, .. } => ErrorPayload::new(
                ErrorCategory::Adapter,
                self.to_string(),
                format!(
                    "Check the `{}` entry in config/platforms.json and that styles/tokens.css exists.",
                    platform
                ),
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, DtxError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Input,
    MissingInput,
    Capture,
    Config,
    Adapter,
    Io,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
