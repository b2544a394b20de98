//! Page snapshot capture.
//!
//! Loads one URL in headless Chromium (Playwright via Node.js), waits for
//! network idle, writes a full-page screenshot and samples computed styles
//! into a [`RawSnapshot`]. There is a single attempt per invocation; any
//! navigation or network failure is returned as an error.
//!
//! Setting `DTX_MOCK_CAPTURE_DIR` to a directory holding `raw.json` and
//! `source.png` replaces the browser with those fixtures.

mod playwright;
mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};
use url::Url;

use crate::config::CaptureConfig;
use crate::{DtxError, Result};

use playwright::{
    ensure_node_available, ensure_playwright_available, map_playwright_error,
    map_playwright_status_error, map_spawn_error, CAPTURE_SCRIPT,
};
pub use snapshot::RawSnapshot;
use snapshot::ScriptResult;

/// Environment variable naming a fixture directory used instead of a browser.
pub const MOCK_CAPTURE_ENV: &str = "DTX_MOCK_CAPTURE_DIR";

/// Validates that `input` is an absolute http(s) URL.
pub fn parse_capture_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DtxError::Config(format!(
            "Unsupported URL scheme '{}' in {}; expected http or https",
            other, input
        ))),
    }
}

/// Result of one capture run.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub snapshot: RawSnapshot,
    pub screenshot_path: PathBuf,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct PageCapturer {
    options: CaptureConfig,
    mock_dir: Option<PathBuf>,
}

impl PageCapturer {
    /// Honors `DTX_MOCK_CAPTURE_DIR` when set.
    pub fn new(options: CaptureConfig) -> Self {
        let capturer = Self {
            options,
            mock_dir: None,
        };
        match std::env::var(MOCK_CAPTURE_ENV) {
            Ok(dir) if !dir.trim().is_empty() => capturer.with_mock_dir(dir),
            _ => capturer,
        }
    }

    /// Uses fixtures from `dir` instead of launching a browser.
    pub fn with_mock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mock_dir = Some(dir.into());
        self
    }

    /// Captures `url`, writing the screenshot to `screenshot_path`.
    pub async fn capture(&self, url: &str, screenshot_path: &Path) -> Result<CaptureOutcome> {
        let parsed = parse_capture_url(url)?;
        if let Some(parent) = screenshot_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let start = Instant::now();
        let snapshot = match &self.mock_dir {
            Some(dir) => load_mock_capture(dir, parsed.as_str(), screenshot_path)?,
            None => self.run_playwright(parsed.as_str(), screenshot_path).await?,
        };
        let snapshot = snapshot.normalized();

        info!(
            url = %snapshot.url,
            fonts = snapshot.fonts.len(),
            radii = snapshot.radii.len(),
            shadows = snapshot.shadows.len(),
            colors = snapshot.colors.len(),
            "captured page in {:.1}s",
            start.elapsed().as_secs_f32()
        );

        Ok(CaptureOutcome {
            snapshot,
            screenshot_path: screenshot_path.to_path_buf(),
            elapsed: start.elapsed(),
        })
    }

    async fn run_playwright(&self, url: &str, screenshot_path: &Path) -> Result<RawSnapshot> {
        let opts = &self.options;
        ensure_node_available(&opts.node_command).await?;
        ensure_playwright_available(&opts.node_command).await?;

        debug!(
            viewport = %opts.viewport,
            nav_timeout = ?opts.navigation_timeout,
            idle_timeout = ?opts.network_idle_timeout,
            "launching headless browser for {}",
            url
        );

        let mut cmd = Command::new(&opts.node_command);
        cmd.arg("-e")
            .arg(CAPTURE_SCRIPT)
            .arg(url)
            .arg(opts.viewport.width.to_string())
            .arg(opts.viewport.height.to_string())
            .arg(opts.navigation_timeout.as_millis().to_string())
            .arg(opts.network_idle_timeout.as_millis().to_string())
            .arg(screenshot_path.to_string_lossy().to_string())
            .arg(if opts.headless { "1" } else { "0" })
            .arg(opts.max_elements.to_string())
            .arg(if opts.full_page { "1" } else { "0" })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &opts.node_command))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout_pipe {
                let _ = out.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = match timeout(opts.process_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(DtxError::Io(err)),
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Err(DtxError::Capture(format!(
                    "Playwright timed out after {:?}",
                    opts.process_timeout
                )));
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(map_playwright_error(status.to_string(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        parse_script_output(&stdout)
    }
}

/// Extracts the snapshot from the script's stdout (last JSON line wins).
fn parse_script_output(stdout: &str) -> Result<RawSnapshot> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with('{'))
        .ok_or_else(|| {
            DtxError::Capture(format!("Unexpected Playwright output: {}", stdout.trim()))
        })?;

    let result: ScriptResult = serde_json::from_str(line).map_err(|e| {
        DtxError::Capture(format!(
            "Failed to parse Playwright output: {} - raw: {}",
            e, line
        ))
    })?;

    if result.status != "ok" {
        return Err(map_playwright_status_error(
            &result.status,
            result.message.unwrap_or_else(|| "no additional details".to_string()),
        ));
    }

    result.snapshot.ok_or_else(|| {
        DtxError::Capture("Playwright returned ok status but no style snapshot".to_string())
    })
}

fn load_mock_capture(dir: &Path, url: &str, screenshot_path: &Path) -> Result<RawSnapshot> {
    let raw_path = dir.join("raw.json");
    let png_path = dir.join("source.png");
    for required in [&raw_path, &png_path] {
        if !required.exists() {
            return Err(DtxError::missing_input("capture (mock)", required.clone()));
        }
    }
    info!("using mock capture fixtures from {}", dir.display());

    let mut snapshot: RawSnapshot = serde_json::from_str(&fs::read_to_string(&raw_path)?)?;
    if snapshot.url.trim().is_empty() {
        snapshot.url = url.to_string();
    }
    fs::copy(&png_path, screenshot_path)?;
    Ok(snapshot)
}
