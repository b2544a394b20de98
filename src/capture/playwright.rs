//! Playwright integration for the page capture.
//!
//! The browser is driven by an inline Node.js script; this module holds the
//! script, the availability checks and the stderr → error mapping.

use crate::{DtxError, Result};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Navigates, waits for network idle, screenshots, then samples computed styles
/// from the first `maxElements` elements in document order.
pub(crate) const CAPTURE_SCRIPT: &str = r#"
const [, url, width, height, navTimeout, idleTimeout, screenshotPath, headlessFlag, maxElements, fullPageFlag] = process.argv;

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
    const page = await browser.newPage({
      viewport: { width: parseInt(width, 10), height: parseInt(height, 10) }
    });

    await page.goto(url, { waitUntil: 'networkidle', timeout: parseInt(navTimeout, 10) });
    await page.waitForLoadState('networkidle', { timeout: parseInt(idleTimeout, 10) });
    await page.screenshot({ path: screenshotPath, fullPage: fullPageFlag !== '0' });

    const snapshot = await page.evaluate((limit) => {
      const nodes = Array.from(document.querySelectorAll('*')).slice(0, limit);
      const uniq = (arr) => Array.from(new Set(arr.filter(Boolean)));
      const styles = nodes.map((el) => getComputedStyle(el));
      return {
        url: location.href,
        title: document.title,
        fonts: uniq(styles.map((cs) => cs.fontFamily)),
        radii: uniq(styles.map((cs) => cs.borderTopLeftRadius)),
        shadows: uniq(styles.map((cs) => cs.boxShadow)),
        colors: uniq(styles.flatMap((cs) => [cs.color, cs.backgroundColor]))
      };
    }, parseInt(maxElements, 10));

    console.log(JSON.stringify({ status: 'ok', snapshot }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> DtxError {
    if err.kind() == io::ErrorKind::NotFound {
        DtxError::Capture(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        DtxError::Io(err)
    }
}

/// Maps the capture script's stderr to an error, preferring its JSON error line.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> DtxError {
    let json_line = stderr
        .lines()
        .rev()
        .find_map(|line| serde_json::from_str::<ScriptError>(line.trim()).ok());
    if let Some(error) = json_line {
        return map_playwright_status_error(&error.status, error.message);
    }

    if stderr
        .to_ascii_lowercase()
        .contains("cannot find module 'playwright'")
    {
        return missing_playwright();
    }

    DtxError::Capture(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

pub(crate) fn map_playwright_status_error(status: &str, message: String) -> DtxError {
    if message
        .to_ascii_lowercase()
        .contains("cannot find module 'playwright'")
    {
        missing_playwright()
    } else {
        DtxError::Capture(format!("Playwright error (status {}): {}", status, message))
    }
}

fn missing_playwright() -> DtxError {
    DtxError::Capture(
        "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
    )
}

pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            DtxError::Capture(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(DtxError::Capture(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            DtxError::Capture(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_line_is_preferred() {
        let err = map_playwright_error(
            "exit status: 1",
            "(node:123) warning: something\n{\"status\":\"error\",\"message\":\"page.goto: net::ERR_NAME_NOT_RESOLVED\"}\n",
        );
        let msg = err.to_string();
        assert!(msg.contains("ERR_NAME_NOT_RESOLVED"), "got: {msg}");
        assert!(msg.contains("Playwright error (status error)"), "got: {msg}");
    }

    #[test]
    fn detects_missing_module_in_plain_stderr() {
        let err = map_playwright_error(
            "exit status: 1",
            "Error: Cannot find module 'playwright'\n    at Module._resolveFilename",
        );
        assert!(err.to_string().contains("Playwright npm package is missing"));
    }

    #[test]
    fn detects_missing_module_in_json_error() {
        let err = map_playwright_error(
            "1",
            r#"{"status":"error","message":"Cannot find module 'playwright'"}"#,
        );
        match err {
            DtxError::Capture(msg) => assert!(msg.contains("npm install playwright")),
            other => panic!("expected capture error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_stderr_is_preserved() {
        let err = map_playwright_error("exit status: 3", "  segfault  ");
        assert_eq!(
            err.to_string(),
            "Capture error: Playwright exited with status exit status: 3: segfault"
        );
    }

    #[test]
    fn spawn_not_found_names_command() {
        let err = map_spawn_error(io::Error::from(io::ErrorKind::NotFound), "nodejs");
        assert!(err.to_string().contains("'nodejs' was not found on PATH"));
    }

    #[tokio::test]
    async fn ensure_node_available_fails_for_missing_binary() {
        assert!(ensure_node_available("definitely-not-a-binary").await.is_err());
    }

    #[tokio::test]
    async fn ensure_playwright_available_fails_for_missing_binary() {
        assert!(ensure_playwright_available("definitely-not-a-binary")
            .await
            .is_err());
    }
}
