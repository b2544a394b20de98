//! Stage runners over a [`Workspace`].
//!
//! Each stage reads its upstream file, does its work and persists its own
//! output, so stages can be invoked independently in later processes.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::adapter::{AdapterRegistry, PlatformConfig, PlatformKind};
use crate::audit::{audit, AuditReport};
use crate::capture::{CaptureOutcome, PageCapturer};
use crate::config::SynthesisConfig;
use crate::history::{HistoryEntry, ThemeRepository};
use crate::orchestrator::{adapt_platform, build_platforms, BuildReport};
use crate::swatch::palette_from_path;
use crate::tokens::{synthesize, tokens_css, ThemeDocument};
use crate::workspace::Workspace;
use crate::Result;

#[derive(Debug, Clone)]
pub struct CapturedPage {
    pub outcome: CaptureOutcome,
    pub snapshot_path: PathBuf,
}

/// Captures `url` into `reports/raw.json` and `reports/source.png`.
pub async fn capture_stage(
    workspace: &Workspace,
    capturer: &PageCapturer,
    url: &str,
) -> Result<CapturedPage> {
    let outcome = capturer.capture(url, &workspace.screenshot_path()).await?;
    let snapshot_path = workspace.save_snapshot(&outcome.snapshot)?;
    Ok(CapturedPage {
        outcome,
        snapshot_path,
    })
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: ThemeDocument,
    pub entry: HistoryEntry,
}

/// Synthesizes tokens from the captured snapshot and screenshot and stores them.
pub fn extract_stage<R>(
    workspace: &Workspace,
    synthesis: &SynthesisConfig,
    themes: &mut R,
) -> Result<Extraction>
where
    R: ThemeRepository + ?Sized,
{
    let snapshot = workspace.load_snapshot("extract")?;
    let screenshot = workspace.require_screenshot("extract")?;
    let palette = palette_from_path(&screenshot, synthesis.into())?;
    let tokens = synthesize(&snapshot, &palette, synthesis);
    let document = ThemeDocument::new(&snapshot, tokens);
    let entry = themes.save(&document)?;
    info!(
        bg = %document.tokens.bg,
        fg = %document.tokens.fg,
        brand = %document.tokens.brand,
        accent = %document.tokens.accent,
        radius = %document.tokens.radius,
        "extracted theme #{}",
        entry.seq
    );
    Ok(Extraction { document, entry })
}

/// Renders `styles/tokens.css` from the latest theme.
pub fn tokens_stage(workspace: &Workspace) -> Result<(PathBuf, String)> {
    let document = workspace.themes().require_latest("tokens")?;
    let css = tokens_css(&document.tokens);
    let path = workspace.save_tokens_css(&css)?;
    info!("wrote {}", path.display());
    Ok((path, css))
}

/// Audits the latest theme and writes `reports/audit.json`.
pub fn audit_stage(workspace: &Workspace) -> Result<(PathBuf, AuditReport)> {
    let document = workspace.themes().require_latest("audit")?;
    let report = audit(&document.tokens)?;
    for name in report.failing_pairs() {
        warn!(ratio = report.pairs[name], "{} is below WCAG AA", name);
    }
    let path = workspace.save_audit(&report)?;
    info!("wrote {}", path.display());
    Ok((path, report))
}

/// Runs one platform adapter against `styles/tokens.css`.
pub fn adapt_stage(
    workspace: &Workspace,
    registry: &AdapterRegistry,
    kind: PlatformKind,
    config: &PlatformConfig,
) -> Result<Vec<PathBuf>> {
    let css = workspace.load_tokens_css("adapt")?;
    adapt_platform(workspace, registry, kind, &css, config)
}

/// Builds the requested platforms using `config/platforms.json`.
pub fn build_stage(
    workspace: &Workspace,
    registry: &AdapterRegistry,
    platforms: &[String],
) -> Result<BuildReport> {
    let configs = workspace.platform_configs()?;
    build_platforms(workspace, registry, &configs, platforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RawSnapshot;
    use crate::history::InMemoryThemeRepository;
    use crate::DtxError;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn seeded_workspace() -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        ws.save_snapshot(&RawSnapshot {
            url: "https://seed.test/".into(),
            title: "Seed".into(),
            radii: vec!["10px".into()],
            colors: vec!["rgb(255, 255, 255)".into(), "rgb(17, 24, 39)".into()],
            fonts: vec!["Inter, sans-serif".into()],
            ..RawSnapshot::default()
        })
        .unwrap();
        RgbaImage::from_pixel(16, 16, Rgba([128, 128, 128, 255]))
            .save(ws.screenshot_path())
            .unwrap();
        (dir, ws)
    }

    #[test]
    fn extract_requires_capture() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let err = extract_stage(
            &ws,
            &SynthesisConfig::default(),
            &mut InMemoryThemeRepository::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DtxError::MissingInput { ref stage, .. } if stage == "extract"));
    }

    #[test]
    fn stages_chain_through_files() {
        let (_dir, ws) = seeded_workspace();
        let extraction = extract_stage(&ws, &SynthesisConfig::default(), &mut ws.themes()).unwrap();
        assert_eq!(extraction.entry.seq, 1);
        assert_eq!(extraction.document.tokens.radius, "10px");
        assert_eq!(extraction.document.tokens.bg.triplet(), "17 24 39");
        assert_eq!(extraction.document.tokens.fg.triplet(), "255 255 255");

        let (_, css) = tokens_stage(&ws).unwrap();
        assert!(css.contains("--radius: 10px;"));

        let (audit_path, report) = audit_stage(&ws).unwrap();
        assert!(audit_path.exists());
        assert!(report.pairs["fg_on_bg"] > 15.0);

        let report = build_stage(&ws, &AdapterRegistry::default(), &["wordpress".into()]).unwrap();
        assert_eq!(report.produced.len(), 1);
    }

    #[test]
    fn audit_and_tokens_require_theme() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        assert!(matches!(tokens_stage(&ws), Err(DtxError::MissingInput { .. })));
        assert!(matches!(audit_stage(&ws), Err(DtxError::MissingInput { .. })));
    }
}
