//! On-disk layout of a pipeline workspace.
//!
//! ```text
//! reports/raw.json          RawSnapshot
//! reports/source.png        screenshot
//! data/themes/latest.json   ThemeDocument (plus data/themes/history/)
//! reports/audit.json        AuditReport
//! styles/tokens.css         token stylesheet
//! dist/                     platform artifacts
//! config/platforms.json     platform configuration
//! ```
//!
//! Every stage reads its upstream file from here; a missing file is a
//! [`DtxError::MissingInput`] naming the stage that needed it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::adapter::{Artifact, PlatformConfigs};
use crate::audit::AuditReport;
use crate::capture::RawSnapshot;
use crate::history::FsThemeRepository;
use crate::{DtxError, Result};

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_snapshot_path(&self) -> PathBuf {
        self.root.join("reports").join("raw.json")
    }

    pub fn screenshot_path(&self) -> PathBuf {
        self.root.join("reports").join("source.png")
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root.join("data").join("themes")
    }

    pub fn latest_theme_path(&self) -> PathBuf {
        self.themes_dir().join("latest.json")
    }

    pub fn history_dir(&self) -> PathBuf {
        self.themes_dir().join("history")
    }

    pub fn audit_path(&self) -> PathBuf {
        self.root.join("reports").join("audit.json")
    }

    pub fn tokens_css_path(&self) -> PathBuf {
        self.root.join("styles").join("tokens.css")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    pub fn platforms_config_path(&self) -> PathBuf {
        self.root.join("config").join("platforms.json")
    }

    pub fn themes(&self) -> FsThemeRepository {
        FsThemeRepository::new(self.latest_theme_path(), self.history_dir())
    }

    pub fn save_snapshot(&self, snapshot: &RawSnapshot) -> Result<PathBuf> {
        let path = self.raw_snapshot_path();
        write_json(&path, snapshot)?;
        Ok(path)
    }

    pub fn load_snapshot(&self, stage: &str) -> Result<RawSnapshot> {
        read_json(&self.raw_snapshot_path(), stage)
    }

    /// Fails with `MissingInput` when no screenshot has been captured.
    pub fn require_screenshot(&self, stage: &str) -> Result<PathBuf> {
        require(self.screenshot_path(), stage)
    }

    pub fn save_audit(&self, report: &AuditReport) -> Result<PathBuf> {
        let path = self.audit_path();
        write_json(&path, report)?;
        Ok(path)
    }

    pub fn save_tokens_css(&self, css: &str) -> Result<PathBuf> {
        let path = self.tokens_css_path();
        write_text(&path, css)?;
        Ok(path)
    }

    pub fn load_tokens_css(&self, stage: &str) -> Result<String> {
        let path = require(self.tokens_css_path(), stage)?;
        Ok(fs::read_to_string(path)?)
    }

    pub fn platform_configs(&self) -> Result<PlatformConfigs> {
        PlatformConfigs::load(&self.platforms_config_path())
    }

    /// Writes artifacts under `dist/`, replacing files of the same name.
    pub fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
        let dist = self.dist_dir();
        artifacts
            .iter()
            .map(|artifact| {
                if artifact.relative_path.is_absolute()
                    || artifact
                        .relative_path
                        .components()
                        .any(|c| matches!(c, std::path::Component::ParentDir))
                {
                    return Err(DtxError::Config(format!(
                        "artifact path {} escapes dist/",
                        artifact.relative_path.display()
                    )));
                }
                let path = dist.join(&artifact.relative_path);
                write_text(&path, &artifact.contents)?;
                Ok(path)
            })
            .collect()
    }
}

fn require(path: PathBuf, stage: &str) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(DtxError::missing_input(stage, path))
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path, stage: &str) -> Result<T> {
    let path = require(path.to_path_buf(), stage)?;
    let text = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text)?)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_text(path, &text)
}

pub(crate) fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_follow_layout() {
        let ws = Workspace::new("/w");
        assert_eq!(ws.raw_snapshot_path(), Path::new("/w/reports/raw.json"));
        assert_eq!(ws.screenshot_path(), Path::new("/w/reports/source.png"));
        assert_eq!(ws.latest_theme_path(), Path::new("/w/data/themes/latest.json"));
        assert_eq!(ws.audit_path(), Path::new("/w/reports/audit.json"));
        assert_eq!(ws.tokens_css_path(), Path::new("/w/styles/tokens.css"));
        assert_eq!(ws.platforms_config_path(), Path::new("/w/config/platforms.json"));
    }

    #[test]
    fn missing_upstream_file_names_stage() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        match ws.load_snapshot("extract").unwrap_err() {
            DtxError::MissingInput { stage, path } => {
                assert_eq!(stage, "extract");
                assert_eq!(path, ws.raw_snapshot_path());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            ws.load_tokens_css("build"),
            Err(DtxError::MissingInput { .. })
        ));
    }

    #[test]
    fn snapshot_is_written_pretty_and_read_back() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        let snapshot = RawSnapshot {
            url: "https://a.test/".into(),
            title: "A".into(),
            radii: vec!["4px".into()],
            ..RawSnapshot::default()
        };
        ws.save_snapshot(&snapshot).unwrap();
        let text = fs::read_to_string(ws.raw_snapshot_path()).unwrap();
        assert!(text.contains("\n  \"url\""));
        assert_eq!(ws.load_snapshot("extract").unwrap(), snapshot);
    }

    #[test]
    fn artifacts_overwrite_and_stay_inside_dist() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path());
        ws.write_artifacts(&[Artifact::new("a.css", "old")]).unwrap();
        let paths = ws
            .write_artifacts(&[Artifact::new("a.css", "new"), Artifact::new("pages/b.html", "b")])
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(fs::read_to_string(ws.dist_dir().join("a.css")).unwrap(), "new");
        assert!(ws.dist_dir().join("pages").join("b.html").exists());
        assert!(ws.write_artifacts(&[Artifact::new("../x.css", "")]).is_err());
    }
}
