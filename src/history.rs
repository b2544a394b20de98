//! Theme persistence.
//!
//! `latest.json` is overwritten on every run; each save also appends an
//! immutable record under `history/` named `<seq>-<timestamp>.json`.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tokens::ThemeDocument;
use crate::workspace::{read_json, write_json};
use crate::Result;

/// Summary of one recorded run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub seq: u32,
    pub source: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl HistoryEntry {
    fn from_document(seq: u32, doc: &ThemeDocument, path: Option<PathBuf>) -> Self {
        Self {
            seq,
            source: doc.meta.source.clone(),
            title: doc.meta.title.clone(),
            created_at: doc.meta.created_at,
            path,
        }
    }
}

pub trait ThemeRepository {
    /// Stores `doc` as the latest theme and records it in history.
    fn save(&mut self, doc: &ThemeDocument) -> Result<HistoryEntry>;
    fn latest(&self) -> Result<Option<ThemeDocument>>;
    /// Recorded runs, oldest first.
    fn history(&self) -> Result<Vec<HistoryEntry>>;
}

#[derive(Debug, Clone)]
pub struct FsThemeRepository {
    latest_path: PathBuf,
    history_dir: PathBuf,
}

impl FsThemeRepository {
    pub fn new(latest_path: impl Into<PathBuf>, history_dir: impl Into<PathBuf>) -> Self {
        Self {
            latest_path: latest_path.into(),
            history_dir: history_dir.into(),
        }
    }

    /// Loads the latest theme, failing with `MissingInput` for `stage` when absent.
    pub fn require_latest(&self, stage: &str) -> Result<ThemeDocument> {
        read_json(&self.latest_path, stage)
    }

    fn records(&self) -> Result<Vec<(u32, PathBuf)>> {
        if !self.history_dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.history_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.split('-').next())
                .and_then(|seq| seq.parse::<u32>().ok())
            {
                Some(seq) => records.push((seq, path)),
                None => warn!("ignoring unrecognized history file {}", path.display()),
            }
        }
        records.sort();
        Ok(records)
    }
}

impl ThemeRepository for FsThemeRepository {
    fn save(&mut self, doc: &ThemeDocument) -> Result<HistoryEntry> {
        write_json(&self.latest_path, doc)?;

        let seq = self.records()?.last().map(|(seq, _)| seq + 1).unwrap_or(1);
        let name = format!(
            "{:04}-{}.json",
            seq,
            doc.meta.created_at.format("%Y%m%dT%H%M%SZ")
        );
        let record = self.history_dir.join(name);
        write_json(&record, doc)?;
        info!(seq, "recorded theme {}", record.display());

        Ok(HistoryEntry::from_document(seq, doc, Some(record)))
    }

    fn latest(&self) -> Result<Option<ThemeDocument>> {
        if !self.latest_path.exists() {
            return Ok(None);
        }
        read_json(&self.latest_path, "latest").map(Some)
    }

    fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.records()?
            .into_iter()
            .map(|(seq, path)| {
                let doc: ThemeDocument = read_json(&path, "history")?;
                Ok(HistoryEntry::from_document(seq, &doc, Some(path)))
            })
            .collect()
    }
}

/// Volatile repository for tests and library callers that skip the filesystem.
#[derive(Debug, Clone, Default)]
pub struct InMemoryThemeRepository {
    documents: Vec<ThemeDocument>,
}

impl ThemeRepository for InMemoryThemeRepository {
    fn save(&mut self, doc: &ThemeDocument) -> Result<HistoryEntry> {
        self.documents.push(doc.clone());
        Ok(HistoryEntry::from_document(
            self.documents.len() as u32,
            doc,
            None,
        ))
    }

    fn latest(&self) -> Result<Option<ThemeDocument>> {
        Ok(self.documents.last().cloned())
    }

    fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .documents
            .iter()
            .enumerate()
            .map(|(i, doc)| HistoryEntry::from_document(i as u32 + 1, doc, None))
            .collect())
    }
}
