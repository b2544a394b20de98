//! Raw style snapshot sampled from a rendered page.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Computed-style values sampled from the first N elements of a page.
///
/// The four lists have set semantics: values are unique and their order
/// carries no ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub radii: Vec<String>,
    #[serde(default)]
    pub shadows: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl RawSnapshot {
    /// Drops empty values and duplicates from every sampled list.
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.fonts,
            &mut self.radii,
            &mut self.shadows,
            &mut self.colors,
        ] {
            uniq(list);
        }
        self
    }
}

fn uniq(values: &mut Vec<String>) {
    let mut seen = HashSet::new();
    values.retain(|v| !v.trim().is_empty() && seen.insert(v.clone()));
}

/// Result line printed by the capture script.
#[derive(Debug, Deserialize)]
pub(crate) struct ScriptResult {
    pub status: String,
    pub snapshot: Option<RawSnapshot>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_dedupes_and_drops_empty() {
        let snapshot = RawSnapshot {
            url: "https://example.com/".into(),
            title: "Example".into(),
            fonts: vec!["Inter".into(), "".into(), "Inter".into()],
            radii: vec!["0px".into(), "8px".into(), "0px".into()],
            shadows: vec!["none".into()],
            colors: vec![
                "rgb(0, 0, 0)".into(),
                "rgb(255, 255, 255)".into(),
                "rgb(0, 0, 0)".into(),
            ],
        }
        .normalized();

        assert_eq!(snapshot.fonts, vec!["Inter"]);
        assert_eq!(snapshot.radii.len(), 2);
        assert_eq!(snapshot.colors.len(), 2);
    }

    #[test]
    fn script_result_deserializes_camel_case_snapshot() {
        let json = r#"{
            "status": "ok",
            "snapshot": {
                "url": "https://example.com/",
                "title": "Example Domain",
                "fonts": ["Times"],
                "radii": ["0px"],
                "shadows": ["none"],
                "colors": ["rgb(0, 0, 0)", "rgba(0, 0, 0, 0)"]
            }
        }"#;
        let result: ScriptResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.status, "ok");
        let snapshot = result.snapshot.unwrap();
        assert_eq!(snapshot.title, "Example Domain");
        assert_eq!(snapshot.colors.len(), 2);
        assert!(result.message.is_none());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let snapshot: RawSnapshot = serde_json::from_str(r#"{"url":"https://a.test/"}"#).unwrap();
        assert!(snapshot.fonts.is_empty());
        assert!(snapshot.colors.is_empty());
        assert!(snapshot.title.is_empty());
    }
}
