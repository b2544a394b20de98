use std::path::Path;

use super::{scope_and_boost, Artifact, PlatformAdapter, PlatformConfig, PlatformKind};
use crate::Result;

pub const PAGES_DIR: &str = "pages";

/// Static site: a scoped stylesheet and a preview page that links it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PagesAdapter;

impl PlatformAdapter for PagesAdapter {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Pages
    }

    fn produce_artifacts(&self, tokens_css: &str, config: &PlatformConfig) -> Result<Vec<Artifact>> {
        let scope = config.scope_selector.trim();
        let mut stylesheet = scope_and_boost(tokens_css, scope, config.specificity_boost);
        if !stylesheet.ends_with('\n') {
            stylesheet.push('\n');
        }
        stylesheet.push_str(&format!(
            "{scope} {{ color: rgb(var(--fg)); background: rgb(var(--bg)); font-family: var(--font-sans); }}\n"
        ));

        let dir = Path::new(PAGES_DIR);
        Ok(vec![
            Artifact::new(dir.join("tokens.css"), stylesheet),
            Artifact::new(dir.join("index.html"), preview_html(scope)),
        ])
    }
}

fn preview_html(scope: &str) -> String {
    let (open, close) = preview_container(scope);
    format!(
        r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Design tokens</title>
  <link rel="stylesheet" href="tokens.css">
  <style>
    .swatches {{ display: flex; gap: var(--space-base); flex-wrap: wrap; }}
    .swatch {{ width: 8rem; height: 5rem; border-radius: var(--radius); box-shadow: var(--shadow-card); display: flex; align-items: flex-end; padding: .5rem; }}
    .card {{ margin-top: calc(var(--space-base) * 2); padding: var(--space-base); border-radius: var(--radius); box-shadow: var(--shadow-card); }}
  </style>
</head>
<body>
{open}
  <main style="padding: calc(var(--space-base) * 2)">
    <h1>Design tokens</h1>
    <div class="swatches">
      <div class="swatch" style="background: rgb(var(--bg)); color: rgb(var(--fg))">bg</div>
      <div class="swatch" style="background: rgb(var(--fg)); color: rgb(var(--bg))">fg</div>
      <div class="swatch" style="background: rgb(var(--brand)); color: #fff">brand</div>
      <div class="swatch" style="background: rgb(var(--accent)); color: #000">accent</div>
    </div>
    <div class="card">
      <p>The quick brown fox jumps over the lazy dog.</p>
      <a href="#" style="color: rgb(var(--brand))">Brand link</a>
    </div>
  </main>
{close}
</body>
</html>
"##
    )
}

/// Wrapper markup so the preview content sits inside the scope root.
fn preview_container(scope: &str) -> (String, String) {
    if let Some(id) = scope.strip_prefix('#').filter(|s| is_plain_name(s)) {
        (format!("<div id=\"{id}\">"), "</div>".to_string())
    } else if let Some(class) = scope.strip_prefix('.').filter(|s| is_plain_name(s)) {
        (format!("<div class=\"{class}\">"), "</div>".to_string())
    } else {
        (String::new(), String::new())
    }
}

fn is_plain_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_stylesheet_and_preview() {
        let css = ":root {\n  --bg: 0 0 0;\n}\n";
        let artifacts = PagesAdapter
            .produce_artifacts(css, &PlatformConfig::new("body", 0))
            .unwrap();
        let paths: Vec<_> = artifacts
            .iter()
            .map(|a| a.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(paths, vec!["pages/tokens.css", "pages/index.html"]);
        assert!(artifacts[0].contents.starts_with("body {\n  --bg: 0 0 0;\n}\n"));
        assert!(artifacts[0].contents.contains("body { color: rgb(var(--fg));"));
        assert!(artifacts[1].contents.contains("href=\"tokens.css\""));
    }

    #[test]
    fn preview_nests_content_in_id_scope() {
        let artifacts = PagesAdapter
            .produce_artifacts(":root{}", &PlatformConfig::new("#app", 2))
            .unwrap();
        assert!(artifacts[0].contents.starts_with("#app:not(#_):not(#_){}"));
        assert!(artifacts[1].contents.contains("<div id=\"app\">"));
    }

    #[test]
    fn complex_scope_gets_no_wrapper() {
        assert_eq!(preview_container("main > article"), (String::new(), String::new()));
        assert_eq!(
            preview_container(".entry-content"),
            ("<div class=\"entry-content\">".to_string(), "</div>".to_string())
        );
    }
}
