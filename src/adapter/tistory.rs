use super::{scope_and_boost, Artifact, PlatformAdapter, PlatformConfig, PlatformKind};
use crate::Result;

pub const TISTORY_SNIPPET: &str = "tistory-snippet.html";

/// Skin-editor snippet: scoped tokens plus a rule applying them to the scope root.
#[derive(Debug, Default, Clone, Copy)]
pub struct TistoryAdapter;

impl PlatformAdapter for TistoryAdapter {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Tistory
    }

    fn produce_artifacts(&self, tokens_css: &str, config: &PlatformConfig) -> Result<Vec<Artifact>> {
        let scope = config.scope_selector.trim();
        let scoped = scope_and_boost(tokens_css, scope, config.specificity_boost);
        let snippet = format!(
            "<!-- Paste into the Tistory skin HTML <head> or a <style> block -->\n<style>\n{}\n{} {{ color: rgb(var(--fg)); background: rgb(var(--bg)); font-family: var(--font-sans); }}\n</style>\n",
            scoped.trim_end(),
            scope
        );
        Ok(vec![Artifact::new(TISTORY_SNIPPET, snippet)])
    }
}
