use super::{scope_and_boost, Artifact, PlatformAdapter, PlatformConfig, PlatformKind};
use crate::Result;

pub const WORDPRESS_CSS: &str = "wp-additional-css.css";

/// Bare stylesheet for the "Additional CSS" box.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordpressAdapter;

impl PlatformAdapter for WordpressAdapter {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Wordpress
    }

    fn produce_artifacts(&self, tokens_css: &str, config: &PlatformConfig) -> Result<Vec<Artifact>> {
        let scoped = scope_and_boost(
            tokens_css,
            &config.scope_selector,
            config.specificity_boost,
        );
        Ok(vec![Artifact::new(WORDPRESS_CSS, scoped)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_plain_scoped_css() {
        let css = ":root {\n  --fg: 1 2 3;\n}\n";
        let artifacts = WordpressAdapter
            .produce_artifacts(css, &PlatformConfig::new("body", 0))
            .unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].relative_path.to_str(), Some(WORDPRESS_CSS));
        assert_eq!(artifacts[0].contents, "body {\n  --fg: 1 2 3;\n}\n");
        assert!(!artifacts[0].contents.contains("<style>"));
    }
}
