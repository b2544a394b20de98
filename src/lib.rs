//! Design Token Extractor (DTX) Library
//!
//! Extracts a small design-token set from a live web page and republishes
//! it as scoped CSS for blogging platforms, CMS custom-CSS boxes and static
//! sites.
//!
//! # Module Overview
//!
//! - [`capture`] - Headless browser capture of computed styles and a screenshot
//! - [`swatch`] - Screenshot palette quantization (k-means in Lab space)
//! - [`tokens`] - Token synthesis heuristics and the token stylesheet
//! - [`audit`] - WCAG contrast ratios for token pairs
//! - [`adapter`] - Selector scoping, specificity boosting and platform adapters
//! - [`orchestrator`] - Multi-platform builds
//! - [`workspace`] / [`history`] - Persisted pipeline files
//! - [`pipeline`] - Stage runners tying the above to a workspace
//!
//! # Example
//!
//! ```no_run
//! use dtx_lib::{pipeline, AdapterRegistry, Config, PageCapturer, Workspace};
//!
//! # async fn example() -> dtx_lib::Result<()> {
//! let workspace = Workspace::new(".");
//! let config = Config::default();
//! let capturer = PageCapturer::new(config.capture.clone());
//!
//! pipeline::capture_stage(&workspace, &capturer, "https://example.com").await?;
//! pipeline::extract_stage(&workspace, &config.synthesis, &mut workspace.themes())?;
//! pipeline::tokens_stage(&workspace)?;
//! pipeline::audit_stage(&workspace)?;
//! pipeline::build_stage(&workspace, &AdapterRegistry::default(), &["tistory".into()])?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod audit;
pub mod capture;
pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod swatch;
pub mod tokens;
pub mod viewport;
pub mod workspace;

pub use adapter::{
    boost_specificity, default_adapters, selector_specificity, wrap_with_scope, AdapterRegistry,
    Artifact, PlatformAdapter, PlatformConfig, PlatformConfigs, PlatformKind, Specificity,
};
pub use audit::{audit, contrast_ratio, contrast_ratio_hex, AuditReport, AA_BODY_TEXT};
pub use capture::{parse_capture_url, CaptureOutcome, PageCapturer, RawSnapshot, MOCK_CAPTURE_ENV};
pub use color::{parse_css_color, Rgb, Rgba};
pub use config::{CaptureConfig, Config, SynthesisConfig};
pub use error::{DtxError, ErrorCategory, ErrorPayload, Result};
pub use history::{FsThemeRepository, HistoryEntry, InMemoryThemeRepository, ThemeRepository};
pub use orchestrator::{
    build_platforms, parse_platform_list, BuildReport, ProducedPlatform, DEFAULT_PLATFORMS,
};
pub use output::{DtxOutput, ErrorOutput, DTX_OUTPUT_VERSION};
pub use swatch::{extract_palette, Palette, QuantizeOptions, Swatch};
pub use tokens::{synthesize, tokens_css, DesignTokenSet, ThemeDocument, ThemeMeta};
pub use viewport::Viewport;
pub use workspace::Workspace;
