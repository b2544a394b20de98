use tracing::info;

use dtx_lib::output::{RunOutput, DTX_OUTPUT_VERSION};
use dtx_lib::pipeline::{audit_stage, build_stage, capture_stage, extract_stage, tokens_stage};
use dtx_lib::{parse_platform_list, AdapterRegistry, DtxError, DtxOutput, PageCapturer, Viewport};

use crate::settings::{apply_capture_overrides, Settings};

/// Run every stage in order; the first failing stage aborts the run.
pub async fn run_pipeline(
    mut settings: Settings,
    url: String,
    platforms: String,
    viewport: Option<Viewport>,
) -> Result<DtxOutput, DtxError> {
    apply_capture_overrides(&mut settings.config.capture, viewport, None)?;
    let workspace = &settings.workspace;

    let capturer = PageCapturer::new(settings.config.capture.clone());
    let page = capture_stage(workspace, &capturer, &url).await?;

    let mut themes = workspace.themes();
    let extraction = extract_stage(workspace, &settings.config.synthesis, &mut themes)?;
    let (tokens_path, _) = tokens_stage(workspace)?;
    let (audit_path, audit) = audit_stage(workspace)?;
    let build = build_stage(
        workspace,
        &AdapterRegistry::default(),
        &parse_platform_list(&platforms),
    )?;
    info!("pipeline finished for {}", page.outcome.snapshot.url);

    Ok(DtxOutput::Run(RunOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        url: page.outcome.snapshot.url,
        theme_path: workspace.latest_theme_path(),
        tokens_path,
        audit_path,
        tokens: extraction.document.tokens,
        audit,
        build,
    }))
}
