use dtx_lib::output::{CaptureOutput, SignalCounts, DTX_OUTPUT_VERSION};
use dtx_lib::pipeline::{capture_stage, CapturedPage};
use dtx_lib::{DtxError, DtxOutput, PageCapturer, Viewport};

use crate::settings::{apply_capture_overrides, Settings};

/// Run the capture command.
pub async fn run_capture(
    mut settings: Settings,
    url: String,
    viewport: Option<Viewport>,
    max_elements: Option<usize>,
) -> Result<DtxOutput, DtxError> {
    apply_capture_overrides(&mut settings.config.capture, viewport, max_elements)?;
    let capturer = PageCapturer::new(settings.config.capture.clone());
    let page = capture_stage(&settings.workspace, &capturer, &url).await?;
    Ok(DtxOutput::Capture(capture_output(&page)))
}

pub(crate) fn capture_output(page: &CapturedPage) -> CaptureOutput {
    let snapshot = &page.outcome.snapshot;
    CaptureOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        url: snapshot.url.clone(),
        title: snapshot.title.clone(),
        snapshot_path: page.snapshot_path.clone(),
        screenshot_path: page.outcome.screenshot_path.clone(),
        signals: SignalCounts {
            fonts: snapshot.fonts.len(),
            radii: snapshot.radii.len(),
            shadows: snapshot.shadows.len(),
            colors: snapshot.colors.len(),
        },
        elapsed_ms: page.outcome.elapsed.as_millis() as u64,
    }
}
