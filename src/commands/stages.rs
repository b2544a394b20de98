use dtx_lib::output::{
    AuditOutput, ExtractOutput, HistoryOutput, TokensOutput, DTX_OUTPUT_VERSION,
};
use dtx_lib::pipeline::{audit_stage, extract_stage, tokens_stage};
use dtx_lib::{DtxError, DtxOutput, ThemeRepository};

use crate::settings::Settings;

/// Run the extract command.
pub fn run_extract(settings: &Settings) -> Result<DtxOutput, DtxError> {
    let workspace = &settings.workspace;
    let mut themes = workspace.themes();
    let extraction = extract_stage(workspace, &settings.config.synthesis, &mut themes)?;
    Ok(DtxOutput::Extract(ExtractOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        theme_path: workspace.latest_theme_path(),
        history: extraction.entry,
        tokens: extraction.document.tokens,
    }))
}

/// Run the tokens command.
pub fn run_tokens(settings: &Settings) -> Result<DtxOutput, DtxError> {
    let (path, css) = tokens_stage(&settings.workspace)?;
    Ok(DtxOutput::Tokens(TokensOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        path,
        css,
    }))
}

/// Run the audit command.
pub fn run_audit(settings: &Settings) -> Result<DtxOutput, DtxError> {
    let (path, report) = audit_stage(&settings.workspace)?;
    let below_aa = report
        .failing_pairs()
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(DtxOutput::Audit(AuditOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        path,
        report,
        below_aa,
    }))
}

/// Run the history command.
pub fn run_history(settings: &Settings) -> Result<DtxOutput, DtxError> {
    let entries = settings.workspace.themes().history()?;
    Ok(DtxOutput::History(HistoryOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        entries,
    }))
}
