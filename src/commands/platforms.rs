use dtx_lib::output::{AdaptOutput, BuildOutput, DTX_OUTPUT_VERSION};
use dtx_lib::pipeline::{adapt_stage, build_stage};
use dtx_lib::{
    parse_platform_list, AdapterRegistry, DtxError, DtxOutput, PlatformConfig, PlatformKind,
};

use crate::settings::Settings;

/// Run the single-platform adapt command.
///
/// Scope and boost default to the platform's built-in values, not
/// `config/platforms.json`.
pub fn run_adapt(
    settings: &Settings,
    platform: &str,
    scope: Option<String>,
    boost: Option<u32>,
) -> Result<DtxOutput, DtxError> {
    let kind: PlatformKind = platform.parse()?;
    let defaults = PlatformConfig::default_for(kind);
    let config = PlatformConfig {
        scope_selector: scope
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.scope_selector),
        specificity_boost: boost.unwrap_or(defaults.specificity_boost),
    };

    let registry = AdapterRegistry::default();
    let paths = adapt_stage(&settings.workspace, &registry, kind, &config)?;
    Ok(DtxOutput::Adapt(AdaptOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        platform: kind,
        scope_selector: config.scope_selector,
        specificity_boost: config.specificity_boost,
        paths,
    }))
}

/// Run the multi-platform build command.
pub fn run_build(settings: &Settings, platforms: &str) -> Result<DtxOutput, DtxError> {
    let report = build_stage(
        &settings.workspace,
        &AdapterRegistry::default(),
        &parse_platform_list(platforms),
    )?;
    Ok(DtxOutput::Build(BuildOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        report,
    }))
}
