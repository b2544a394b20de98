use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dtx_lib::{CaptureConfig, Config, DtxError, Viewport, Workspace};

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV: &str = "DTX_LOG";

static INIT: Once = Once::new();

/// Installs the stderr log subscriber. `DTX_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose {
            "dtx=debug,dtx_lib=debug"
        } else {
            "dtx=info,dtx_lib=info"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_target(verbose),
            )
            .with(filter)
            .init();
    });
}

/// Workspace and tool config shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub workspace: Workspace,
    pub config: Config,
    pub config_source: Option<PathBuf>,
}

/// Loads config from `--config`, `<root>/dtx.toml`, or defaults.
pub fn load_settings(root: &Path, config_path: Option<&Path>) -> Result<Settings, DtxError> {
    let (config, config_source) = Config::load(config_path, root)?;
    let settings = Settings {
        workspace: Workspace::new(root),
        config,
        config_source,
    };
    debug!("{}", format_effective_config(&settings));
    Ok(settings)
}

/// Applies capture flags given on the command line on top of the config file.
pub fn apply_capture_overrides(
    capture: &mut CaptureConfig,
    viewport: Option<Viewport>,
    max_elements: Option<usize>,
) -> Result<(), DtxError> {
    if let Some(viewport) = viewport {
        capture.viewport = viewport;
    }
    if let Some(max_elements) = max_elements {
        if max_elements == 0 {
            return Err(DtxError::Config(
                "--max-elements must be at least 1".to_string(),
            ));
        }
        capture.max_elements = max_elements;
    }
    Ok(())
}

/// Format effective config as a single-line string.
pub fn format_effective_config(settings: &Settings) -> String {
    let source = settings
        .config_source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let capture = &settings.config.capture;
    let synthesis = &settings.config.synthesis;
    format!(
        "Effective config [{source}]: root={}, viewport={}, max_elements={}, timeouts: nav={}s, network-idle={}s, process={}s, synthesis: clusters={}, stride={}, iterations={}, skip_transparent={}",
        settings.workspace.root().display(),
        capture.viewport,
        capture.max_elements,
        capture.navigation_timeout.as_secs(),
        capture.network_idle_timeout.as_secs(),
        capture.process_timeout.as_secs(),
        synthesis.clusters,
        synthesis.sample_stride,
        synthesis.iterations,
        synthesis.skip_transparent_colors,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_settings_picks_up_workspace_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("dtx.toml"),
            "[capture]\nviewport = \"800x600\"\n\n[synthesis]\nclusters = 8\n",
        )
        .unwrap();

        let settings = load_settings(dir.path(), None).unwrap();
        assert_eq!(settings.config.capture.viewport.width, 800);
        assert_eq!(settings.config.synthesis.clusters, 8);
        assert_eq!(
            settings.config_source.as_deref(),
            Some(dir.path().join("dtx.toml").as_path())
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_settings(dir.path(), Some(&missing)),
            Err(DtxError::Config(_))
        ));
    }

    #[test]
    fn capture_overrides_win_over_config() {
        let mut capture = CaptureConfig::default();
        apply_capture_overrides(
            &mut capture,
            Some(Viewport {
                width: 320,
                height: 640,
            }),
            Some(50),
        )
        .unwrap();
        assert_eq!(capture.viewport.height, 640);
        assert_eq!(capture.max_elements, 50);

        assert!(apply_capture_overrides(&mut capture, None, Some(0)).is_err());
        assert_eq!(capture.max_elements, 50);
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let settings = Settings {
            workspace: Workspace::new("site"),
            config: Config::default(),
            config_source: Some(PathBuf::from("dtx.toml")),
        };
        let summary = format_effective_config(&settings);
        assert!(summary.contains("[dtx.toml]"));
        assert!(summary.contains("viewport=1366x900"));
        assert!(summary.contains("max_elements=800"));
        assert!(summary.contains("nav=30s"));
        assert!(summary.contains("network-idle=10s"));
        assert!(summary.contains("process=60s"));
        assert!(summary.contains("clusters=16"));
        assert!(summary.contains("skip_transparent=false"));
    }
}
