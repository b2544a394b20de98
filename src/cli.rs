use clap::{Parser, Subcommand, ValueEnum};
use dtx_lib::orchestrator::DEFAULT_PLATFORMS;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtx")]
#[command(
    version,
    about = "Design Token Extractor - Turn a live page's look into portable CSS tokens",
    long_about = "Design Token Extractor (DTX)\n\nStages (each reads the previous stage's files under --root):\n- capture: screenshot a URL and sample computed styles into reports/\n- extract: synthesize design tokens into data/themes/latest.json\n- tokens: render styles/tokens.css\n- audit: WCAG contrast ratios into reports/audit.json\n- adapt / build: scoped platform artifacts under dist/\n\n`run` chains every stage. Use --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for capture/synthesis defaults; defaults to <root>/dtx.toml when present"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        default_value = ".",
        help = "Workspace root holding reports/, data/, styles/, dist/ and config/"
    )]
    pub root: PathBuf,

    #[arg(long, global = true, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a page screenshot and computed-style snapshot
    Capture {
        #[arg(help = "Absolute http(s) URL to capture")]
        url: String,

        #[arg(long, help = "Viewport dimensions (WIDTHxHEIGHT); overrides config")]
        viewport: Option<dtx_lib::Viewport>,

        #[arg(long, value_name = "N", help = "Number of DOM elements to sample; overrides config")]
        max_elements: Option<usize>,
    },

    /// Synthesize design tokens from the last capture
    Extract,

    /// Render styles/tokens.css from the latest theme
    Tokens,

    /// Compute WCAG contrast ratios for the latest theme
    Audit,

    /// Produce artifacts for a single platform
    Adapt {
        #[arg(help = "Platform name (tistory, wordpress, pages)")]
        platform: String,

        #[arg(help = "Scope selector; defaults to the platform's built-in scope")]
        scope: Option<String>,

        #[arg(help = "Specificity boost; defaults to the platform's built-in boost")]
        boost: Option<u32>,
    },

    /// Produce artifacts for several platforms using config/platforms.json
    Build {
        #[arg(
            default_value = DEFAULT_PLATFORMS,
            help = "Comma-separated platform list"
        )]
        platforms: String,
    },

    /// Run capture, extract, tokens, audit and build in sequence
    Run {
        #[arg(help = "Absolute http(s) URL to capture")]
        url: String,

        #[arg(
            long,
            default_value = DEFAULT_PLATFORMS,
            help = "Comma-separated platform list for the build step"
        )]
        platforms: String,

        #[arg(long, help = "Viewport dimensions (WIDTHxHEIGHT); overrides config")]
        viewport: Option<dtx_lib::Viewport>,
    },

    /// List recorded theme extractions
    History,
}

#[derive(Clone, Copy, ValueEnum, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
