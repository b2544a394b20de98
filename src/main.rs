mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{
    emit, run_adapt, run_audit, run_build, run_capture, run_extract, run_history, run_pipeline,
    run_tokens,
};
use formatting::render_error;
use settings::{init_logging, load_settings};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_logging(args.verbose);
    let format = args.format;

    let settings = match load_settings(&args.root, args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => return render_error(err, format),
    };

    let result = match args.command {
        Commands::Capture {
            url,
            viewport,
            max_elements,
        } => run_capture(settings, url, viewport, max_elements).await,
        Commands::Extract => run_extract(&settings),
        Commands::Tokens => run_tokens(&settings),
        Commands::Audit => run_audit(&settings),
        Commands::Adapt {
            platform,
            scope,
            boost,
        } => run_adapt(&settings, &platform, scope, boost),
        Commands::Build { platforms } => run_build(&settings, &platforms),
        Commands::Run {
            url,
            platforms,
            viewport,
        } => run_pipeline(settings, url, platforms, viewport).await,
        Commands::History => run_history(&settings),
    };

    emit(result, format)
}
