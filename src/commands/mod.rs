mod capture;
mod platforms;
mod run;
mod stages;

use std::process::ExitCode;

use dtx_lib::{DtxError, DtxOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};

pub use capture::run_capture;
pub use platforms::{run_adapt, run_build};
pub use run::run_pipeline;
pub use stages::{run_audit, run_extract, run_history, run_tokens};

/// Prints a command result and maps it to the process exit code.
pub fn emit(result: Result<DtxOutput, DtxError>, format: OutputFormat) -> ExitCode {
    match result {
        Ok(body) => match write_output(&body, format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => render_error(DtxError::Io(err), format),
        },
        Err(err) => render_error(err, format),
    }
}
