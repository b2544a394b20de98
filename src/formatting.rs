use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use tracing::error;

use dtx_lib::output::DTX_OUTPUT_VERSION;
use dtx_lib::{AuditReport, DesignTokenSet, DtxError, DtxOutput, ErrorOutput, AA_BODY_TEXT};

use crate::cli::OutputFormat;

/// Write output in the requested format to stdout.
pub fn write_output(body: &DtxOutput, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let content = serde_json::to_string(body).map_err(io::Error::other)?;
            println!("{content}");
        }
        OutputFormat::Pretty => write_pretty_output(body)?,
    }
    Ok(())
}

/// Logs the error to stderr and renders its payload; returns the fatal exit code.
pub fn render_error(err: DtxError, format: OutputFormat) -> ExitCode {
    error!("{err}");
    let payload = DtxOutput::Error(ErrorOutput {
        version: DTX_OUTPUT_VERSION.to_string(),
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            println!("{content}");
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    }

    ExitCode::from(2)
}

fn write_pretty_output(body: &DtxOutput) -> io::Result<()> {
    if io::stdout().is_terminal() {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Non-tty: keep JSON shape for pipelines.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    println!("{content}");
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DtxOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        DtxOutput::Capture(out) => {
            let header = color("[CAPTURE]", "36", colorize);
            writeln!(buf, "{} {} ({})", header, out.url, out.title).ok();
            writeln!(
                buf,
                "Signals: {} fonts, {} radii, {} shadows, {} colors in {}ms",
                out.signals.fonts,
                out.signals.radii,
                out.signals.shadows,
                out.signals.colors,
                out.elapsed_ms
            )
            .ok();
            writeln!(buf, "- snapshot   {}", out.snapshot_path.display()).ok();
            writeln!(buf, "- screenshot {}", out.screenshot_path.display()).ok();
        }
        DtxOutput::Extract(out) => {
            let header = color("[EXTRACT]", "36", colorize);
            writeln!(
                buf,
                "{} Theme #{} from {}",
                header, out.history.seq, out.history.source
            )
            .ok();
            write_tokens(&mut buf, &out.tokens);
            writeln!(buf, "Saved: {}", out.theme_path.display()).ok();
        }
        DtxOutput::Tokens(out) => {
            let header = color("[TOKENS]", "36", colorize);
            writeln!(buf, "{} {}", header, out.path.display()).ok();
            buf.push_str(&out.css);
        }
        DtxOutput::Audit(out) => {
            let header = color("[AUDIT]", "34", colorize);
            writeln!(buf, "{} {}", header, out.path.display()).ok();
            write_audit(&mut buf, &out.report, colorize);
        }
        DtxOutput::Adapt(out) => {
            let header = color("[ADAPT]", "32", colorize);
            writeln!(
                buf,
                "{} {} (scope {}, boost {})",
                header, out.platform, out.scope_selector, out.specificity_boost
            )
            .ok();
            for path in &out.paths {
                writeln!(buf, "- {}", path.display()).ok();
            }
        }
        DtxOutput::Build(out) => {
            let header = color("[BUILD]", "32", colorize);
            writeln!(
                buf,
                "{} {} platform(s) built",
                header,
                out.report.produced.len()
            )
            .ok();
            for produced in &out.report.produced {
                for path in &produced.paths {
                    writeln!(buf, "- {:10} {}", produced.platform, path.display()).ok();
                }
            }
            for name in &out.report.skipped {
                writeln!(buf, "{} unknown platform {}", color("!", "33", colorize), name).ok();
            }
        }
        DtxOutput::Run(out) => {
            let header = color("[RUN]", "32", colorize);
            writeln!(buf, "{} {}", header, out.url).ok();
            write_tokens(&mut buf, &out.tokens);
            write_audit(&mut buf, &out.audit, colorize);
            let built: Vec<String> = out
                .build
                .produced
                .iter()
                .map(|p| p.platform.to_string())
                .collect();
            writeln!(buf, "Built: {}", built.join(", ")).ok();
            if !out.build.skipped.is_empty() {
                writeln!(buf, "Skipped: {}", out.build.skipped.join(", ")).ok();
            }
        }
        DtxOutput::History(out) => {
            let header = color("[HISTORY]", "34", colorize);
            writeln!(buf, "{} {} run(s)", header, out.entries.len()).ok();
            for entry in &out.entries {
                writeln!(
                    buf,
                    "{:>4}  {}  {}  {}",
                    entry.seq,
                    entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.source,
                    entry.title
                )
                .ok();
            }
        }
        DtxOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

fn write_tokens(buf: &mut String, tokens: &DesignTokenSet) {
    writeln!(buf, "Tokens:").ok();
    for (name, value) in [
        ("bg", tokens.bg.triplet()),
        ("fg", tokens.fg.triplet()),
        ("brand", tokens.brand.triplet()),
        ("accent", tokens.accent.triplet()),
        ("radius", tokens.radius.clone()),
        ("font-sans", tokens.font_sans.clone()),
    ] {
        writeln!(buf, "- {:10} {}", name, value).ok();
    }
}

fn write_audit(buf: &mut String, report: &AuditReport, colorize: bool) {
    writeln!(buf, "Contrast:").ok();
    for (pair, ratio) in &report.pairs {
        let code = if *ratio >= AA_BODY_TEXT { "32" } else { "31" };
        let text = color(&format!("{:.2}:1", ratio), code, colorize);
        writeln!(buf, "- {:14} {}", pair, text).ok();
    }
    writeln!(buf, "{}", report.notes).ok();
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
