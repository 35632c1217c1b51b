use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use scanview_core::strip::strip_with_report;

#[derive(Parser, Debug)]
#[command(
    name = "strip-types",
    about = "Strip type annotations from .ts/.tsx files",
    version
)]
struct Args {
    /// Print the converted source instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Log per-rule rewrite counts
    #[arg(short, long)]
    verbose: bool,

    /// Input file (.ts, .tsx, .mts, .cts)
    input: Option<PathBuf>,

    /// Output file (defaults to the input with its suffix swapped to .js/.jsx)
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(input) = args.input.as_deref() else {
        return match print_usage() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    };

    if !input.exists() {
        eprintln!("Error: File not found: {}", input.display());
        return ExitCode::FAILURE;
    }

    match run(input, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn print_usage() -> io::Result<()> {
    Args::command().print_help()?;
    println!();
    Ok(())
}

fn run(input: &Path, args: &Args) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let (output, report) = strip_with_report(&source);
    log::info!("{}: {} rewrite(s)", input.display(), report.total());
    for rule in report.rules.iter().filter(|r| r.count > 0) {
        log::debug!("  {}: {}", rule.rule, rule.count);
    }

    if args.stdout {
        print!("{}", output);
        return Ok(());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input));
    fs::write(&output_path, output)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("Converted {} -> {}", input.display(), output_path.display());
    Ok(())
}

/// `.tsx` -> `.jsx`, `.ts` -> `.js`, `.mts` -> `.mjs`, `.cts` -> `.cjs`,
/// anything else -> `.js`. Never returns the input path itself.
fn default_output_path(input: &Path) -> PathBuf {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let target = match ext.as_deref() {
        Some("tsx") => "jsx",
        Some("mts") => "mjs",
        Some("cts") => "cjs",
        _ => "js",
    };

    let candidate = input.with_extension(target);
    if candidate != input {
        return candidate;
    }

    // Input already carries the target suffix
    input.with_extension(format!("stripped.{}", target))
}
