//! filterexpr - evaluate a boolean filter expression against JSON.
//!
//! # Usage
//!
//! ```text
//! echo '{"age": 30, "country": "CA"}' | filterexpr 'age >= 18 AND country IN US,CA'
//! filterexpr --each 'LEN(tags) > 0' users.json
//! ```
//!
//! Prints `true` or `false` (one line per element with `--each`). Exits with
//! `0` when every result is true, `1` when any is false and `2` on error.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FILTEREXPR_LOG_LEVEL` | `warn` | Log level filter |
//! | `FILTEREXPR_LOG_FORMAT` | `text` | `text` or `json` log lines on stderr |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `FILTEREXPR_LOG_LEVEL`) |

mod config;
mod run;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use filterexpr_core::ExpressionEvaluator;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, LogFormat};
use crate::run::Mode;

/// Evaluate a boolean filter expression against a JSON document.
#[derive(Debug, Parser)]
#[command(name = "filterexpr", version, about)]
struct Args {
    /// Expression to evaluate, e.g. `age >= 18 AND NOT banned IS TRUE`.
    expression: String,

    /// JSON file to read; stdin when omitted.
    file: Option<PathBuf>,

    /// Treat the document as an array and evaluate every element.
    #[arg(long)]
    each: bool,

    /// Print nothing; report only through the exit code.
    #[arg(short, long)]
    quiet: bool,

    /// Log level filter; overrides `FILTEREXPR_LOG_LEVEL`.
    #[arg(long)]
    log_level: Option<String>,
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the configured log level.
fn init_tracing(config: &CliConfig) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level filter: {}", config.log_level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}

fn run(args: &Args) -> Result<bool> {
    let mut config = CliConfig::from_env();
    if let Some(level) = &args.log_level {
        config.log_level.clone_from(level);
    }
    init_tracing(&config)?;
    debug!(log_format = %config.log_format, "starting filterexpr");

    let document = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            run::read_document(BufReader::new(file))?
        }
        None => run::read_document(io::stdin().lock())?,
    };

    let mode = if args.each { Mode::Each } else { Mode::Single };
    let evaluator = ExpressionEvaluator::new();
    debug!(
        operators = evaluator.operators().len(),
        functions = evaluator.functions().len(),
        "evaluator ready"
    );
    let results = run::evaluate_document(&evaluator, &args.expression, document, mode)?;
    run::report(&results, args.quiet, io::stdout().lock())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
