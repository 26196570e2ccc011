mod config;
mod inspect;
mod logging;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Args, Parser, Subcommand};
use stencil_core::{Error as CoreError, TableDocument};
use stencil_emit::output::write_json_atomic;
use stencil_emit::{ArtifactTargets, EmitError, EngineOptions, TransformEngine};
use thiserror::Error;

use config::{ConfigError, Settings, load_settings};
use inspect::inspect_document;
use logging::{LogConfig, LoggingError, init_logging};

#[derive(Debug, Error)]
enum CliError {
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("{0} document(s) failed")]
    DocumentsFailed(u64),
}

#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    version,
    about = "Generate mock templates and validators from table documents"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Config file (defaults to ./stencil.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Record failed documents and continue.
    #[arg(long, global = true, default_value_t = false)]
    keep_going: bool,
    /// Write the run report JSON to this path.
    #[arg(long, global = true, value_name = "PATH")]
    report: Option<PathBuf>,
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,
    /// Also write JSON lines logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write mock templates only.
    Mock(DirArgs),
    /// Write validator modules only.
    Validator(DirArgs),
    /// Write both artifacts.
    Build(BuildArgs),
    /// Show how each column of one document is mapped.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct DirArgs {
    /// Directory of table documents.
    model_dir: PathBuf,
    /// Output directory.
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Directory of table documents (falls back to `model_dir` in the config).
    model_dir: Option<PathBuf>,
    #[arg(long, value_name = "DIR")]
    mock_dir: Option<PathBuf>,
    #[arg(long, value_name = "DIR")]
    validator_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Table document (.yml, .yaml or .json).
    file: PathBuf,
    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.global.config.as_deref())?;

    init_logging(&LogConfig {
        level: LogConfig::from_flags(
            cli.global.quiet,
            cli.global.verbose,
            settings.logging.level.as_deref(),
        ),
        log_file: cli
            .global
            .log_file
            .clone()
            .or_else(|| settings.logging.file.clone()),
    })?;

    match cli.command {
        Command::Mock(args) => {
            let targets = ArtifactTargets {
                mock_dir: Some(args.out_dir),
                validator_dir: None,
            };
            run_transform(&args.model_dir, targets, &cli.global, &settings)
        }
        Command::Validator(args) => {
            let targets = ArtifactTargets {
                mock_dir: None,
                validator_dir: Some(args.out_dir),
            };
            run_transform(&args.model_dir, targets, &cli.global, &settings)
        }
        Command::Build(args) => {
            let model_dir = args
                .model_dir
                .or_else(|| settings.model_dir.clone())
                .ok_or_else(|| {
                    CliError::InvalidArgs(
                        "model directory is required (argument or model_dir in config)"
                            .to_string(),
                    )
                })?;
            let targets = ArtifactTargets {
                mock_dir: args.mock_dir.or_else(|| settings.mock_dir.clone()),
                validator_dir: args
                    .validator_dir
                    .or_else(|| settings.validator_dir.clone()),
            };
            if targets.mock_dir.is_none() && targets.validator_dir.is_none() {
                return Err(CliError::InvalidArgs(
                    "use --mock-dir and/or --validator-dir".to_string(),
                ));
            }
            run_transform(&model_dir, targets, &cli.global, &settings)
        }
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_transform(
    model_dir: &Path,
    targets: ArtifactTargets,
    global: &GlobalArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    if !model_dir.is_dir() {
        return Err(CliError::InvalidArgs(format!(
            "model directory not found: {}",
            model_dir.display()
        )));
    }

    let start = Instant::now();
    let engine = TransformEngine::new(EngineOptions {
        targets,
        keep_going: global.keep_going || settings.keep_going,
    });
    let report = engine.run(model_dir)?;

    tracing::info!(
        event = "documents_transformed",
        run_id = %report.run_id,
        documents = report.totals.documents,
        failed = report.totals.failed,
        unknown = report.totals.unknown,
        degradations = report.totals.degradations
    );

    if let Some(path) = global.report.as_ref().or(settings.report.as_ref()) {
        write_json_atomic(path, &report)?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    if !report.is_ok() {
        tracing::info!(event = "run_finished", status = "failed", duration_ms = duration_ms);
        return Err(CliError::DocumentsFailed(report.totals.failed));
    }

    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), CliError> {
    let document = TableDocument::load(&args.file)?;
    let inspection = inspect_document(&document);
    tracing::debug!(
        event = "document_inspected",
        table = %inspection.table,
        columns = inspection.columns.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print!("{}", inspection.render_text());
    }
    Ok(())
}
