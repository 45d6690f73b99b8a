//! Aves - bird species identification from photographs.
//!
//! This crate serves a small web page that classifies an uploaded bird photo
//! into one of ten species with an ONNX image classifier, and offers the same
//! classification from the command line.

#![warn(missing_docs)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod web;

use clap::Parser;
use cli::{ClassifyArgs, Cli, Command, GlobalArgs};
use config::{
    Config, OutputMode, config_file_path, load_default_config, parse_bind_addr,
    save_default_config, validate_config,
};
use inference::{ClassifierHandle, ModelLoader};
use output::json_envelope::{
    ClassificationPayload, ConfigPayload, ErrorPayload, ErrorSeverity, FileClassification,
    ResultType,
};
use output::{CsvReportWriter, emit_json_error, emit_json_result, progress};
use pipeline::{collect_input_files, process_file};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the aves CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let mode = cli.global.output_mode;
    let result = dispatch(cli);
    if let Err(ref e) = result
        && mode == OutputMode::Json
    {
        emit_json_error(e);
    }
    result
}

fn dispatch(cli: Cli) -> Result<()> {
    if let Some(Command::Config { action }) = cli.command {
        return handle_config_command(action, cli.global.output_mode);
    }

    let mut config = load_default_config()?;
    apply_overrides(&mut config, &cli.global);
    validate_config(&config)?;

    match cli.command {
        None | Some(Command::Serve) => serve(&config),
        Some(Command::Classify(args)) => classify_files(&args, &cli.global, &config),
        Some(Command::Species) => Ok(cli::species::list_species(cli.global.output_mode)?),
        Some(Command::Config { action }) => handle_config_command(action, cli.global.output_mode),
    }
}

/// Fold CLI flags and environment variables over the loaded configuration.
fn apply_overrides(config: &mut Config, args: &GlobalArgs) {
    if let Some(path) = &args.model_path {
        config.model.path.clone_from(path);
    }
    if let Some(bind) = &args.bind {
        config.server.bind.clone_from(bind);
    }
    config.inference.device = args.resolve_device(config.inference.device);
}

/// Open the classifier once; every consumer shares the returned handle.
fn load_classifier(config: &Config) -> Result<Arc<ClassifierHandle>> {
    info!(
        "Loading model: {} (device: {})",
        config.model.path.display(),
        config.inference.device
    );
    let loader = ModelLoader::new(&config.model.path, config.inference.device);
    loader.load().inspect_err(|e| error!("{e}"))
}

/// Start the web interface and block until shutdown.
fn serve(config: &Config) -> Result<()> {
    let addr = parse_bind_addr(&config.server.bind)?;
    let handle = load_classifier(config)?;
    let state = web::AppState::new(
        handle,
        config.display.show_confidence,
        config.server.max_upload_bytes,
    );

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })?;

    runtime.block_on(web::serve(addr, state))
}

/// Classify image files and report the results.
#[allow(clippy::print_stdout)]
fn classify_files(args: &ClassifyArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    let total_start = Instant::now();

    let files = collect_input_files(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }
    info!("Found {} image file(s) to classify", files.len());

    let handle = load_classifier(config)?;

    let mut csv = args
        .csv
        .as_deref()
        .map(CsvReportWriter::create)
        .transpose()?;

    let mode = global.output_mode;
    let progress_enabled = !global.quiet && !args.no_progress && mode == OutputMode::Human;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut entries = Vec::with_capacity(files.len());
    let mut classified = 0;
    let mut failed = 0;

    for file in &files {
        progress::set_progress_message(file_progress.as_ref(), &file.display().to_string());

        match process_file(file, &handle) {
            Ok(prediction) => {
                classified += 1;
                if let Some(writer) = csv.as_mut() {
                    writer.write_prediction(file, &prediction)?;
                }
                entries.push(FileClassification {
                    path: file.clone(),
                    class_index: Some(prediction.class_index),
                    species: Some(prediction.species_name().to_string()),
                    confidence: Some(prediction.confidence),
                    error: None,
                });
            }
            Err(e) => {
                error!("Failed to classify {}: {}", file.display(), e);
                failed += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
                entries.push(FileClassification {
                    path: file.clone(),
                    class_index: None,
                    species: None,
                    confidence: None,
                    error: Some(ErrorPayload {
                        severity: ErrorSeverity::Warning,
                        ..ErrorPayload::fatal(&e)
                    }),
                });
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    if let Some(writer) = csv {
        writer.finish()?;
    }

    match mode {
        OutputMode::Json => emit_json_result(&ClassificationPayload {
            result_type: ResultType::Classification,
            model: handle.source().to_path_buf(),
            classified,
            failed,
            files: entries,
        }),
        OutputMode::Human => {
            for entry in &entries {
                match (&entry.species, entry.confidence, &entry.error) {
                    (Some(species), Some(confidence), _) => println!(
                        "{}: {} ({:.2}%)",
                        entry.path.display(),
                        species,
                        confidence * 100.0
                    ),
                    (_, _, Some(error)) => {
                        println!("{}: error: {}", entry.path.display(), error.message);
                    }
                    _ => {}
                }
            }
        }
    }

    info!(
        "Complete: {} classified, {} errors in {:.2}s",
        classified,
        failed,
        total_start.elapsed().as_secs_f64()
    );
    if failed > 0 {
        warn!("{} file(s) had errors", failed);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default because CUDA fallback is expected in auto mode.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // stdout is reserved for command results.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction, mode: OutputMode) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            match mode {
                OutputMode::Json => {
                    let value =
                        serde_json::to_value(&config).map_err(|e| Error::Internal {
                            message: format!("failed to serialize config: {e}"),
                        })?;
                    emit_json_result(&ConfigPayload {
                        result_type: ResultType::Config,
                        config_path: config_file_path()?,
                        config: value,
                    });
                }
                OutputMode::Human => {
                    let text = toml::to_string_pretty(&config)
                        .map_err(|e| Error::ConfigSerialize { source: e })?;
                    print!("{text}");
                }
            }
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
