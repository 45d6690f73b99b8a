//! CLI argument definitions.

use crate::config::{InferenceDevice, OutputMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bird species identification from photographs.
///
/// Without a subcommand, starts the web interface.
#[derive(Debug, Parser)]
#[command(name = "aves")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the web interface (default).
    Serve,
    /// Classify image files from the command line.
    Classify(ClassifyArgs),
    /// List the species the model can identify.
    Species,
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the classify command.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Image files or directories to classify.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Also write results to a CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Do not show a progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Options accepted before or after any subcommand.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalArgs {
    /// Path to ONNX model file (overrides config).
    #[arg(long, global = true, env = "AVES_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Address for the web interface, e.g. 0.0.0.0:8501 (overrides config).
    #[arg(long, global = true, env = "AVES_BIND")]
    pub bind: Option<String>,

    /// Inference device (overrides config).
    #[arg(long, global = true, value_enum, env = "AVES_DEVICE")]
    pub device: Option<InferenceDevice>,

    /// Enable CUDA GPU acceleration.
    #[arg(long, global = true, conflicts_with = "cpu")]
    pub cuda: bool,

    /// Force CPU inference.
    #[arg(long, global = true, conflicts_with = "cuda")]
    pub cpu: bool,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Human)]
    pub output_mode: OutputMode,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: full trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Device from `--cpu`/`--cuda`, then `--device`, then `fallback`.
    pub fn resolve_device(&self, fallback: InferenceDevice) -> InferenceDevice {
        if self.cuda {
            InferenceDevice::Cuda
        } else if self.cpu {
            InferenceDevice::Cpu
        } else {
            self.device.unwrap_or(fallback)
        }
    }
}
