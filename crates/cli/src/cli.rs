//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Model Decoder - driving-model output decode pipeline
#[derive(Parser, Debug)]
#[command(
    name = "model-decoder",
    author,
    version,
    about = "Driving-model output decode pipeline",
    long_about = "Decodes raw driving-model output buffers into calibrated,\n\
                  structured predictions (trajectory, lanes, leads, disengage\n\
                  confidence), maintains the recurrent model-input state, and\n\
                  dispatches decoded frames to configured sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MODEL_DECODER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MODEL_DECODER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the decode pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration and tensor layout information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "MODEL_DECODER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override replay recording path (switches executor to replay mode)
    #[arg(long, env = "MODEL_DECODER_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Override mock executor seed
    #[arg(long, env = "MODEL_DECODER_SEED")]
    pub seed: Option<u64>,

    /// Maximum number of frames to decode (0 = unlimited)
    #[arg(long, default_value = "0", env = "MODEL_DECODER_MAX_FRAMES")]
    pub max_frames: u64,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "MODEL_DECODER_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Channel buffer size for the dispatcher queue
    #[arg(long, default_value = "100", env = "MODEL_DECODER_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "MODEL_DECODER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Pace decoding at the configured model frequency instead of flat out
    #[arg(long)]
    pub realtime: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the tensor block layout
    #[arg(long)]
    pub layout: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
