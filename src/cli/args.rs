use crate::config::{BoundaryMode, PipelineConfig};
use crate::writers::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brc-processor")]
#[command(about = "Concurrent per-station min/mean/max aggregation of measurement files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file (format detected from the extension)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a measurements file and print one line per station
    Process {
        #[command(flatten)]
        pipeline: PipelineArgs,

        #[arg(long, help = "Order the report by station name")]
        sorted: bool,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Run the pipeline and print line accounting instead of the report
    Validate {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Pipeline overrides; anything left unset falls back to the config file,
/// `BRC_*` environment variables and finally the built-in defaults
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    #[arg(
        short,
        long,
        help = "Input measurements file [default: ./data/measurements.txt]"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, help = "Bytes per chunk [default: 16777216]")]
    pub chunk_buffer_size: Option<usize>,

    #[arg(long, help = "Maximum number of buffered chunks [default: 10000]")]
    pub chunk_queue_depth: Option<usize>,

    #[arg(
        short,
        long,
        help = "Aggregator threads, 0 for one per CPU [default: 1000]"
    )]
    pub workers: Option<usize>,

    #[arg(
        long,
        value_enum,
        help = "Chunk edge handling; `split` drops or misreads lines cut at chunk edges [default: split]"
    )]
    pub boundary_mode: Option<BoundaryMode>,

    #[arg(long, help = "Show a byte progress bar on stderr")]
    pub progress: bool,
}

impl PipelineArgs {
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(size) = self.chunk_buffer_size {
            config.chunk_buffer_size = size;
        }
        if let Some(depth) = self.chunk_queue_depth {
            config.chunk_queue_depth = depth;
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if let Some(mode) = self.boundary_mode {
            config.boundary_mode = mode;
        }
    }
}
