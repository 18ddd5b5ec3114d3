use crate::cli::args::{Cli, Commands, PipelineArgs};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{MergedResult, ParallelProcessor};
use crate::utils::progress::ProgressReporter;
use crate::writers::ReportWriter;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Process {
            pipeline,
            sorted,
            format,
        } => {
            let config = resolve_config(cli.config.as_deref(), &pipeline)?;
            let merged = run_pipeline(config, pipeline.progress).await?;

            let stdout = std::io::stdout();
            let writer = ReportWriter::new().with_format(format).with_sorted(sorted);
            writer.write_report(&merged.stations, BufWriter::new(stdout.lock()))?;
        }

        Commands::Validate { pipeline } => {
            let config = resolve_config(cli.config.as_deref(), &pipeline)?;
            println!("Validating {}", config.input_path.display());

            let merged = run_pipeline(config, pipeline.progress).await?;
            println!("\n{}", merged.stats.generate_summary(merged.stations.len()));

            if merged.stats.skipped_lines == 0 {
                println!("✅ Every line parsed as a measurement");
            } else {
                println!(
                    "⚠️  {} lines were skipped as malformed or cut at a chunk edge",
                    merged.stats.skipped_lines
                );
            }
        }
    }

    Ok(())
}

/// Defaults → config file → `BRC_*` environment → command-line flags
pub fn resolve_config(config_file: Option<&Path>, args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(config_file)?;
    args.apply_to(&mut config);
    config.validate_settings()?;
    Ok(config)
}

/// Run the blocking pipeline off the async runtime and log the wall time
pub async fn run_pipeline(config: PipelineConfig, show_progress: bool) -> Result<MergedResult> {
    tokio::task::spawn_blocking(move || -> Result<MergedResult> {
        let start = Instant::now();
        let total_bytes = std::fs::metadata(&config.input_path)
            .map(|m| m.len())
            .unwrap_or(0);
        let progress = ProgressReporter::new(total_bytes, "Reading measurements...", !show_progress);

        let processor = ParallelProcessor::from_config(&config);
        let merged = processor.process_file(&config.input_path, Some(&progress))?;

        info!("Time: {:?}", start.elapsed());
        Ok(merged)
    })
    .await?
}

pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let outcome = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    outcome.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}
