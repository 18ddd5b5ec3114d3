use crate::config::{BoundaryMode, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::models::Chunk;
use crate::processors::{ChunkAggregator, MergedResult, PartialResult, ResultMerger};
use crate::readers::{ChunkReader, MeasurementParser};
use crate::utils::constants::{
    DEFAULT_CHUNK_BUFFER_SIZE, DEFAULT_CHUNK_QUEUE_DEPTH, DEFAULT_DELIMITER,
    DEFAULT_LINE_TERMINATOR, DEFAULT_WORKER_COUNT,
};
use crate::utils::progress::ProgressReporter;
use crossbeam::channel::bounded;
use std::io::Read;
use std::path::Path;
use std::thread;
use tracing::info;

/// Reader → aggregator pool → merger pipeline.
///
/// The reader and the merger each get a dedicated thread; the aggregators run
/// on a rayon pool of exactly `max_workers` threads, one worker loop per
/// thread. Chunks and partial results move between stages over bounded
/// channels, and closing a channel is the only shutdown signal.
pub struct ParallelProcessor {
    max_workers: usize,
    chunk_size: usize,
    queue_depth: usize,
    boundary_mode: BoundaryMode,
    delimiter: u8,
    line_terminator: u8,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            chunk_size: DEFAULT_CHUNK_BUFFER_SIZE,
            queue_depth: DEFAULT_CHUNK_QUEUE_DEPTH,
            boundary_mode: BoundaryMode::Split,
            delimiter: DEFAULT_DELIMITER,
            line_terminator: DEFAULT_LINE_TERMINATOR,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.resolved_worker_count())
            .with_chunk_size(config.chunk_buffer_size)
            .with_queue_depth(config.chunk_queue_depth)
            .with_boundary_mode(config.boundary_mode)
            .with_format(config.delimiter_byte(), config.line_terminator_byte())
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth.max(1);
        self
    }

    pub fn with_boundary_mode(mut self, boundary_mode: BoundaryMode) -> Self {
        self.boundary_mode = boundary_mode;
        self
    }

    pub fn with_format(mut self, delimiter: u8, line_terminator: u8) -> Self {
        self.delimiter = delimiter;
        self.line_terminator = line_terminator;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Aggregate the file at `path`. Failing to open or read it is fatal and
    /// no partial result is returned.
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<MergedResult> {
        let file = ChunkReader::open(path)?;

        info!(
            "Processing {} with {} workers, {} byte chunks, queue depth {}",
            path.display(),
            self.max_workers,
            self.chunk_size,
            self.queue_depth
        );

        self.process_reader(file, progress)
    }

    pub fn process_reader<R: Read + Send>(
        &self,
        source: R,
        progress: Option<&ProgressReporter>,
    ) -> Result<MergedResult> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|index| format!("aggregator-{}", index))
            .build()?;

        let (chunk_sender, chunk_receiver) = bounded::<Chunk>(self.queue_depth);
        let (result_sender, result_receiver) = bounded::<PartialResult>(self.max_workers);

        let reader = ChunkReader::new(self.chunk_size)
            .with_boundary_mode(self.boundary_mode)
            .with_line_terminator(self.line_terminator);
        let aggregator =
            ChunkAggregator::new(MeasurementParser::with_format(self.delimiter, self.line_terminator));
        let merger = ResultMerger::new();

        let (reader_stats, merged) = thread::scope(|scope| {
            let reader_handle = thread::Builder::new()
                .name("chunk-reader".to_string())
                .spawn_scoped(scope, move || reader.read_into(source, chunk_sender, progress))?;

            let merger_handle = thread::Builder::new()
                .name("result-merger".to_string())
                .spawn_scoped(scope, move || merger.run(result_receiver))?;

            // Blocks until every worker has seen the chunk queue close
            pool.broadcast(|context| {
                aggregator.run(
                    context.index(),
                    chunk_receiver.clone(),
                    result_sender.clone(),
                )
            });
            drop(chunk_receiver);
            drop(result_sender);

            let reader_outcome = reader_handle.join().map_err(ProcessingError::from_panic)?;
            let merged = merger_handle.join().map_err(ProcessingError::from_panic)?;

            Ok::<_, ProcessingError>((reader_outcome?, merged))
        })?;

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Read {} chunks ({} bytes)",
                reader_stats.chunks, reader_stats.bytes
            ));
        }

        info!(
            "Aggregated {} records into {} stations ({} lines skipped, {} partial results)",
            merged.stats.records,
            merged.stations.len(),
            merged.stats.skipped_lines,
            merged.partials_merged
        );

        Ok(merged)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_COUNT)
    }
}
