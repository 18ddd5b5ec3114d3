use crate::models::{new_station_map, Chunk, ProcessingStats, StationMap, Summary};
use crate::readers::MeasurementParser;
use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, warn};

/// One worker's complete output, handed to the merger exactly once
#[derive(Debug)]
pub struct PartialResult {
    pub worker_id: usize,
    pub stations: StationMap,
    pub stats: ProcessingStats,
}

/// Parses chunks and accumulates per-station summaries into a worker-local map
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkAggregator {
    parser: MeasurementParser,
}

impl ChunkAggregator {
    pub fn new(parser: MeasurementParser) -> Self {
        Self { parser }
    }

    /// Worker loop: drain the chunk queue until it is closed and empty, then
    /// publish the accumulated partial result
    pub fn run(&self, worker_id: usize, chunks: Receiver<Chunk>, results: Sender<PartialResult>) {
        let mut stations = new_station_map();
        let mut stats = ProcessingStats::default();

        for chunk in chunks.iter() {
            self.aggregate_chunk(chunk.as_bytes(), &mut stations, &mut stats);
            stats.chunks += 1;
            stats.bytes += chunk.byte_len() as u64;
        }

        debug!(
            "Worker {} done: {} chunks, {} records, {} skipped, {} stations",
            worker_id,
            stats.chunks,
            stats.records,
            stats.skipped_lines,
            stations.len()
        );

        let partial = PartialResult {
            worker_id,
            stations,
            stats,
        };

        if results.send(partial).is_err() {
            warn!("Worker {} could not hand off its result: merger stopped", worker_id);
        }
    }

    /// Fold every well-formed line of `buffer` into `stations`.
    ///
    /// Lines that do not parse, including fragments cut at chunk edges, only
    /// bump `stats.skipped_lines`.
    pub fn aggregate_chunk(
        &self,
        buffer: &[u8],
        stations: &mut StationMap,
        stats: &mut ProcessingStats,
    ) {
        for line in self.parser.lines(buffer) {
            stats.lines += 1;

            match self.parser.parse_line(line) {
                Some((name, value)) => {
                    stations
                        .entry_ref(name)
                        .and_modify(|summary| summary.record(value))
                        .or_insert(Summary::new(value));
                    stats.records += 1;
                }
                None => stats.skipped_lines += 1,
            }
        }
    }

    /// Aggregate a standalone buffer into a fresh map
    pub fn aggregate(&self, buffer: &[u8]) -> (StationMap, ProcessingStats) {
        let mut stations = new_station_map();
        let mut stats = ProcessingStats::default();
        self.aggregate_chunk(buffer, &mut stations, &mut stats);
        (stations, stats)
    }
}
