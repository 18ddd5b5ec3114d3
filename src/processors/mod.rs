pub mod chunk_aggregator;
pub mod parallel_processor;
pub mod result_merger;

pub use chunk_aggregator::{ChunkAggregator, PartialResult};
pub use parallel_processor::ParallelProcessor;
pub use result_merger::{MergedResult, ResultMerger};
