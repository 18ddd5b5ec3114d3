pub mod chunk_reader;
pub mod measurement_parser;

pub use chunk_reader::{ChunkReader, ReaderStats};
pub use measurement_parser::{Lines, MeasurementParser};
