/// Default input location, relative to the working directory
pub const DEFAULT_INPUT_PATH: &str = "./data/measurements.txt";

/// Processing defaults
pub const DEFAULT_CHUNK_BUFFER_SIZE: usize = 16 * 1024 * 1024; // 16MiB
pub const DEFAULT_CHUNK_QUEUE_DEPTH: usize = 10_000;
pub const DEFAULT_WORKER_COUNT: usize = 1000;

/// Record format
pub const DEFAULT_DELIMITER: u8 = b';';
pub const DEFAULT_LINE_TERMINATOR: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Environment variable prefix for configuration overrides (BRC_WORKER_COUNT, ...)
pub const ENV_PREFIX: &str = "BRC";

/// Initial capacity of per-worker station maps
pub const STATION_MAP_CAPACITY: usize = 1024;
