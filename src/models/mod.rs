pub mod chunk;
pub mod station_map;
pub mod statistics;
pub mod summary;

pub use chunk::Chunk;
pub use station_map::{new_station_map, sorted_stations, SortedStations, StationMap};
pub use statistics::ProcessingStats;
pub use summary::Summary;
