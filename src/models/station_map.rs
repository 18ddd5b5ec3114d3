use ahash::RandomState;
use hashbrown::HashMap;
use std::collections::BTreeMap;

use super::Summary;
use crate::utils::constants::STATION_MAP_CAPACITY;

/// Station name to summary mapping, used for both per-worker partial
/// results and the merged final result.
pub type StationMap = HashMap<String, Summary, RandomState>;

/// Key-ordered view used when a deterministic report is requested
pub type SortedStations<'a> = BTreeMap<&'a str, &'a Summary>;

pub fn new_station_map() -> StationMap {
    HashMap::with_capacity_and_hasher(STATION_MAP_CAPACITY, RandomState::new())
}

pub fn sorted_stations(stations: &StationMap) -> SortedStations<'_> {
    stations
        .iter()
        .map(|(name, summary)| (name.as_str(), summary))
        .collect()
}
