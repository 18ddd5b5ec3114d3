use crate::models::{new_station_map, ProcessingStats, StationMap};
use crate::processors::chunk_aggregator::PartialResult;
use crossbeam::channel::Receiver;
use tracing::debug;

/// The global result: owned by the merger while it runs, read-only afterwards
#[derive(Debug)]
pub struct MergedResult {
    pub stations: StationMap,
    pub stats: ProcessingStats,
    pub partials_merged: usize,
}

impl MergedResult {
    pub fn empty() -> Self {
        Self {
            stations: new_station_map(),
            stats: ProcessingStats::default(),
            partials_merged: 0,
        }
    }
}

/// Folds per-worker partial results into one station map
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMerger;

impl ResultMerger {
    pub fn new() -> Self {
        Self
    }

    /// Drain `results` in arrival order until every sender is gone
    pub fn run(&self, results: Receiver<PartialResult>) -> MergedResult {
        let mut merged = MergedResult::empty();

        for partial in results.iter() {
            debug!(
                "Merging {} stations from worker {}",
                partial.stations.len(),
                partial.worker_id
            );
            self.merge_partial(&mut merged, partial);
        }

        merged
    }

    pub fn merge_partial(&self, merged: &mut MergedResult, partial: PartialResult) {
        Self::merge_stations(&mut merged.stations, partial.stations);
        merged.stats.merge(&partial.stats);
        merged.partials_merged += 1;
    }

    /// Pairwise reduce: absent stations are moved in as-is, present ones are
    /// combined with `Summary::merge`
    pub fn merge_stations(target: &mut StationMap, incoming: StationMap) {
        for (name, summary) in incoming {
            target
                .entry(name)
                .and_modify(|existing| existing.merge(&summary))
                .or_insert(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Summary;
    use crossbeam::channel::unbounded;

    fn partial(worker_id: usize, entries: &[(&str, Summary)]) -> PartialResult {
        let mut stations = new_station_map();
        for (name, summary) in entries {
            stations.insert(name.to_string(), *summary);
        }
        PartialResult {
            worker_id,
            stations,
            stats: ProcessingStats {
                records: entries.iter().map(|(_, s)| s.count).sum(),
                ..ProcessingStats::default()
            },
        }
    }

    fn summary(values: &[f64]) -> Summary {
        let mut summary = Summary::new(values[0]);
        for value in &values[1..] {
            summary.record(*value);
        }
        summary
    }

    #[test]
    fn test_absent_station_is_copied_verbatim() {
        let mut target = new_station_map();
        let mut incoming = new_station_map();
        incoming.insert("Oslo".to_string(), summary(&[-3.0, 4.5]));

        ResultMerger::merge_stations(&mut target, incoming);

        assert_eq!(target["Oslo"], summary(&[-3.0, 4.5]));
    }

    #[test]
    fn test_present_station_is_combined() {
        let mut target = new_station_map();
        target.insert("A".to_string(), summary(&[10.0, 30.0]));
        let mut incoming = new_station_map();
        incoming.insert("A".to_string(), summary(&[-5.0, 5.0, 50.0]));

        ResultMerger::merge_stations(&mut target, incoming);

        let a = target["A"];
        assert_eq!(a.min, -5.0);
        assert_eq!(a.max, 50.0);
        assert_eq!(a.sum, 90.0);
        assert_eq!(a.count, 5);
    }

    #[test]
    fn test_run_drains_until_closed() {
        let (sender, receiver) = unbounded();
        sender
            .send(partial(0, &[("A", summary(&[1.0])), ("B", summary(&[2.0]))]))
            .unwrap();
        sender.send(partial(1, &[("A", summary(&[3.0, -1.0]))])).unwrap();
        sender.send(partial(2, &[])).unwrap();
        drop(sender);

        let merged = ResultMerger::new().run(receiver);

        assert_eq!(merged.partials_merged, 3);
        assert_eq!(merged.stats.records, 4);
        assert_eq!(merged.stations.len(), 2);
        assert_eq!(merged.stations["A"].count, 3);
        assert_eq!(merged.stations["A"].min, -1.0);
        assert_eq!(merged.stations["A"].max, 3.0);
        assert_eq!(merged.stations["B"].sum, 2.0);
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let partials = || {
            vec![
                partial(0, &[("A", summary(&[0.1, 0.2])), ("B", summary(&[7.0]))]),
                partial(1, &[("A", summary(&[0.3]))]),
                partial(2, &[("B", summary(&[-7.0, 1e6])), ("C", summary(&[2.5]))]),
            ]
        };

        let merger = ResultMerger::new();
        let mut forward = MergedResult::empty();
        for p in partials() {
            merger.merge_partial(&mut forward, p);
        }
        let mut backward = MergedResult::empty();
        for p in partials().into_iter().rev() {
            merger.merge_partial(&mut backward, p);
        }

        assert_eq!(forward.stations.len(), backward.stations.len());
        for (name, f) in &forward.stations {
            let b = backward.stations[name.as_str()];
            assert_eq!(f.min, b.min);
            assert_eq!(f.max, b.max);
            assert_eq!(f.count, b.count);
            assert!((f.sum - b.sum).abs() < 1e-9);
        }
    }
}
