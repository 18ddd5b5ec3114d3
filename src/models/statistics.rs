use serde::Serialize;

/// Line-level accounting for one worker, or for a whole run once merged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub chunks: u64,
    pub bytes: u64,
    pub lines: u64,
    pub records: u64,
    pub skipped_lines: u64,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &Self) {
        self.chunks += other.chunks;
        self.bytes += other.bytes;
        self.lines += other.lines;
        self.records += other.records;
        self.skipped_lines += other.skipped_lines;
    }

    pub fn skipped_ratio(&self) -> f64 {
        if self.lines == 0 {
            0.0
        } else {
            self.skipped_lines as f64 / self.lines as f64
        }
    }

    /// Generate a human-readable run summary
    pub fn generate_summary(&self, station_count: usize) -> String {
        let mut summary = String::new();

        summary.push_str("=== Aggregation Report ===\n");
        summary.push_str(&format!("Chunks Processed: {}\n", self.chunks));
        summary.push_str(&format!("Bytes Processed: {}\n", self.bytes));
        summary.push_str(&format!("Lines Seen: {}\n", self.lines));
        summary.push_str(&format!("Records Aggregated: {}\n", self.records));
        summary.push_str(&format!(
            "Skipped Lines: {} ({:.1}%)\n",
            self.skipped_lines,
            100.0 * self.skipped_ratio()
        ));
        summary.push_str(&format!("Stations: {}\n", station_count));

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_counters() {
        let mut total = ProcessingStats {
            chunks: 1,
            bytes: 100,
            lines: 10,
            records: 9,
            skipped_lines: 1,
        };
        total.merge(&ProcessingStats {
            chunks: 2,
            bytes: 50,
            lines: 5,
            records: 5,
            skipped_lines: 0,
        });

        assert_eq!(total.chunks, 3);
        assert_eq!(total.bytes, 150);
        assert_eq!(total.lines, 15);
        assert_eq!(total.records, 14);
        assert_eq!(total.skipped_lines, 1);
    }

    #[test]
    fn test_summary_handles_empty_run() {
        let stats = ProcessingStats::default();
        let summary = stats.generate_summary(0);

        assert!(summary.contains("Lines Seen: 0"));
        assert!(summary.contains("Skipped Lines: 0 (0.0%)"));
        assert!(summary.contains("Stations: 0"));
    }
}
