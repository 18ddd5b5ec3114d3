use crate::error::Result;
use crate::models::{sorted_stations, StationMap, Summary};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `(<count>) Place: <station>, MIN: <min> AVG: <avg> MAX: <max>` per line
    #[default]
    Text,
    /// A single JSON array of station objects
    Json,
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    station: &'a str,
    count: u64,
    min: f64,
    avg: f64,
    max: f64,
}

impl<'a> ReportRow<'a> {
    fn new(station: &'a str, summary: &Summary) -> Self {
        Self {
            station,
            count: summary.count,
            min: summary.min,
            avg: summary.average(),
            max: summary.max,
        }
    }
}

/// Renders the final station map. Iteration order follows the map unless
/// `sorted` is set.
pub struct ReportWriter {
    format: ReportFormat,
    sorted: bool,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            format: ReportFormat::Text,
            sorted: false,
        }
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn format_line(station: &str, summary: &Summary) -> String {
        format!("({}) Place: {}, {}", summary.count, station, summary)
    }

    /// Write the report and return the number of stations written
    pub fn write_report<W: Write>(&self, stations: &StationMap, mut out: W) -> Result<usize> {
        let rows: Vec<(&str, &Summary)> = if self.sorted {
            sorted_stations(stations).into_iter().collect()
        } else {
            stations
                .iter()
                .map(|(name, summary)| (name.as_str(), summary))
                .collect()
        };

        match self.format {
            ReportFormat::Text => {
                for (station, summary) in &rows {
                    writeln!(out, "{}", Self::format_line(station, summary))?;
                }
            }
            ReportFormat::Json => {
                let json_rows: Vec<ReportRow> = rows
                    .iter()
                    .map(|(station, summary)| ReportRow::new(station, summary))
                    .collect();
                serde_json::to_writer_pretty(&mut out, &json_rows)?;
                writeln!(out)?;
            }
        }

        out.flush()?;
        Ok(rows.len())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
