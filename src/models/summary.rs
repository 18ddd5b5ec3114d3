use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Running aggregate of every value observed for one station.
///
/// A summary always holds at least one observation: the only constructor
/// takes the first value, so `min <= max` and `count > 0` hold for every
/// instance built through `new`, `record` and `merge`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Summary {
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Fold one raw observation into the summary
    #[inline]
    pub fn record(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Fold an already-aggregated summary into this one
    #[inline]
    pub fn merge(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn average(&self) -> f64 {
        self.sum / self.count as f64
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MIN: {} AVG: {} MAX: {}",
            self.min,
            self.average(),
            self.max
        )
    }
}
