//! Concurrent per-station aggregation of `<station>;<value>` measurement files.
//!
//! A reader thread cuts the input into fixed-size chunks, a fixed pool of
//! aggregator threads folds them into private station maps, and a single
//! merger combines those maps into the final result.
//!
//! With the default [`config::BoundaryMode::Split`], chunks are cut at exact
//! byte counts and the line fragments on either side of a cut are parsed
//! independently. Records that straddle a chunk edge are therefore dropped
//! or misattributed. [`config::BoundaryMode::Stitch`] carries partial lines
//! across chunk edges and produces exact results.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use processors::{MergedResult, ParallelProcessor};
