//! This crate provides a fixed-bucket frequency histogram for `u64` samples,
//! meant for cheap recording of distributions such as latencies or sizes in
//! a service where many threads record concurrently.
//!
//! The bucket layout is decided once, at construction, by a bucket generator
//! (constant, multiplicative or power-of-base). Floor and sentinel buckets are
//! added as needed so that every `u64` value maps to exactly one bucket.
//! Recording never allocates.
//!
//! Histograms can be merged into each other, grouped by name in a
//! [`HistogramSet`] and rendered as an ASCII bar graph:
//!
//! ```
//! use ghistogram::Histogram;
//!
//! let histogram = Histogram::named("latency (us)", 5, 10, 2.0).unwrap();
//! histogram.add(12, 3);
//! histogram.add(500, 1);
//!
//! assert_eq!(histogram.total(), 4);
//! assert_eq!(
//!     histogram.to_string(),
//!     "latency (us) (4 Total)\n\
//!      [10 - 20]     75.00%   75.00% ############################## (3)\n\
//!      [320 - inf]   25.00%  100.00% ########## (1)\n"
//! );
//! ```

mod bucket;
mod builder;
mod config;
mod errors;
mod format;
mod histogram;
mod mutator;
mod set;

pub mod generator;

pub use bucket::Bucket;
pub use builder::{Builder, DEFAULT_NAME};
pub use config::{Config, Growth, DEFAULT_GROWTH_FACTOR};
pub use errors::{BuildError, Error};
pub use format::{Format, BAR_GLYPH, BAR_WIDTH};
pub use histogram::{Histogram, Locked, MergeMode};
pub use mutator::{HistogramMutator, Mutator};
pub use set::HistogramSet;
