//! Buckets represent a half-open range of values and a count of observations
//! within that range.

use core::sync::atomic::{AtomicU64, Ordering};

/// A bucket covers the values `start..end` and counts the observations that
/// fall into that range.
///
/// The last bucket of every histogram is the sentinel bucket: its `end` is
/// `u64::MAX` and it also accepts `u64::MAX` itself, so it stands for "this
/// value or larger".
#[derive(Debug)]
pub struct Bucket {
    count: AtomicU64,
    start: u64,
    end: u64,
}

impl Bucket {
    pub(crate) fn new(start: u64, end: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            start,
            end,
        }
    }

    /// Returns the number of observations within the bucket's range.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Returns the inclusive lower bound for the bucket.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the exclusive upper bound for the bucket, or `u64::MAX` for
    /// the sentinel bucket.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Returns the range for the bucket.
    ///
    /// The range is half-open even for the sentinel bucket, which also
    /// accepts `u64::MAX` itself. Use [`Bucket::accepts`] to test membership.
    pub fn range(&self) -> core::ops::Range<u64> {
        self.start..self.end
    }

    /// Returns true if this is the unbounded-above bucket.
    pub fn is_sentinel(&self) -> bool {
        self.end == u64::MAX
    }

    /// Returns true if the value falls within this bucket.
    pub fn accepts(&self, value: u64) -> bool {
        value >= self.start && (value < self.end || self.is_sentinel())
    }

    /// Returns true if both buckets cover the same range.
    pub(crate) fn same_range(&self, other: &Bucket) -> bool {
        self.start == other.start && self.end == other.end
    }

    pub(crate) fn increment(&self, amount: u64) {
        self.count.fetch_add(amount, Ordering::Relaxed);
    }

    pub(crate) fn set_count(&self, value: u64) {
        self.count.store(value, Ordering::Relaxed);
    }
}
