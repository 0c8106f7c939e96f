//! Write-only access to a histogram.

use crate::Histogram;
use std::sync::Arc;

/// The subset of histogram operations that record samples.
///
/// Hand this out to callers that should be able to record values but must
/// not read, reset or render the histogram.
pub trait HistogramMutator {
    /// Increment the bucket that contains `value` by `count`.
    fn add(&self, value: u64, count: u64);
}

impl HistogramMutator for Histogram {
    fn add(&self, value: u64, count: u64) {
        Histogram::add(self, value, count)
    }
}

impl<T: HistogramMutator + ?Sized> HistogramMutator for &T {
    fn add(&self, value: u64, count: u64) {
        (**self).add(value, count)
    }
}

impl<T: HistogramMutator + ?Sized> HistogramMutator for Arc<T> {
    fn add(&self, value: u64, count: u64) {
        (**self).add(value, count)
    }
}

/// A borrowed, write-only view of a [`Histogram`].
#[derive(Clone, Copy)]
pub struct Mutator<'a> {
    histogram: &'a Histogram,
}

impl<'a> Mutator<'a> {
    pub fn new(histogram: &'a Histogram) -> Self {
        Self { histogram }
    }
}

impl HistogramMutator for Mutator<'_> {
    fn add(&self, value: u64, count: u64) {
        self.histogram.add(value, count)
    }
}

impl Histogram {
    /// Returns a write-only view of this histogram.
    pub fn mutator(&self) -> Mutator<'_> {
        Mutator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mutator: &dyn HistogramMutator, values: &[u64]) {
        for value in values {
            mutator.add(*value, 1);
        }
    }

    #[test]
    fn view() {
        let histogram = Histogram::new(5, 10, 2.0).unwrap();
        record(&histogram.mutator(), &[0, 15, 15, 1000]);
        assert_eq!(histogram.counts(), vec![1, 2, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn shared() {
        let histogram = Arc::new(Histogram::new(5, 10, 2.0).unwrap());
        let mutator: Arc<dyn HistogramMutator + Send + Sync> = histogram.clone();
        mutator.add(25, 4);
        record(&histogram, &[25]);
        assert_eq!(histogram.total(), 5);
    }
}
