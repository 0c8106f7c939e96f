use crate::format::{self, Format};
use crate::{Bucket, BuildError, Builder, Config, Error, Growth, HistogramMutator};
use log::debug;
use parking_lot::{Mutex, MutexGuard};

/// Controls whether [`Histogram::add_all`] writes the merged counts back into
/// its source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Only the destination is changed.
    #[default]
    DestinationOnly,
    /// After the merge, the destination counts are also stored into the
    /// source, leaving both histograms with identical counts.
    Mirror,
}

/// A histogram with a fixed set of buckets that spans the whole `u64` domain.
///
/// Every bucket count is an atomic counter, and every operation that reads or
/// changes counts is additionally serialized by a single lock. Operations on
/// one histogram are therefore linearizable, and rendering or totaling always
/// sees a consistent snapshot.
///
/// Values are mapped to buckets by a linear scan. Histograms are expected to
/// hold tens of buckets, not thousands.
#[derive(Debug)]
pub struct Histogram {
    name: String,
    config: Config,
    format: Format,
    merge_mode: MergeMode,
    buckets: Box<[Bucket]>,
    lock: Mutex<()>,
}

impl Histogram {
    /// Construct a histogram with `buckets` multiplicative buckets. The first
    /// bucket is `[first_width, first_width * factor)`. A `factor` of `0.0`
    /// gives constant-width buckets.
    ///
    /// Buckets covering `[0, first_width)` and `[last, u64::MAX]` are added, so
    /// the histogram usually ends up with `buckets + 2` buckets.
    pub fn new(buckets: usize, first_width: u64, factor: f64) -> Result<Self, BuildError> {
        Self::builder(
            buckets,
            Growth::Multiplicative {
                first_width,
                factor,
            },
        )
        .build()
    }

    /// Like [`Histogram::new`], with a name for the rendered header.
    pub fn named(
        name: impl Into<String>,
        buckets: usize,
        first_width: u64,
        factor: f64,
    ) -> Result<Self, BuildError> {
        Self::builder(
            buckets,
            Growth::Multiplicative {
                first_width,
                factor,
            },
        )
        .name(name)
        .build()
    }

    /// Construct a histogram whose bucket `i` is `[base^i, base^(i+1))`. A
    /// `base` that is not greater than `1.0` is replaced by `2.0`.
    pub fn exponential(
        name: impl Into<String>,
        buckets: usize,
        base: f64,
    ) -> Result<Self, BuildError> {
        Self::builder(buckets, Growth::Exponential { base })
            .name(name)
            .build()
    }

    /// Construct a power-of-two histogram that renders in [`Format::Legacy`].
    pub fn legacy(name: impl Into<String>, buckets: usize) -> Result<Self, BuildError> {
        Self::builder(buckets, Growth::Exponential { base: 2.0 })
            .name(name)
            .format(Format::Legacy)
            .build()
    }

    /// Returns a builder for a histogram with `buckets` generated buckets.
    pub fn builder(buckets: usize, growth: Growth) -> Builder {
        Builder::new(buckets, growth)
    }

    pub(crate) fn from_parts(
        name: String,
        config: Config,
        format: Format,
        merge_mode: MergeMode,
        buckets: Box<[Bucket]>,
    ) -> Self {
        debug!(
            "created histogram `{}` with {} buckets using {:?}",
            name,
            buckets.len(),
            config.growth()
        );

        Self {
            name,
            config,
            format,
            merge_mode,
            buckets,
            lock: Mutex::new(()),
        }
    }

    /// Creates a histogram with the same name, options and bucket boundaries
    /// as this one, but with all counts at zero.
    pub fn clone_empty(&self) -> Self {
        let buckets = self
            .buckets
            .iter()
            .map(|b| Bucket::new(b.start(), b.end()))
            .collect();

        Self {
            name: self.name.clone(),
            config: self.config,
            format: self.format,
            merge_mode: self.merge_mode,
            buckets,
            lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the config the bucket layout was generated from.
    pub fn config(&self) -> Config {
        self.config
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    /// Returns the buckets, in ascending order.
    ///
    /// The counts are read without taking the lock. Use [`Histogram::counts`]
    /// for a consistent snapshot.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Increment the bucket that contains the value by one.
    pub fn increment(&self, value: u64) {
        self.add(value, 1)
    }

    /// Increment the bucket that contains the value by some count.
    pub fn add(&self, value: u64, count: u64) {
        let _guard = self.lock.lock();
        self.add_unlocked(value, count);
    }

    /// Sets every bucket count to zero.
    pub fn reset(&self) {
        let _guard = self.lock.lock();
        self.reset_unlocked();
    }

    /// Returns the total number of samples counted.
    pub fn total(&self) -> u64 {
        let _guard = self.lock.lock();
        self.total_unlocked()
    }

    /// Returns a consistent snapshot of the bucket counts.
    pub fn counts(&self) -> Vec<u64> {
        let _guard = self.lock.lock();
        self.counts_unlocked()
    }

    /// Adds all the counts of `src` into this histogram, using this
    /// histogram's [`MergeMode`].
    ///
    /// Both histograms must have identical bucket boundaries. If they do not,
    /// nothing is changed and an error is returned.
    pub fn add_all(&self, src: &Histogram) -> Result<(), Error> {
        self.add_all_with(src, self.merge_mode)
    }

    /// Like [`Histogram::add_all`], with an explicit [`MergeMode`].
    ///
    /// The two locks are always taken in ascending address order, so merges
    /// running concurrently in opposite directions cannot deadlock.
    pub fn add_all_with(&self, src: &Histogram, mode: MergeMode) -> Result<(), Error> {
        if let Err(e) = self.check_layout(src) {
            debug!(
                "cannot merge `{}` into `{}`: {}",
                src.name(),
                self.name(),
                e
            );
            return Err(e);
        }

        if core::ptr::eq(self, src) {
            let _guard = self.lock.lock();
            for bucket in self.buckets.iter() {
                bucket.set_count(bucket.count().wrapping_mul(2));
            }
            return Ok(());
        }

        let _guards = lock_both(&self.lock, &src.lock);

        for (dst, src) in self.buckets.iter().zip(src.buckets.iter()) {
            dst.increment(src.count());
            if mode == MergeMode::Mirror {
                src.set_count(dst.count());
            }
        }

        Ok(())
    }

    /// Checks that `other` has exactly the same bucket boundaries.
    pub fn check_layout(&self, other: &Histogram) -> Result<(), Error> {
        if self.buckets.len() != other.buckets.len() {
            return Err(Error::BucketCountMismatch {
                expected: self.buckets.len(),
                actual: other.buckets.len(),
            });
        }

        match self
            .buckets
            .iter()
            .zip(other.buckets.iter())
            .position(|(a, b)| !a.same_range(b))
        {
            Some(index) => Err(Error::BoundaryMismatch { index }),
            None => Ok(()),
        }
    }

    /// Render the histogram as an ASCII graph, with `prefix` at the start of
    /// every bucket line, and write it to `out`.
    ///
    /// The graph is rendered into a buffer under the lock and written to `out`
    /// after the lock is released.
    pub fn emit_graph<W: core::fmt::Write>(&self, prefix: &str, out: &mut W) -> core::fmt::Result {
        out.write_str(&self.graph(prefix))
    }

    /// Like [`Histogram::emit_graph`], for an `io::Write` sink.
    pub fn write_graph<W: std::io::Write>(&self, prefix: &str, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.graph(prefix).as_bytes())
    }

    /// Render the histogram as an ASCII graph into a new string.
    pub fn graph(&self, prefix: &str) -> String {
        let mut out = String::with_capacity(80 * self.buckets.len());
        let _guard = self.lock.lock();
        // writing into a String cannot fail
        let _ = format::render(&self.name, &self.buckets, self.format, prefix, &mut out);
        out
    }

    /// Runs `f` while holding the lock. The [`Locked`] handle lets `f`
    /// perform several operations that appear atomic to other threads.
    ///
    /// `f` must not call the locking methods of this histogram, as the lock
    /// is not re-entrant.
    pub fn call_sync<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Locked<'_>) -> R,
    {
        let locked = Locked {
            histogram: self,
            _guard: self.lock.lock(),
        };
        f(&locked)
    }

    /// Runs `f` while holding the lock, handing it only the ability to add
    /// values.
    pub fn call_sync_ex<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&dyn HistogramMutator) -> R,
    {
        self.call_sync(|locked| f(locked as &dyn HistogramMutator))
    }

    fn find(&self, value: u64) -> &Bucket {
        let last = self.buckets.len() - 1;
        let index = self
            .buckets
            .iter()
            .position(|b| value < b.end())
            .unwrap_or(last);
        let bucket = &self.buckets[index];
        debug_assert!(bucket.accepts(value));
        bucket
    }

    fn add_unlocked(&self, value: u64, count: u64) {
        self.find(value).increment(count);
    }

    fn reset_unlocked(&self) {
        for bucket in self.buckets.iter() {
            bucket.set_count(0);
        }
    }

    fn total_unlocked(&self) -> u64 {
        self.buckets
            .iter()
            .fold(0u64, |acc, b| acc.wrapping_add(b.count()))
    }

    fn counts_unlocked(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.count()).collect()
    }
}

impl core::fmt::Display for Histogram {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.graph(""))
    }
}

fn lock_both<'a>(
    a: &'a Mutex<()>,
    b: &'a Mutex<()>,
) -> (MutexGuard<'a, ()>, MutexGuard<'a, ()>) {
    if (a as *const Mutex<()>) < (b as *const Mutex<()>) {
        let a = a.lock();
        let b = b.lock();
        (a, b)
    } else {
        let b = b.lock();
        let a = a.lock();
        (a, b)
    }
}

/// Access to a [`Histogram`] while its lock is held. See
/// [`Histogram::call_sync`].
pub struct Locked<'a> {
    histogram: &'a Histogram,
    _guard: MutexGuard<'a, ()>,
}

impl Locked<'_> {
    pub fn name(&self) -> &str {
        self.histogram.name()
    }

    pub fn buckets(&self) -> &[Bucket] {
        self.histogram.buckets()
    }

    pub fn increment(&self, value: u64) {
        self.histogram.add_unlocked(value, 1);
    }

    pub fn add(&self, value: u64, count: u64) {
        self.histogram.add_unlocked(value, count);
    }

    pub fn reset(&self) {
        self.histogram.reset_unlocked();
    }

    pub fn total(&self) -> u64 {
        self.histogram.total_unlocked()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.histogram.counts_unlocked()
    }
}

impl HistogramMutator for Locked<'_> {
    fn add(&self, value: u64, count: u64) {
        self.histogram.add_unlocked(value, count);
    }
}
