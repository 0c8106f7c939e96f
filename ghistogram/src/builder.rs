use crate::{BuildError, Config, Format, Growth, Histogram, MergeMode};

/// The name given to histograms that are not explicitly named.
pub const DEFAULT_NAME: &str = "Histogram";

/// A builder that can be used to construct a [`Histogram`].
///
/// ```
/// use ghistogram::{Format, Growth, Histogram};
///
/// let histogram = Histogram::builder(
///     5,
///     Growth::Multiplicative {
///         first_width: 10,
///         factor: 2.0,
///     },
/// )
/// .name("request latency (us)")
/// .format(Format::Legacy)
/// .build()
/// .unwrap();
///
/// assert_eq!(histogram.buckets().len(), 7);
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    name: String,
    buckets: usize,
    growth: Growth,
    format: Format,
    merge_mode: MergeMode,
}

impl Builder {
    /// Create a new builder that asks `growth` for `buckets` buckets.
    pub fn new(buckets: usize, growth: Growth) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            buckets,
            growth,
            format: Format::default(),
            merge_mode: MergeMode::default(),
        }
    }

    /// Set the name printed in the header of the rendered graph.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the layout used when rendering the graph.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set how [`Histogram::add_all`] treats its source.
    pub fn merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.merge_mode = merge_mode;
        self
    }

    /// Consume the builder and produce a histogram.
    pub fn build(self) -> Result<Histogram, BuildError> {
        let config = Config::new(self.buckets, self.growth)?;
        let buckets = config.layout()?;

        Ok(Histogram::from_parts(
            self.name,
            config,
            self.format,
            self.merge_mode,
            buckets,
        ))
    }
}
