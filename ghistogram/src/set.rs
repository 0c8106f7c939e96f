//! A collection of histograms identified by unique names.

use crate::{Error, Histogram, MergeMode};
use log::debug;
use std::collections::btree_map::{self, BTreeMap};

/// A map of histograms keyed by name.
///
/// Histograms are rendered in ascending name order.
#[derive(Debug, Default)]
pub struct HistogramSet {
    histograms: BTreeMap<String, Histogram>,
}

impl HistogramSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a histogram, returning the one previously held under `name`.
    pub fn insert(&mut self, name: impl Into<String>, histogram: Histogram) -> Option<Histogram> {
        self.histograms.insert(name.into(), histogram)
    }

    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.histograms.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Histogram> {
        self.histograms.remove(name)
    }

    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.histograms.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Histogram> {
        self.histograms.iter()
    }

    /// Adds every histogram of `src` into the histogram of the same name in
    /// this set. Missing entries are created empty, with the same boundaries
    /// as their source, before the counts are added.
    ///
    /// Every entry is checked before anything is changed. If any pair of
    /// histograms has different bucket boundaries, an error naming it is
    /// returned and this set is left untouched.
    pub fn merge(&mut self, src: &HistogramSet) -> Result<(), Error> {
        self.merge_with(src, MergeMode::DestinationOnly)
    }

    /// Like [`HistogramSet::merge`], with an explicit [`MergeMode`] used for
    /// every histogram.
    pub fn merge_with(&mut self, src: &HistogramSet, mode: MergeMode) -> Result<(), Error> {
        for (name, histogram) in src.iter() {
            if let Some(existing) = self.histograms.get(name) {
                existing.check_layout(histogram).map_err(|e| {
                    debug!("cannot merge histogram set: `{name}` differs: {e}");
                    Error::Incompatible {
                        name: name.clone(),
                        source: Box::new(e),
                    }
                })?;
            }
        }

        for (name, histogram) in src.iter() {
            let dst = self
                .histograms
                .entry(name.clone())
                .or_insert_with(|| histogram.clone_empty());

            dst.add_all_with(histogram, mode)
                .map_err(|e| Error::Incompatible {
                    name: name.clone(),
                    source: Box::new(e),
                })?;
        }

        Ok(())
    }

    /// Renders every histogram, each followed by a blank line.
    pub fn render(&self) -> String {
        self.histograms
            .values()
            .map(|h| h.graph(""))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes the rendered graphs to `out`, returning the number of bytes
    /// written.
    pub fn write_to<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<usize> {
        let rendered = self.render();
        out.write_all(rendered.as_bytes())?;
        Ok(rendered.len())
    }
}

impl core::fmt::Display for HistogramSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.render())
    }
}

impl<'a> IntoIterator for &'a HistogramSet {
    type Item = (&'a String, &'a Histogram);
    type IntoIter = btree_map::Iter<'a, String, Histogram>;

    fn into_iter(self) -> Self::IntoIter {
        self.histograms.iter()
    }
}

impl FromIterator<(String, Histogram)> for HistogramSet {
    fn from_iter<I: IntoIterator<Item = (String, Histogram)>>(iter: I) -> Self {
        Self {
            histograms: iter.into_iter().collect(),
        }
    }
}
