//! ASCII bar-graph rendering of a histogram.
//!
//! The layout of each line is relied upon by log scrapers, so changes here
//! must keep the output byte-for-byte stable.

use crate::Bucket;
use core::fmt::Write;

/// The glyph used to draw bars.
pub const BAR_GLYPH: char = '#';

/// The length of the bar drawn for the most populated bucket.
pub const BAR_WIDTH: u64 = 30;

/// The layout used when rendering a histogram.
///
/// With `Cumulative`, each line shows the bucket's share and the running
/// share, followed by the bar and the raw count:
///
/// ```text
/// Latency (48 Total)
/// [0 - 10]        4.17%    4.17% ### (2)
/// [10 - 20]      41.67%   45.83% ############################## (20)
/// [1280 - inf]   20.83%  100.00% ############### (10)
/// ```
///
/// With `Legacy`, the raw count comes before the share and there is no
/// running share:
///
/// ```text
/// Latency (10000 Total)
/// [0 - 1]       2000   20.00% ###############
/// [2 - 4]       4000   40.00% ##############################
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Cumulative,
    Legacy,
}

fn label(bucket: &Bucket) -> String {
    if bucket.is_sentinel() {
        format!("{} - inf", bucket.start())
    } else {
        format!("{} - {}", bucket.start(), bucket.end())
    }
}

fn share(count: u64, total: u64) -> f64 {
    100.0 * (count as f64 / total as f64)
}

fn bar(count: u64, max: u64) -> String {
    let len = (BAR_WIDTH as u128 * count as u128 / max as u128) as usize;
    BAR_GLYPH.to_string().repeat(len)
}

/// Render the graph for a set of buckets. The caller is responsible for
/// holding whatever lock keeps the counts consistent.
pub(crate) fn render(
    name: &str,
    buckets: &[Bucket],
    format: Format,
    prefix: &str,
    out: &mut String,
) -> core::fmt::Result {
    let counts: Vec<u64> = buckets.iter().map(|b| b.count()).collect();
    let total = counts.iter().fold(0u64, |acc, c| acc.wrapping_add(*c));
    let max = counts.iter().copied().max().unwrap_or(0);

    let labels: Vec<String> = buckets.iter().map(label).collect();
    let longest = labels
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    writeln!(out, "{name} ({total} Total)")?;

    let mut cumulative = 0u64;
    for (label, &count) in labels.iter().zip(&counts) {
        if count == 0 {
            continue;
        }
        cumulative = cumulative.wrapping_add(count);

        let padding = " ".repeat(longest - label.len());
        let bar = bar(count, max);

        match format {
            Format::Cumulative => writeln!(
                out,
                "{prefix}[{label}]{padding}{:8.2}%{:8.2}% {bar} ({count})",
                share(count, total),
                share(cumulative, total),
            )?,
            Format::Legacy => writeln!(
                out,
                "{prefix}[{label}] {padding}{count:10} {:7.2}% {bar}",
                share(count, total),
            )?,
        }
    }

    Ok(())
}
