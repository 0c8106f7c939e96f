use crate::generator::{Constant, Exponential, Generator, Multiplicative};
use crate::{Bucket, BuildError};
use log::debug;

/// Growth factor substituted when a caller passes one that would not grow.
pub const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

/// The strategy used to generate bucket boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Growth {
    /// Buckets of constant `width` starting at zero.
    Constant { width: u64 },
    /// The first bucket is `[first_width, first_width * factor)` and each
    /// following bucket is `factor` times wider than the previous one.
    ///
    /// A `factor` of exactly `0.0` produces constant-width buckets of
    /// `first_width`, starting at `first_width`. Any other `factor` that is not
    /// greater than `1.0` is replaced by [`DEFAULT_GROWTH_FACTOR`].
    Multiplicative { first_width: u64, factor: f64 },
    /// Bucket `i` is `[floor(base^i), floor(base^(i+1)))`. A `base` that is
    /// not greater than `1.0` is replaced by [`DEFAULT_GROWTH_FACTOR`].
    Exponential { base: f64 },
}

impl Growth {
    fn generator(&self) -> Generator {
        match *self {
            Self::Constant { width } => Generator::Constant(Constant::new(0, width)),
            Self::Multiplicative { first_width, factor } if factor == 0.0 => {
                Generator::Constant(Constant::new(first_width, first_width))
            }
            Self::Multiplicative { first_width, factor } => Generator::Multiplicative(
                Multiplicative::new(first_width, checked_factor(factor)),
            ),
            Self::Exponential { base } => {
                Generator::Exponential(Exponential::new(checked_factor(base)))
            }
        }
    }
}

fn checked_factor(factor: f64) -> f64 {
    // written this way so that NaN also falls back to the default
    if factor > 1.0 {
        factor
    } else {
        debug!("growth factor {factor} does not grow, using {DEFAULT_GROWTH_FACTOR}");
        DEFAULT_GROWTH_FACTOR
    }
}

/// The parameters that determine the histogram bucketing.
///
/// * `buckets` - the number of buckets requested from the generator. Must be
///   at least one. The final histogram may hold up to two more: a floor
///   bucket starting at zero and a sentinel bucket reaching `u64::MAX` are
///   added when the generated buckets do not already cover those values.
/// * `growth` - the strategy that produces the bucket boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    buckets: usize,
    growth: Growth,
}

impl Config {
    pub fn new(buckets: usize, growth: Growth) -> Result<Self, BuildError> {
        if buckets == 0 {
            return Err(BuildError::NoBuckets);
        }

        Ok(Self { buckets, growth })
    }

    /// Returns the number of buckets requested from the generator.
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Generate the complete, validated bucket layout for this config.
    pub(crate) fn layout(&self) -> Result<Box<[Bucket]>, BuildError> {
        let mut bounds: Vec<(u64, u64)> = Vec::with_capacity(self.buckets + 2);

        let mut generator = self.growth.generator();
        for _ in 0..self.buckets {
            let Some((start, end)) = generator.next() else {
                break;
            };
            bounds.push((start, end));
            // a saturated generator only repeats (MAX, MAX) from here on
            if end == u64::MAX {
                break;
            }
        }

        if let Some(&(first, _)) = bounds.first() {
            if first > 0 {
                bounds.insert(0, (0, first));
            }
        }

        if let Some(&(_, last)) = bounds.last() {
            if last < u64::MAX {
                bounds.push((last, u64::MAX));
            }
        }

        verify(&bounds)?;

        Ok(bounds
            .into_iter()
            .map(|(start, end)| Bucket::new(start, end))
            .collect())
    }
}

/// Checks that the bounds are sorted with no gaps or overlaps and that they
/// span the whole `u64` domain.
fn verify(bounds: &[(u64, u64)]) -> Result<(), BuildError> {
    if bounds.is_empty() {
        return Err(BuildError::NoBuckets);
    }

    let mut prev = 0;
    for (index, &(start, end)) in bounds.iter().enumerate() {
        if start != prev || end < start {
            return Err(BuildError::Discontiguous { index });
        }
        prev = end;
    }

    if prev != u64::MAX {
        return Err(BuildError::Uncovered);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(config: Config) -> Vec<(u64, u64)> {
        config
            .layout()
            .unwrap()
            .iter()
            .map(|b| (b.start(), b.end()))
            .collect()
    }

    #[test]
    fn no_buckets() {
        assert_eq!(
            Config::new(0, Growth::Constant { width: 1 }),
            Err(BuildError::NoBuckets)
        );
    }

    #[test]
    // floor and ceiling buckets are added around the generated ones
    fn multiplicative() {
        let config = Config::new(
            5,
            Growth::Multiplicative {
                first_width: 10,
                factor: 2.0,
            },
        )
        .unwrap();

        assert_eq!(
            bounds(config),
            vec![
                (0, 10),
                (10, 20),
                (20, 40),
                (40, 80),
                (80, 160),
                (160, 320),
                (320, u64::MAX)
            ]
        );
    }

    #[test]
    fn multiplicative_constant() {
        let config = Config::new(
            5,
            Growth::Multiplicative {
                first_width: 10,
                factor: 0.0,
            },
        )
        .unwrap();

        assert_eq!(
            bounds(config),
            vec![
                (0, 10),
                (10, 20),
                (20, 30),
                (30, 40),
                (40, 50),
                (50, 60),
                (60, u64::MAX)
            ]
        );
    }

    #[test]
    // factors that would not grow fall back to 2.0
    fn default_factor() {
        let expected = bounds(
            Config::new(
                3,
                Growth::Multiplicative {
                    first_width: 5,
                    factor: 2.0,
                },
            )
            .unwrap(),
        );

        for factor in [1.0, 0.5, -3.0, f64::NAN] {
            let config = Config::new(
                3,
                Growth::Multiplicative {
                    first_width: 5,
                    factor,
                },
            )
            .unwrap();
            assert_eq!(bounds(config), expected);
        }

        let expected = bounds(Config::new(4, Growth::Exponential { base: 2.0 }).unwrap());
        for base in [1.0, 0.0, -2.0] {
            let config = Config::new(4, Growth::Exponential { base }).unwrap();
            assert_eq!(bounds(config), expected);
        }
    }

    #[test]
    // constant growth starts at zero so no floor bucket is needed
    fn constant() {
        let config = Config::new(3, Growth::Constant { width: 100 }).unwrap();
        assert_eq!(
            bounds(config),
            vec![(0, 100), (100, 200), (200, 300), (300, u64::MAX)]
        );
    }

    #[test]
    fn exponential() {
        let config = Config::new(5, Growth::Exponential { base: 2.0 }).unwrap();
        assert_eq!(
            bounds(config),
            vec![
                (0, 1),
                (1, 2),
                (2, 4),
                (4, 8),
                (8, 16),
                (16, 32),
                (32, u64::MAX)
            ]
        );
    }

    #[test]
    // a generator that reaches u64::MAX ends the layout with a single
    // sentinel bucket and no ceiling bucket
    fn saturated() {
        let config = Config::new(70, Growth::Exponential { base: 2.0 }).unwrap();
        let bounds = bounds(config);
        assert_eq!(bounds.len(), 65);
        assert_eq!(bounds[0], (0, 1));
        assert_eq!(bounds[64], (1 << 63, u64::MAX));
        assert_eq!(bounds.iter().filter(|(_, end)| *end == u64::MAX).count(), 1);

        let config = Config::new(
            10,
            Growth::Multiplicative {
                first_width: 1 << 62,
                factor: 4.0,
            },
        )
        .unwrap();
        assert_eq!(self::bounds(config), vec![(0, 1 << 62), (1 << 62, u64::MAX)]);
    }

    #[test]
    fn verify_rejects() {
        assert_eq!(verify(&[]), Err(BuildError::NoBuckets));
        assert_eq!(
            verify(&[(0, 10), (11, u64::MAX)]),
            Err(BuildError::Discontiguous { index: 1 })
        );
        assert_eq!(
            verify(&[(1, 10), (10, u64::MAX)]),
            Err(BuildError::Discontiguous { index: 0 })
        );
        assert_eq!(verify(&[(0, 10), (10, 20)]), Err(BuildError::Uncovered));
        assert_eq!(verify(&[(0, u64::MAX)]), Ok(()));
    }
}
