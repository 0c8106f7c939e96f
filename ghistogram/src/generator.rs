//! Bucket generators produce the successive `(start, end)` boundary pairs
//! used to lay out a histogram.
//!
//! Each generator is single-use: it is created by the constructor of one
//! histogram, asked for exactly as many pairs as there are requested buckets
//! and then dropped. The sequences are unbounded, so generators are consumed
//! with [`Iterator::take`].
//!
//! Floating point products are truncated toward zero and saturate at
//! `u64::MAX`. Once a sequence saturates it keeps producing empty
//! `(u64::MAX, u64::MAX)` pairs.

/// Constant-width buckets: `[s, s + w)`, `[s + w, s + 2w)`, ...
#[derive(Clone, Debug)]
pub struct Constant {
    next: u64,
    width: u64,
}

impl Constant {
    /// A generator whose first bucket starts at `start`.
    pub fn new(start: u64, width: u64) -> Self {
        Self { next: start, width }
    }
}

impl Iterator for Constant {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        let start = self.next;
        self.next = self.next.saturating_add(self.width);
        Some((start, self.next))
    }
}

/// Multiplicative buckets: the first bucket is `[w, w * f)` and every later
/// bucket ends at its start multiplied by `f`.
#[derive(Clone, Debug)]
pub struct Multiplicative {
    start: u64,
    factor: f64,
    first: bool,
}

impl Multiplicative {
    pub fn new(first_width: u64, factor: f64) -> Self {
        Self {
            start: first_width,
            factor,
            first: true,
        }
    }

    fn scale(&self, value: u64) -> u64 {
        (value as f64 * self.factor) as u64
    }
}

impl Iterator for Multiplicative {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        if self.first {
            self.first = false;
            return Some((self.start, self.scale(self.start)));
        }

        self.start = self.scale(self.start);
        Some((self.start, self.scale(self.start)))
    }
}

/// Power-of-base buckets: bucket `i` is `[floor(b^i), floor(b^(i+1)))`.
#[derive(Clone, Debug)]
pub struct Exponential {
    power: i32,
    base: f64,
}

impl Exponential {
    pub fn new(base: f64) -> Self {
        Self { power: 0, base }
    }
}

impl Iterator for Exponential {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        let start = self.base.powf(self.power as f64) as u64;
        self.power = self.power.saturating_add(1);
        let end = self.base.powf(self.power as f64) as u64;
        Some((start, end))
    }
}

/// One of the generators above, chosen at construction time.
#[derive(Clone, Debug)]
pub enum Generator {
    Constant(Constant),
    Multiplicative(Multiplicative),
    Exponential(Exponential),
}

impl Iterator for Generator {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        match self {
            Self::Constant(g) => g.next(),
            Self::Multiplicative(g) => g.next(),
            Self::Exponential(g) => g.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(generator: impl Iterator<Item = (u64, u64)>, n: usize) -> Vec<(u64, u64)> {
        generator.take(n).collect()
    }

    #[test]
    fn constant() {
        assert_eq!(
            pairs(Constant::new(0, 10), 3),
            vec![(0, 10), (10, 20), (20, 30)]
        );
        assert_eq!(
            pairs(Constant::new(10, 10), 3),
            vec![(10, 20), (20, 30), (30, 40)]
        );
    }

    #[test]
    fn constant_saturates() {
        assert_eq!(
            pairs(Constant::new(u64::MAX - 5, 4), 3),
            vec![
                (u64::MAX - 5, u64::MAX - 1),
                (u64::MAX - 1, u64::MAX),
                (u64::MAX, u64::MAX)
            ]
        );
    }

    #[test]
    fn multiplicative() {
        assert_eq!(
            pairs(Multiplicative::new(10, 2.0), 5),
            vec![(10, 20), (20, 40), (40, 80), (80, 160), (160, 320)]
        );
        assert_eq!(
            pairs(Multiplicative::new(10, 1.5), 5),
            vec![(10, 15), (15, 22), (22, 33), (33, 49), (49, 73)]
        );
        assert_eq!(
            pairs(Multiplicative::new(123, 10.0), 2),
            vec![(123, 1230), (1230, 12300)]
        );
    }

    #[test]
    fn multiplicative_saturates() {
        let pairs = pairs(Multiplicative::new(1 << 62, 4.0), 3);
        assert_eq!(pairs[0], (1 << 62, u64::MAX));
        assert_eq!(pairs[1], (u64::MAX, u64::MAX));
        assert_eq!(pairs[2], (u64::MAX, u64::MAX));
    }

    #[test]
    fn exponential() {
        let mut generator = Exponential::new(1.7);
        assert_eq!(generator.nth(57), Some((13664335558742, 23229370449862)));

        assert_eq!(
            pairs(Exponential::new(2.0), 5),
            vec![(1, 2), (2, 4), (4, 8), (8, 16), (16, 32)]
        );
        assert_eq!(
            pairs(Exponential::new(4.0), 3),
            vec![(1, 4), (4, 16), (16, 64)]
        );
    }

    #[test]
    // every pair starts where the previous one ended
    fn contiguous() {
        let generators = [
            Generator::Constant(Constant::new(0, 7)),
            Generator::Multiplicative(Multiplicative::new(3, 1.7)),
            Generator::Exponential(Exponential::new(3.0)),
        ];

        for generator in generators {
            let pairs = pairs(generator, 100);
            for window in pairs.windows(2) {
                assert_eq!(window[0].1, window[1].0);
                assert!(window[0].0 <= window[0].1);
            }
        }
    }
}
