//! Inclusive numeric ranges for randomized visual parameters

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A `[min, max]` range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A span that always yields `value`
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Symmetric span `[-radius, radius]`
    pub const fn around_zero(radius: f32) -> Self {
        Self {
            min: -radius,
            max: radius,
        }
    }

    /// Draw a value; degenerate or inverted spans yield `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_fixed_span() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(Span::fixed(1.2).sample(&mut rng), 1.2);
        assert_eq!(Span::new(5.0, 1.0).sample(&mut rng), 5.0);
    }

    proptest! {
        #[test]
        fn prop_samples_stay_in_bounds(seed in any::<u64>(), min in -500.0f32..500.0, width in 0.0f32..500.0) {
            let span = Span::new(min, min + width);
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..32 {
                let v = span.sample(&mut rng);
                prop_assert!(span.contains(v), "{} outside {:?}", v, span);
            }
        }
    }
}
