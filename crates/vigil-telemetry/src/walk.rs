//! Bounded random walk

use rand::Rng;
use serde::{Deserialize, Serialize};
use vigil_core::{Error, Result};

/// Noise added to a value on each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// `(rand - 0.5) * amplitude`, centred on zero
    Continuous {
        /// Peak-to-peak noise
        amplitude: f64,
    },
    /// `floor((rand - bias) * amplitude)`, whole-number steps skewed by `bias`
    Discrete {
        /// Values above 0.5 push the walk down more often than up
        bias: f64,
        /// Multiplier applied before flooring
        amplitude: f64,
    },
}

impl Step {
    /// Draw one step
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let r: f64 = rng.gen();
        match *self {
            Step::Continuous { amplitude } => (r - 0.5) * amplitude,
            Step::Discrete { bias, amplitude } => ((r - bias) * amplitude).floor(),
        }
    }

    fn amplitude(&self) -> f64 {
        match *self {
            Step::Continuous { amplitude } | Step::Discrete { amplitude, .. } => amplitude,
        }
    }
}

/// Bounds and noise for a single walked metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkSpec {
    /// Inclusive lower bound
    pub lower: f64,
    /// Inclusive upper bound
    pub upper: f64,
    /// Noise per tick
    pub step: Step,
}

impl WalkSpec {
    /// Walk with zero-centred continuous noise
    pub const fn continuous(lower: f64, upper: f64, amplitude: f64) -> Self {
        Self {
            lower,
            upper,
            step: Step::Continuous { amplitude },
        }
    }

    /// Walk with biased whole-number steps
    pub const fn discrete(lower: f64, upper: f64, bias: f64, amplitude: f64) -> Self {
        Self {
            lower,
            upper,
            step: Step::Discrete { bias, amplitude },
        }
    }

    /// Reject bounds or noise that cannot produce a bounded walk
    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(Error::Config("walk bounds must be finite".to_string()));
        }
        if self.lower > self.upper {
            return Err(Error::Config(format!(
                "walk lower bound {} exceeds upper bound {}",
                self.lower, self.upper
            )));
        }
        let amplitude = self.step.amplitude();
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(Error::Config(format!(
                "walk amplitude must be finite and >= 0 (got {amplitude})"
            )));
        }
        if let Step::Discrete { bias, .. } = self.step {
            if !(0.0..=1.0).contains(&bias) {
                return Err(Error::Config(format!(
                    "walk bias must be within [0, 1] (got {bias})"
                )));
            }
        }
        Ok(())
    }

    /// Pin a value into the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        self.lower.max(self.upper.min(value))
    }

    /// Whether a value lies within the bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// `clamp(prev + step, lower, upper)`
    pub fn next<R: Rng + ?Sized>(&self, prev: f64, rng: &mut R) -> f64 {
        self.clamp(prev + self.step.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clamp() {
        let spec = WalkSpec::continuous(20.0, 100.0, 10.0);
        assert_eq!(spec.clamp(5.0), 20.0);
        assert_eq!(spec.clamp(150.0), 100.0);
        assert_eq!(spec.clamp(42.5), 42.5);
    }

    #[test]
    fn test_discrete_steps_are_whole_numbers() {
        let spec = WalkSpec::discrete(0.0, 10.0, 0.7, 2.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut value = 3.0;
        for _ in 0..200 {
            value = spec.next(value, &mut rng);
            assert_eq!(value.fract(), 0.0);
            assert!(spec.contains(value));
        }
    }

    #[test]
    fn test_discrete_step_range() {
        // floor((r - 0.7) * 2) with r in [0, 1) lands in {-2, -1, 0}
        let step = Step::Discrete {
            bias: 0.7,
            amplitude: 2.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let s = step.sample(&mut rng);
            assert!((-2.0..=0.0).contains(&s), "step {s}");
        }
    }

    #[test]
    fn test_validate() {
        assert!(WalkSpec::continuous(20.0, 100.0, 10.0).validate().is_ok());
        assert!(WalkSpec::continuous(26.0, 26.0, 0.0).validate().is_ok());
        assert!(WalkSpec::continuous(100.0, 20.0, 10.0).validate().is_err());
        assert!(WalkSpec::continuous(0.0, 100.0, -1.0).validate().is_err());
        assert!(WalkSpec::continuous(0.0, f64::INFINITY, 1.0).validate().is_err());
        assert!(WalkSpec::discrete(0.0, 10.0, 1.5, 2.0).validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_walk_stays_in_bounds(
            seed in any::<u64>(),
            lower in 0.0f64..50.0,
            width in 0.0f64..50.0,
            amplitude in 0.0f64..40.0,
            start in -100.0f64..200.0,
            ticks in 1usize..300,
        ) {
            let spec = WalkSpec::continuous(lower, lower + width, amplitude);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut value = spec.clamp(start);
            for _ in 0..ticks {
                value = spec.next(value, &mut rng);
                prop_assert!(spec.contains(value));
            }
        }

        #[test]
        fn prop_discrete_walk_stays_in_bounds(
            seed in any::<u64>(),
            bias in 0.0f64..=1.0,
            ticks in 1usize..300,
        ) {
            let spec = WalkSpec::discrete(20.0, 26.0, bias, 2.0);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut value = 24.0;
            for _ in 0..ticks {
                value = spec.next(value, &mut rng);
                prop_assert!(spec.contains(value));
            }
        }
    }
}
