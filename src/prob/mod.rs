use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::Distribution;

/// Draw from the standard normal distribution with the Box–Muller transform
///
/// Consumes exactly two uniform draws from `rng`.
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - u keeps the logarithm's argument in (0, 1]
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Magnitude of a goal reward: `mean + std_dev * N(0, 1)`
///
/// A zero standard deviation is deterministic and draws nothing from the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianReward {
    pub mean: f64,
    pub std_dev: f64,
}

impl GaussianReward {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        assert!(std_dev >= 0.0, "Reward standard deviation must be non-negative.");
        Self { mean, std_dev }
    }

    pub fn fixed(mean: f64) -> Self {
        Self { mean, std_dev: 0.0 }
    }

    pub fn is_deterministic(&self) -> bool {
        self.std_dev == 0.0
    }
}

impl Distribution<f64> for GaussianReward {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.is_deterministic() {
            self.mean
        } else {
            self.mean + self.std_dev * box_muller(rng)
        }
    }
}
