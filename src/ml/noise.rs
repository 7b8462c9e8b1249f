use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Source of zero-mean Gaussian perturbations for synthesized features.
pub trait NoiseSource {
    /// Draws one sample from `N(0, std_dev^2)`.
    fn gaussian(&mut self, std_dev: f64) -> f64;
}

/// Noise drawn from a pseudo-random generator.
///
/// [`GaussianNoise::seeded`] reproduces the same sequence on every run;
/// [`GaussianNoise::from_entropy`] deliberately does not.
#[derive(Debug, Clone)]
pub struct GaussianNoise<R = StdRng> {
    rng: R,
}

impl GaussianNoise<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy-backed otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }
}

impl<R: Rng> GaussianNoise<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        match Normal::new(0.0, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            // Negative or NaN spread: no perturbation.
            Err(_) => 0.0,
        }
    }
}

/// Noise source that never perturbs. Useful for exact expectations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn gaussian(&mut self, _std_dev: f64) -> f64 {
        0.0
    }
}

/// Replays a fixed sequence of samples, then zeros.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNoise {
    samples: std::collections::VecDeque<f64>,
}

impl ScriptedNoise {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

impl NoiseSource for ScriptedNoise {
    fn gaussian(&mut self, _std_dev: f64) -> f64 {
        self.samples.pop_front().unwrap_or(0.0)
    }
}
