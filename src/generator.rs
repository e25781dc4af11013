use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::{NoiseLevels, SeedValues};
use crate::error::{BreathError, Result};
use crate::sample::Sample;

/// Per-channel random walk steps
pub trait NoiseSource: Send + 'static {
    /// Returns (acetone, error, co2) perturbations
    fn draw(&mut self) -> (f64, f64, f64);
}

/// Independent zero-mean Gaussian steps
#[derive(Debug)]
pub struct GaussianNoise {
    rng: StdRng,
    acetone: Normal<f64>,
    error: Normal<f64>,
    co2: Normal<f64>,
}

impl GaussianNoise {
    pub fn new(levels: NoiseLevels, seed: Option<u64>) -> Result<Self> {
        let normal = |channel: &'static str, std_dev: f64| {
            Normal::new(0.0, std_dev).map_err(|source| BreathError::InvalidNoise { channel, source })
        };
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            rng,
            acetone: normal("acetone", levels.acetone)?,
            error: normal("error", levels.error)?,
            co2: normal("co2", levels.co2)?,
        })
    }
}

impl NoiseSource for GaussianNoise {
    fn draw(&mut self) -> (f64, f64, f64) {
        (
            self.acetone.sample(&mut self.rng),
            self.error.sample(&mut self.rng),
            self.co2.sample(&mut self.rng),
        )
    }
}

/// A noise source that never moves, for deterministic runs
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn draw(&mut self) -> (f64, f64, f64) {
        (0.0, 0.0, 0.0)
    }
}

pub struct SampleGenerator<N: NoiseSource> {
    seed: SeedValues,
    noise: N,
}

impl<N: NoiseSource> SampleGenerator<N> {
    pub fn new(seed: SeedValues, noise: N) -> Self {
        Self { seed, noise }
    }

    /// Next reading of the random walk. Values are not clamped and may
    /// drift negative over a long run.
    pub fn generate_next(&mut self, previous: Option<&Sample>, elapsed_secs: f64) -> Sample {
        match previous {
            None => Sample::new(0.0, self.seed.acetone, self.seed.error, self.seed.co2),
            Some(prev) => {
                let (d_acetone, d_error, d_co2) = self.noise.draw();
                Sample::new(
                    round_centis(elapsed_secs),
                    prev.acetone + d_acetone,
                    prev.error + d_error,
                    prev.co2 + d_co2,
                )
            }
        }
    }
}

fn round_centis(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
