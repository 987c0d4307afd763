use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Source of the draws a path consumes. Every worker owns its own instance.
pub trait RandomNumberGenerator {
    /// Uniform draw on `[0, 1)`.
    fn gen_uniform(&mut self) -> f64;

    /// Standard normal draw.
    fn gen_normal(&mut self) -> f64;
}

/// Creates one generator per worker. Distinct workers must receive
/// independent streams.
pub trait RngFactory: Sync {
    type Rng: RandomNumberGenerator;

    fn create(&self, worker: usize) -> Self::Rng;

    /// Seeded factory to use for a single simulation in place of `self`.
    /// Factories without a fixed seed return one drawn for that run.
    fn seeded_for_run(&self) -> Option<SeededRngFactory> {
        None
    }
}

/// `StdRng` backed generator, normals sampled through `rand_distr`.
pub struct StdRandomNumbers {
    rng: StdRng,
}

impl StdRandomNumbers {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomNumberGenerator for StdRandomNumbers {
    #[inline]
    fn gen_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    #[inline]
    fn gen_normal(&mut self) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal)
    }
}

/// Seeds worker `w` with `base_seed + w`, so a fixed base seed and worker
/// count reproduce a run exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRngFactory {
    base_seed: u64,
}

impl SeededRngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Base seed drawn from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy().gen())
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }
}

impl RngFactory for SeededRngFactory {
    type Rng = StdRandomNumbers;

    fn create(&self, worker: usize) -> StdRandomNumbers {
        StdRandomNumbers::from_seed(self.base_seed.wrapping_add(worker as u64))
    }
}
