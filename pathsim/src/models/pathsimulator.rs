//! Parallel Monte Carlo generator of yearly price paths.
//!
//! * Each step applies the exact GBM log increment
//!   **(d − ½v²)·dt + v·√dt·Z** with the year's effective drift *d* and
//!   volatility *v*.
//! * With a positive jump intensity λ a Poisson number of log-normal jumps
//!   *k* is added, summed as one normal draw **N(k·μ<sub>J</sub>, k·σ<sub>J</sub>²)**.
//! * Paths are split into contiguous partitions, one per worker; every worker
//!   owns its generator and writes only its own slice of the output.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::time::Instant;

use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use tracing::{debug, info};

use super::modifierschedule::ModifierSchedule;
use super::partition::{partition, split_by_ranges};
use super::randomnumbers::{RandomNumberGenerator, RngFactory, SeededRngFactory, StdRandomNumbers};
use super::simulationconfig::SimulationConfig;
use super::simulationresult::{SimulationResult, Trajectory};
use crate::utils::errors::Result;

/// One step per year.
pub const DT: f64 = 1.0;

/// Used when no seed is injected: each simulation draws one base seed from
/// OS entropy and worker `w` is seeded with `base + w`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRngFactory;

impl RngFactory for EntropyRngFactory {
    type Rng = StdRandomNumbers;

    fn create(&self, worker: usize) -> StdRandomNumbers {
        SeededRngFactory::from_entropy().create(worker)
    }

    fn seeded_for_run(&self) -> Option<SeededRngFactory> {
        Some(SeededRngFactory::from_entropy())
    }
}

/// # PathSimulator
/// Runs every path of a [`SimulationConfig`] on a dedicated rayon pool and
/// returns the assembled [`SimulationResult`].
///
/// ## Example
/// ```
/// use pathsim::prelude::*;
/// let config = SimulationConfig::new(100.0, 5, 0.05, 0.2, 64);
/// let result = PathSimulator::new().with_seed(42).simulate(&config).unwrap();
/// assert_eq!(result.len(), 64);
/// assert!(result.paths().iter().all(|p| p.len() == 6));
/// ```
#[derive(Debug, Clone)]
pub struct PathSimulator<F: RngFactory = EntropyRngFactory> {
    factory: F,
    workers: usize,
}

impl PathSimulator {
    pub fn new() -> Self {
        Self {
            factory: EntropyRngFactory,
            workers: 0,
        }
    }
}

impl Default for PathSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RngFactory> PathSimulator<F> {
    /// Worker `w` is seeded with `seed + w`.
    pub fn with_seed(self, seed: u64) -> PathSimulator<SeededRngFactory> {
        self.with_rng_factory(SeededRngFactory::new(seed))
    }

    pub fn with_rng_factory<G: RngFactory>(self, factory: G) -> PathSimulator<G> {
        PathSimulator {
            factory,
            workers: self.workers,
        }
    }

    /// Overrides the worker count; `0` uses the available parallelism.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn rng_factory(&self) -> &F {
        &self.factory
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }

    /// Validates `config` and simulates all of its paths. Blocks until every
    /// worker has finished.
    pub fn simulate(&self, config: &SimulationConfig) -> Result<SimulationResult> {
        config.validate()?;

        let n_paths = config.num_paths();
        if n_paths == 0 {
            debug!("no paths requested");
            return Ok(SimulationResult::default());
        }

        let schedule = ModifierSchedule::from_config(config);
        let ranges = partition(n_paths, self.worker_count());

        let pool = ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .thread_name(|i| format!("pathsim-worker-{}", i))
            .build()?;

        info!(
            paths = n_paths,
            years = config.years(),
            workers = ranges.len(),
            jumps = config.has_jumps(),
            "starting simulation"
        );
        let started = Instant::now();

        let mut slots = vec![Trajectory::default(); n_paths];
        let partitions: Vec<_> = ranges
            .iter()
            .cloned()
            .zip(split_by_ranges(&mut slots, &ranges))
            .enumerate()
            .collect();

        match self.factory.seeded_for_run() {
            Some(run_factory) => {
                debug!(base_seed = run_factory.base_seed(), "seeding workers for this run");
                pool.install(|| fill_partitions(&run_factory, config, &schedule, partitions));
            }
            None => pool.install(|| fill_partitions(&self.factory, config, &schedule, partitions)),
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation complete"
        );
        Ok(SimulationResult::new(slots))
    }
}

fn fill_partitions<G: RngFactory>(
    factory: &G,
    config: &SimulationConfig,
    schedule: &ModifierSchedule,
    partitions: Vec<(usize, (Range<usize>, &mut [Trajectory]))>,
) {
    partitions
        .into_par_iter()
        .for_each(|(worker, (range, slots))| {
            debug!(worker, start = range.start, end = range.end, "simulating partition");
            let mut rng = factory.create(worker);
            for slot in slots.iter_mut() {
                *slot = simulate_path(config, schedule, &mut rng);
            }
        });
}

/// Generates a single trajectory of `years + 1` points.
pub fn simulate_path<R: RandomNumberGenerator + ?Sized>(
    config: &SimulationConfig,
    schedule: &ModifierSchedule,
    rng: &mut R,
) -> Trajectory {
    let years = config.years();
    let sqrt_dt = DT.sqrt();
    let jump_threshold = (-config.jump_intensity() * DT).exp();

    let mut values = Vec::with_capacity(years + 1);
    let mut current = config.start_price();
    values.push(current);

    for year in 1..=years {
        let (drift, vol) = schedule.parameters(year);
        let diffusion = (drift - 0.5 * vol * vol) * DT + vol * sqrt_dt * rng.gen_normal();

        let jump = if config.has_jumps() {
            let k = poisson_count(jump_threshold, rng);
            if k > 0 {
                let k = k as f64;
                k * config.jump_mean() + k.sqrt() * config.jump_std_dev() * rng.gen_normal()
            } else {
                0.0
            }
        } else {
            0.0
        };

        current *= (diffusion + jump).exp();
        values.push(current);
    }

    Trajectory::new(values)
}

/// Knuth's multiplication method. `threshold` is `exp(-λ·dt)`.
fn poisson_count<R: RandomNumberGenerator + ?Sized>(threshold: f64, rng: &mut R) -> u32 {
    let mut k = 0u32;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= rng.gen_uniform();
        if p <= threshold {
            return k - 1;
        }
    }
}
