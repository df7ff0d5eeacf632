// metropolis.rs - single-spin-flip dynamics with cached Boltzmann factors

use rand::Rng;

use crate::error::SimError;
use crate::lattice::{SpinLattice, J};

/// Acceptance factors for the two uphill energy changes a 4-neighbour
/// lattice can produce.
///
/// A flip opposed by neighbour sum `n` costs `dE = 2*J*|n|`, and whenever
/// `dE > 0` the magnitude `|n|` is 2 or 4 (`|n| = 0` always lands in the
/// unconditional-accept branch). Slot `k` holds `exp(-4*J*(k+1)/T)`, so the
/// mapping is `|n| = 2 → slot 0`, `|n| = 4 → slot 1`.
#[derive(Debug, Clone, Copy)]
pub struct BoltzmannCache {
    factors: [f64; 2],
}

impl BoltzmannCache {
    /// Precompute the factors for temperature `t`. `t <= 0` is rejected
    /// here, before any exponential is evaluated; a non-finite factor must
    /// never reach an acceptance comparison.
    pub fn build(t: f64) -> Result<Self, SimError> {
        if t <= 0.0 {
            return Err(SimError::InvalidTemperature(t));
        }
        let d_beta = 4.0 * J / t;
        Ok(Self {
            factors: [(-d_beta).exp(), (-2.0 * d_beta).exp()],
        })
    }

    /// Cached `exp(-dE/T)` for a flip opposed by `nn_sum`. Only magnitudes
    /// 2 and 4 are legal queries; anything else means the caller computed an
    /// impossible neighbour sum.
    #[inline]
    pub fn factor(&self, nn_sum: i32) -> f64 {
        match nn_sum.abs() {
            2 => self.factors[0],
            4 => self.factors[1],
            m => panic!("no Boltzmann factor for neighbour-sum magnitude {m}"),
        }
    }
}

/// Returned by `trial_flip`, allows O(1) bookkeeping in the driver.
#[derive(Debug, Clone, Copy)]
pub struct StepInfo {
    pub accepted: bool,
    pub delta_e: f64,
}

/// Owns the lattice and the factor cache, and drives the Metropolis update
/// rule. The RNG is passed by exclusive reference into every sampling call;
/// drivers own a concrete seeded generator.
pub struct MetropolisEngine {
    lattice: SpinLattice,
    temperature: f64,
    cache: BoltzmannCache,
}

impl MetropolisEngine {
    pub fn new(lattice: SpinLattice, temperature: f64) -> Result<Self, SimError> {
        let cache = BoltzmannCache::build(temperature)?;
        Ok(Self {
            lattice,
            temperature,
            cache,
        })
    }

    /// Store a new temperature and rebuild the factor cache for it.
    pub fn set_temperature(&mut self, t: f64) -> Result<(), SimError> {
        self.cache = BoltzmannCache::build(t)?;
        self.temperature = t;
        Ok(())
    }

    #[inline(always)]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    #[inline(always)]
    pub fn lattice(&self) -> &SpinLattice {
        &self.lattice
    }

    /// One elementary Metropolis update: pick a site uniformly, accept the
    /// flip unconditionally if it does not raise the energy, otherwise with
    /// the cached probability `exp(-dE/T)`. On acceptance both lattice
    /// counters are updated exactly; a rejected trial changes nothing.
    pub fn trial_flip(&mut self, rng: &mut impl Rng) -> StepInfo {
        let r = rng.gen_range(0..self.lattice.rows());
        let c = rng.gen_range(0..self.lattice.cols());

        let nn_sum = self.lattice.neighbor_sum(r, c);
        let s = self.lattice.spin(r, c) as i32;

        // dE = E(flipped) - E(current) = 2 * J * s * nnSum, in units of J
        let de_units = 2 * s * nn_sum;
        let delta_e = J * de_units as f64;

        let accept = delta_e <= 0.0 || rng.gen::<f64>() < self.cache.factor(nn_sum);
        if !accept {
            return StepInfo {
                accepted: false,
                delta_e: 0.0,
            };
        }

        let new_spin = self.lattice.flip(r, c);
        self.lattice.add_energy(de_units as i64);
        self.lattice.add_magnetization(2 * new_spin as i64);

        StepInfo {
            accepted: true,
            delta_e,
        }
    }

    /// One sweep = `rows * cols` independent trials. Sites are drawn with
    /// replacement, so a sweep is not a full-lattice visit.
    pub fn sweep(&mut self, rng: &mut impl Rng) {
        for _ in 0..self.lattice.len() {
            self.trial_flip(rng);
        }
    }

    pub fn energy_per_site(&self) -> f64 {
        self.lattice.energy_per_site()
    }

    pub fn magnetization_per_site(&self) -> f64 {
        self.lattice.magnetization_per_site()
    }
}
