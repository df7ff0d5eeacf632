// lattice.rs - spin grid with incrementally tracked energy and magnetization

use rand::Rng;

use crate::error::SimError;

/// Nearest-neighbour coupling strength.
pub const J: f64 = 1.0;

/// A rectangular grid of ±1 spins on a torus.
///
/// `energy` and `magnetization` are kept as integer counters (units of J)
/// alongside the grid. They must equal the from-scratch sums at all times:
/// the constructor computes them once, and every later grid mutation is
/// paired with an exact incremental update by the caller that performed it.
#[derive(Debug, Clone)]
pub struct SpinLattice {
    rows: usize,
    cols: usize,
    spins: Vec<i8>,
    energy: i64,
    magnetization: i64,
}

impl SpinLattice {
    /// Build a lattice with each site independently ±1, using a
    /// caller-supplied RNG. The only O(N) counter computation happens here.
    pub fn random_with(rng: &mut impl Rng, rows: usize, cols: usize) -> Result<Self, SimError> {
        if rows == 0 || cols == 0 {
            return Err(SimError::InvalidDimensions { rows, cols });
        }

        let mut spins = vec![0i8; rows * cols];
        for s in &mut spins {
            *s = if rng.gen_bool(0.5) { 1 } else { -1 };
        }

        let mut lattice = Self {
            rows,
            cols,
            spins,
            energy: 0,
            magnetization: 0,
        };
        lattice.energy = lattice.recompute_energy();
        lattice.magnetization = lattice.recompute_magnetization();
        Ok(lattice)
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of sites.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    #[inline(always)]
    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// Spin at `(r, c)`. Indices must be in range; wrapping is the business
    /// of `neighbor_sum`.
    #[inline(always)]
    pub fn spin(&self, r: usize, c: usize) -> i8 {
        self.spins[self.idx(r, c)]
    }

    /// Sum of the four periodic neighbours of `(r, c)`: index −1 wraps to
    /// `dim − 1` and index `dim` wraps to 0.
    #[inline]
    pub fn neighbor_sum(&self, r: usize, c: usize) -> i32 {
        let up = if r == 0 { self.rows - 1 } else { r - 1 };
        let down = if r + 1 == self.rows { 0 } else { r + 1 };
        let left = if c == 0 { self.cols - 1 } else { c - 1 };
        let right = if c + 1 == self.cols { 0 } else { c + 1 };

        self.spin(up, c) as i32
            + self.spin(down, c) as i32
            + self.spin(r, left) as i32
            + self.spin(r, right) as i32
    }

    /// Negate the spin at `(r, c)` and return the new value.
    ///
    /// No bookkeeping happens here: only the caller knows the pre-flip
    /// neighbour sum, so the paired counter update is its responsibility.
    #[inline]
    pub fn flip(&mut self, r: usize, c: usize) -> i8 {
        let idx = self.idx(r, c);
        self.spins[idx] = -self.spins[idx];
        self.spins[idx]
    }

    #[inline(always)]
    pub(crate) fn add_energy(&mut self, delta: i64) {
        self.energy += delta;
    }

    #[inline(always)]
    pub(crate) fn add_magnetization(&mut self, delta: i64) {
        self.magnetization += delta;
    }

    /// Tracked total energy in units of J.
    #[inline(always)]
    pub fn energy(&self) -> i64 {
        self.energy
    }

    /// Tracked total magnetization (plain sum of spins).
    #[inline(always)]
    pub fn magnetization(&self) -> i64 {
        self.magnetization
    }

    /// Energy per site, `J * energy / (rows * cols)`.
    pub fn energy_per_site(&self) -> f64 {
        J * self.energy as f64 / self.len() as f64
    }

    /// Magnetization per site.
    pub fn magnetization_per_site(&self) -> f64 {
        self.magnetization as f64 / self.len() as f64
    }

    /// O(N) recount of the total energy, with the factor 1/2 correcting the
    /// double counting of each bond. Diagnostic only; the engine never calls
    /// this after construction.
    pub fn recompute_energy(&self) -> i64 {
        let mut sum = 0i64;
        for r in 0..self.rows {
            for c in 0..self.cols {
                sum -= self.spin(r, c) as i64 * self.neighbor_sum(r, c) as i64;
            }
        }
        sum / 2
    }

    /// O(N) recount of the total magnetization. Diagnostic only.
    pub fn recompute_magnetization(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }
}

/// Plain-text dump of a configuration, `#` for spin up and `0` for down.
/// Read-only replacement for an output operator; handy when eyeballing
/// domain structure at low temperature.
pub fn render(lattice: &SpinLattice) -> String {
    let mut out = String::with_capacity(lattice.len() + lattice.rows());
    for r in 0..lattice.rows() {
        for c in 0..lattice.cols() {
            out.push(if lattice.spin(r, c) == 1 { '#' } else { '0' });
        }
        out.push('\n');
    }
    out
}
