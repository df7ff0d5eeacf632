// blocking.rs - online block averaging for correlated Monte Carlo series

use crate::error::SimError;

/// One completed block-averaging session.
///
/// `mean_err` and `derived_err` are the raw variance of block means,
/// `E[m²] − (E[m])²`, not a standard error. Display code takes the square
/// root where an error bar is wanted.
#[derive(Debug, Clone, Copy)]
pub struct BlockResults {
    pub mean: f64,
    pub mean_err: f64,
    pub derived_mean: f64,
    pub derived_err: f64,
}

/// Streaming block-average estimator.
///
/// Successive sweeps of a single Markov chain are autocorrelated, so a naive
/// sample variance underestimates the true uncertainty. Averaging within
/// fixed-size blocks first decorrelates the stream; statistics over the
/// block means are then meaningful. The same block moments also yield a
/// fluctuation-derived quantity `prefactor * (E[x²] − E[x]²)` per block:
/// heat capacity from the energy series, susceptibility from magnetization.
#[derive(Debug, Clone)]
pub struct BlockEstimator {
    name: String,
    block_size: usize,
    prefactor: f64,

    // within-block state, zeroed each time a block closes
    sum: f64,
    sum_sq: f64,
    samples: usize,

    // cross-block accumulators
    blocks: usize,
    mean_sum: f64,
    mean_sq_sum: f64,
    derived_sum: f64,
    derived_sq_sum: f64,
}

impl BlockEstimator {
    pub fn new(name: &str, block_size: usize, prefactor: f64) -> Result<Self, SimError> {
        if block_size == 0 {
            return Err(SimError::InvalidBlockSize(name.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            block_size,
            prefactor,
            sum: 0.0,
            sum_sq: 0.0,
            samples: 0,
            blocks: 0,
            mean_sum: 0.0,
            mean_sq_sum: 0.0,
            derived_sum: 0.0,
            derived_sq_sum: 0.0,
        })
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Completed blocks since construction or the last `read_results`.
    #[inline(always)]
    pub fn completed_blocks(&self) -> usize {
        self.blocks
    }

    /// Change the scaling applied to the derived quantity. Affects future
    /// blocks only; already-accumulated blocks are not rescaled.
    pub fn update_prefactor(&mut self, prefactor: f64) {
        self.prefactor = prefactor;
    }

    /// Accumulate one sample. When the within-block count reaches the block
    /// size, the block's mean, mean-of-squares and fluctuation value are
    /// folded into the cross-block sums and the within-block state is
    /// zeroed.
    pub fn add_data(&mut self, value: f64) {
        self.sum += value;
        self.sum_sq += value * value;
        self.samples += 1;

        if self.samples == self.block_size {
            let m = self.sum / self.block_size as f64;
            let m2 = self.sum_sq / self.block_size as f64;
            let d = self.prefactor * (m2 - m * m);

            self.blocks += 1;
            self.mean_sum += m;
            self.mean_sq_sum += m * m;
            self.derived_sum += d;
            self.derived_sq_sum += d * d;

            self.samples = 0;
            self.sum = 0.0;
            self.sum_sq = 0.0;
        }
    }

    /// Consume the session: averages over completed blocks plus the variance
    /// of the block means, then every accumulator (including the block
    /// count) is reset. Reading with zero completed blocks is an error, not
    /// a 0/0 row.
    pub fn read_results(&mut self) -> Result<BlockResults, SimError> {
        if self.blocks == 0 {
            return Err(SimError::EmptyEstimator(self.name.clone()));
        }

        let n = self.blocks as f64;
        let mean = self.mean_sum / n;
        let derived_mean = self.derived_sum / n;
        let results = BlockResults {
            mean,
            mean_err: self.mean_sq_sum / n - mean * mean,
            derived_mean,
            derived_err: self.derived_sq_sum / n - derived_mean * derived_mean,
        };

        self.reset();
        Ok(results)
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.samples = 0;
        self.blocks = 0;
        self.mean_sum = 0.0;
        self.mean_sq_sum = 0.0;
        self.derived_sum = 0.0;
        self.derived_sq_sum = 0.0;
    }
}
