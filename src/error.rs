use thiserror::Error;

/// Failures surfaced to the experiment driver.
///
/// Configuration errors are rejected at construction; the empty-estimator
/// case is a caller precondition (`read_results` before any block closed).
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("lattice dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("estimator '{0}': block size must be positive")]
    InvalidBlockSize(String),

    #[error("temperature must be positive, got {0}")]
    InvalidTemperature(f64),

    #[error("estimator '{0}' has no completed blocks to read")]
    EmptyEstimator(String),
}
