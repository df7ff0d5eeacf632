pub mod blocking;
pub mod error;
pub mod error_analysis;
pub mod exact;
pub mod lattice;
pub mod metropolis;
pub mod observables;
pub mod rng;
