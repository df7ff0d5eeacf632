//! Invariant checks on the spin-lattice bookkeeping.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use spinscan::error::SimError;
use spinscan::lattice::{render, SpinLattice};
use spinscan::metropolis::MetropolisEngine;

#[test]
fn fresh_lattice_counters_match_recounts() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let lattice = SpinLattice::random_with(&mut rng, 12, 9).unwrap();

    assert_eq!(lattice.energy(), lattice.recompute_energy());
    assert_eq!(lattice.magnetization(), lattice.recompute_magnetization());
}

#[test]
fn counters_stay_exact_across_sweeps() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xDEADBEEF);
    let lattice = SpinLattice::random_with(&mut rng, 10, 10).unwrap();
    let mut engine = MetropolisEngine::new(lattice, 2.4).unwrap();

    for _ in 0..25 {
        engine.sweep(&mut rng);
        let lattice = engine.lattice();
        assert_eq!(lattice.energy(), lattice.recompute_energy());
        assert_eq!(lattice.magnetization(), lattice.recompute_magnetization());
    }
}

#[test]
fn neighbour_sum_wraps_periodically() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let (rows, cols) = (3, 5);
    let lattice = SpinLattice::random_with(&mut rng, rows, cols).unwrap();

    // Row 0 must see row R-1 above it, column 0 must see column C-1.
    for r in 0..rows {
        for c in 0..cols {
            let expect = lattice.spin((r + rows - 1) % rows, c) as i32
                + lattice.spin((r + 1) % rows, c) as i32
                + lattice.spin(r, (c + cols - 1) % cols) as i32
                + lattice.spin(r, (c + 1) % cols) as i32;
            assert_eq!(lattice.neighbor_sum(r, c), expect, "mismatch at ({r}, {c})");
        }
    }
}

#[test]
fn zero_dimensions_are_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let err = SpinLattice::random_with(&mut rng, 0, 4).unwrap_err();
    assert_eq!(err, SimError::InvalidDimensions { rows: 0, cols: 4 });
    assert!(SpinLattice::random_with(&mut rng, 4, 0).is_err());
}

#[test]
fn render_agrees_with_magnetization() {
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let lattice = SpinLattice::random_with(&mut rng, 6, 7).unwrap();
    let text = render(&lattice);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines.iter().all(|l| l.len() == 7));

    let ups = text.chars().filter(|&ch| ch == '#').count() as i64;
    let downs = text.chars().filter(|&ch| ch == '0').count() as i64;
    assert_eq!(ups - downs, lattice.magnetization());
}
