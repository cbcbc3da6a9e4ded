//! Deterministic inputs for the marshal benchmarks.
//!
//! Every generator takes a seed and uses ChaCha8, so a benchmark run sees
//! the same data on every machine and every run.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use marshal_test_utils::OwnedMatrix;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Matrix shapes exercised by the layout benchmarks: square, one long row,
/// one long column.
pub const MATRIX_SHAPES: [(usize, usize); 3] = [(256, 256), (1, 65_536), (65_536, 1)];

/// Array lengths exercised by the array-sum benchmarks.
pub const ARRAY_LENGTHS: [usize; 3] = [16, 1_024, 65_536];

/// `len` doubles uniformly distributed in `[0, 1)`.
pub fn doubles(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| unit_f64(&mut rng)).collect()
}

/// `len` integers covering the full `i32` range, so sums wrap.
pub fn ints(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.next_u32() as i32).collect()
}

/// A `rows x cols` matrix of doubles in `[0, 1)`.
pub fn double_matrix(rows: usize, cols: usize, seed: u64) -> OwnedMatrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    OwnedMatrix::from_fn(rows, cols, |_, _| unit_f64(&mut rng))
}

/// A `rows x cols` matrix of bytes, summed with widening by the fixture.
pub fn byte_matrix(rows: usize, cols: usize, seed: u64) -> OwnedMatrix<i8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    OwnedMatrix::from_fn(rows, cols, |_, _| rng.next_u32() as i8)
}

fn unit_f64(rng: &mut ChaCha8Rng) -> f64 {
    // Top 53 bits: every representable value in [0, 1) at that spacing.
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}
