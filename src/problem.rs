//! Benchmark problem definition and generation.
//!
//! A [`Problem`] is a pair of square `f32` matrices of equal dimension,
//! multiplied once by the host reference path and once by the device path.
//! It is created once per benchmark run and is immutable afterwards; both
//! engines hold it read-only.
//!
//! ## Shape invariant
//! The matrix dimension must be a positive multiple of [`TILE_DIM`] so that
//! the output divides evenly into workgroup tiles. Every constructor
//! enforces this before any buffer is allocated, host or device.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ProblemError, TileAlignmentError};

/// Workgroup tile dimension of the compute kernel (16x16 invocations).
///
/// Matrix dimensions must be positive multiples of this value.
pub const TILE_DIM: usize = 16;

/// Validates that `size` divides evenly into workgroup tiles.
///
/// Returns the offending size in a [`TileAlignmentError`] otherwise. This
/// runs before dispatch construction; a fractional dispatch count is never
/// handed to the device.
pub fn validate_size(size: usize) -> Result<(), TileAlignmentError> {
    if size == 0 || size % TILE_DIM != 0 {
        return Err(TileAlignmentError { size, tile: TILE_DIM });
    }
    Ok(())
}

/// A pair of square input matrices in row-major order.
///
/// ## Invariants
/// * `a.len() == b.len() == size * size`
/// * `size` is a positive multiple of [`TILE_DIM`]
///
/// Both invariants are established at construction and cannot be violated
/// afterwards; the fields are read-only.
#[derive(Debug, Clone)]
pub struct Problem {
    size: usize,
    a: Vec<f32>,
    b: Vec<f32>,
}

impl Problem {
    /// Generates a problem with independent uniform random values in
    /// `[0, 1)`.
    ///
    /// Deterministic only in shape, not values. Tests that need value
    /// determinism should use [`Problem::random_seeded`].
    pub fn random(size: usize) -> Result<Self, ProblemError> {
        Self::random_from(size, &mut rand::thread_rng())
    }

    /// Generates a problem from a fixed seed.
    ///
    /// Two calls with the same `size` and `seed` produce bitwise-identical
    /// matrices.
    pub fn random_seeded(size: usize, seed: u64) -> Result<Self, ProblemError> {
        Self::random_from(size, &mut StdRng::seed_from_u64(seed))
    }

    fn random_from<R: Rng>(size: usize, rng: &mut R) -> Result<Self, ProblemError> {
        validate_size(size)?;
        let elements = size * size;
        let a = (0..elements).map(|_| rng.gen_range(0.0..1.0)).collect();
        let b = (0..elements).map(|_| rng.gen_range(0.0..1.0)).collect();
        Ok(Self { size, a, b })
    }

    /// Builds a problem whose matrices are filled with the given constants.
    ///
    /// Useful for synthetic oracles: all-ones inputs of dimension `N`
    /// produce `N` at every output position.
    pub fn filled(size: usize, a_value: f32, b_value: f32) -> Result<Self, ProblemError> {
        validate_size(size)?;
        let elements = size * size;
        Ok(Self {
            size,
            a: vec![a_value; elements],
            b: vec![b_value; elements],
        })
    }

    /// Builds a problem from explicit row-major matrices.
    ///
    /// ## Errors
    /// Rejects a `size` that violates tile alignment, and either matrix
    /// whose element count is not `size * size`.
    pub fn from_parts(size: usize, a: Vec<f32>, b: Vec<f32>) -> Result<Self, ProblemError> {
        validate_size(size)?;
        let expected = size * size;
        for len in [a.len(), b.len()] {
            if len != expected {
                return Err(ProblemError::ElementCount { expected, actual: len });
            }
        }
        Ok(Self { size, a, b })
    }

    /// Matrix dimension `N`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element count of each matrix (`N * N`).
    #[inline]
    pub fn elements(&self) -> usize {
        self.size * self.size
    }

    /// Left operand, row-major.
    #[inline]
    pub fn a(&self) -> &[f32] {
        &self.a
    }

    /// Right operand, row-major.
    #[inline]
    pub fn b(&self) -> &[f32] {
        &self.b
    }
}
