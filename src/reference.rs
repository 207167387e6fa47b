//! Host-side reference matrix multiplication.
//!
//! The reference engine computes the ground-truth product on the CPU. Its
//! output is what the device result is validated against, so it favors a
//! simple, obviously-correct formulation over blocking or vectorization.
//!
//! ## Loop ordering
//! The loops run in i,k,j order rather than the textbook i,j,k. With
//! row-major storage the innermost j loop then walks one row of `b` and one
//! row of the output sequentially, which measures meaningfully faster than
//! the column-strided access pattern of the i,j,k form. This ordering is a
//! deliberate choice, not incidental.

use crate::problem::Problem;

/// CPU matrix-product engine with a reusable output buffer.
///
/// ## Role
/// Produces the ground-truth result for a [`Problem`]. The output buffer is
/// allocated once and zeroed at the start of every [`calculate`] call, so
/// the engine is idempotent and reusable across repeated invocations on the
/// same problem.
///
/// [`calculate`]: ReferenceEngine::calculate
#[derive(Debug)]
pub struct ReferenceEngine {
    output: Vec<f32>,
}

impl ReferenceEngine {
    /// Creates an engine sized for the given problem.
    pub fn new(problem: &Problem) -> Self {
        Self {
            output: vec![0.0; problem.elements()],
        }
    }

    /// Computes `C[i,j] = sum_k A[i,k] * B[k,j]` over the whole problem.
    ///
    /// Pure in its inputs: calling this twice on the same problem yields
    /// bitwise-identical output both times. Returns a view of the engine's
    /// internal output buffer, valid until the next call.
    pub fn calculate(&mut self, problem: &Problem) -> &[f32] {
        let n = problem.size();
        debug_assert_eq!(self.output.len(), problem.elements());

        self.output.fill(0.0);
        let a = problem.a();
        let b = problem.b();

        for i in 0..n {
            for k in 0..n {
                let aik = a[i * n + k];
                let b_row = &b[k * n..(k + 1) * n];
                let c_row = &mut self.output[i * n..(i + 1) * n];
                for (c, &bkj) in c_row.iter_mut().zip(b_row) {
                    *c += aik * bkj;
                }
            }
        }

        &self.output
    }
}
