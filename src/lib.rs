//! # matmul-bench
//!
//! Benchmarking engine that compares a host-executed dense matrix
//! multiplication against a device-accelerated (`wgpu` compute)
//! implementation of the same problem, validating correctness via a mean
//! absolute difference metric and measuring device-side latency with
//! timestamp queries.
//!
//! ## Design Goals
//! - Explicit, deterministic resource lifecycles on the device
//! - Construction-ordered setup (no observable partial states)
//! - Graceful degradation when timestamp queries are unavailable
//! - Host and device paths independent until comparison
//!
//! ## Typical flow
//! ```no_run
//! use matmul_bench::{
//!     mean_absolute_difference, matmul_shader, ComputeContext, ComputeEngine,
//!     Problem, ReferenceEngine,
//! };
//!
//! let problem = Problem::random(1024)?;
//!
//! let mut reference = ReferenceEngine::new(&problem);
//! let expected = reference.calculate(&problem).to_vec();
//!
//! let context = ComputeContext::new()?;
//! let kernel = matmul_shader(problem.size())?;
//! let mut engine = ComputeEngine::new(&context, &kernel, &problem)?;
//! let actual = engine.calculate()?;
//!
//! let diff = mean_absolute_difference(Some(&expected[..]), Some(&actual[..]));
//! println!("mean absolute difference: {diff:?}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod compare;
pub mod error;
pub mod gpu;
pub mod problem;
pub mod reference;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use compare::mean_absolute_difference;

pub use error::{GpuError, GpuResult, ProblemError, TileAlignmentError};

pub use gpu::{
    dispatch_grid,
    matmul_shader,
    ComputeContext,
    ComputeEngine,
    TimingProbe,
};

pub use problem::{Problem, TILE_DIM};

pub use reference::ReferenceEngine;
