//! Error types for problem construction and device execution.
//!
//! This module declares focused, composable error types used across the
//! benchmark. Each error carries enough context to make failures actionable
//! while remaining small and cheap to pass around or convert into the
//! aggregate [`GpuError`].
//!
//! ## Goals
//! * **Specificity:** Each error type models a single failure mode (e.g. a
//!   matrix size that does not divide into workgroup tiles, a buffer map
//!   that was rejected by the device).
//! * **Ergonomics:** All errors implement [`std::error::Error`] and
//!   [`fmt::Display`], and provide `From<T>` conversions into [`GpuError`].
//! * **Actionability:** Structured fields (offending size, expected vs.
//!   actual element counts) make logs useful without reproducing the issue.
//!
//! ## Typical flow
//! Problem constructors return [`ProblemError`] directly. Device-path code
//! uses `?` to bubble both shape and device failures into [`GpuError`],
//! which callers can match on for control flow or log with user-readable
//! messages.
//!
//! ## Display vs. Debug
//! * [`fmt::Display`] is optimized for operator logs (short, imperative
//!   phrasing).
//! * [`fmt::Debug`] (derived) retains full structure for diagnostics.

use std::fmt;

/// Result alias for device-path operations.
pub type GpuResult<T> = Result<T, GpuError>;

/// Returned when a requested matrix size cannot be partitioned into the
/// kernel's workgroup tiles.
///
/// The compute kernel processes the output in fixed 16x16 tiles, so the
/// matrix dimension must be a positive multiple of 16. A size violating
/// this would produce a fractional dispatch count and must be rejected
/// before any device interaction.
///
/// ### Fields
/// * `size` — The matrix dimension that was requested.
/// * `tile` — The workgroup tile dimension the size must divide into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAlignmentError {
    /// Offending matrix dimension.
    pub size: usize,

    /// Workgroup tile dimension (16).
    pub tile: usize,
}

impl fmt::Display for TileAlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix size {} is not a positive multiple of the workgroup tile ({})",
            self.size, self.tile
        )
    }
}

impl std::error::Error for TileAlignmentError {}

/// Errors produced while constructing a [`Problem`](crate::Problem).
///
/// These are pure host-side validation failures; no device state is
/// involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemError {
    /// The matrix dimension does not divide into workgroup tiles.
    TileAlignment(TileAlignmentError),

    /// A supplied matrix did not contain `size * size` elements.
    ElementCount {
        /// Element count implied by the matrix dimension.
        expected: usize,

        /// Element count actually supplied.
        actual: usize,
    },
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemError::TileAlignment(e) => write!(f, "{e}"),
            ProblemError::ElementCount { expected, actual } => write!(
                f,
                "matrix element count mismatch: expected {expected}, got {actual}"
            ),
        }
    }
}

impl std::error::Error for ProblemError {}

impl From<TileAlignmentError> for ProblemError {
    fn from(e: TileAlignmentError) -> Self {
        ProblemError::TileAlignment(e)
    }
}

/// Aggregate error for the device execution path.
///
/// ## Variants
/// Capability absence (`InitFailed`) is fatal and reported immediately;
/// there is no retry loop. Lifecycle misuse (`Destroyed`) indicates a
/// programming error and fails fast rather than silently corrupting state.
///
/// ## Propagation
/// Low-level operations return structured variants; orchestration code uses
/// `?` and callers decide whether to rerun the whole benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    /// No compatible adapter or device could be acquired.
    InitFailed {
        /// Human-readable acquisition failure description.
        message: String,
    },

    /// The problem shape cannot be dispatched.
    Shape(ProblemError),

    /// An asynchronous buffer map was rejected or its completion signal
    /// was lost.
    MapFailed {
        /// Which buffer was being mapped (e.g. `"result staging"`).
        what: &'static str,

        /// Underlying device error description.
        message: String,
    },

    /// Blocking on device completion failed.
    PollFailed {
        /// Underlying poll error description.
        message: String,
    },

    /// An operation was attempted on an engine whose resources have been
    /// released.
    EngineDestroyed,

    /// A timing readout was attempted on a destroyed probe.
    ProbeDestroyed,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::InitFailed { message } => {
                write!(f, "gpu initialization failed: {message}")
            }
            GpuError::Shape(e) => write!(f, "{e}"),
            GpuError::MapFailed { what, message } => {
                write!(f, "failed to map {what} buffer: {message}")
            }
            GpuError::PollFailed { message } => {
                write!(f, "device poll failed: {message}")
            }
            GpuError::EngineDestroyed => {
                f.write_str("compute engine has been destroyed")
            }
            GpuError::ProbeDestroyed => {
                f.write_str("timing probe has been destroyed")
            }
        }
    }
}

impl std::error::Error for GpuError {}

impl From<ProblemError> for GpuError {
    fn from(e: ProblemError) -> Self {
        GpuError::Shape(e)
    }
}

impl From<TileAlignmentError> for GpuError {
    fn from(e: TileAlignmentError) -> Self {
        GpuError::Shape(ProblemError::TileAlignment(e))
    }
}
