//! # Device execution backend
//!
//! This module implements the accelerated half of the benchmark on top of
//! `wgpu` compute.
//!
//! ## High-level execution model
//!
//! One benchmark run on the device proceeds in four explicit stages:
//!
//! 1. **Upload** — both operand matrices are written into device-resident
//!    storage buffers at engine construction.
//! 2. **Dispatch** — one compute pass runs the tiled kernel over an
//!    `N/16 x N/16` workgroup grid, bracketed by the timing probe's
//!    timestamps when the device supports them.
//! 3. **Synchronization** — the single submission is waited on via
//!    `wgpu::PollType::Wait`; the only blocking points are the two
//!    asynchronous host-mapping waits (result buffer, timing buffer).
//! 4. **Readback** — the staged result is mapped, copied into an owned
//!    host vector, and unmapped.
//!
//! Commands encoded into the one command sequence execute in encoded
//! order: the dispatch happens-before the staging copy and the closing
//! timestamp write.
//!
//! ## Module structure
//!
//! * [`context`] — device and queue acquisition, capability detection
//! * [`shader`] — kernel rendering and dispatch sizing
//! * [`engine`] — buffer lifecycle, pipeline, dispatch, readback
//! * [`timing`] — two-timestamp measurement spans
//!
//! ## Safety and correctness
//!
//! * Buffer teardown is explicit and idempotent, with `Drop` as the
//!   backstop on every exit path.
//! * Operations on destroyed resources fail fast instead of corrupting
//!   device state.
//! * Mapped memory is copied out before unmap, never read after.

mod context;
mod engine;
mod shader;
mod timing;

pub use context::ComputeContext;
pub use engine::ComputeEngine;
pub use shader::{dispatch_grid, matmul_shader, ENTRY_POINT};
pub use timing::TimingProbe;

use crate::error::{GpuError, GpuResult};

/// Maps a MAP_READ buffer for host access, blocking until the device
/// signals completion.
///
/// Submission happens-before map completion: callers submit their encoded
/// work first, then this wait is the explicit suspension point after which
/// the mapped memory is valid.
pub(crate) fn map_buffer_blocking(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
    what: &'static str,
) -> GpuResult<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });

    device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| GpuError::PollFailed {
            message: format!("{e}"),
        })?;

    rx.recv()
        .map_err(|_| GpuError::MapFailed {
            what,
            message: "map completion signal lost".into(),
        })?
        .map_err(|e| GpuError::MapFailed {
            what,
            message: format!("{e}"),
        })
}
