//! Kernel source rendering and dispatch sizing.
//!
//! The compute kernel is a tiled WGSL matrix multiply with a fixed 16x16
//! workgroup tile. The matrix dimension is baked into the module as a WGSL
//! `const` at render time, which keeps the bind group at exactly three
//! storage buffers (no dimension uniform) and lets the compiler treat the
//! tile loop bound as a constant.
//!
//! The engine itself accepts kernel text as an opaque `&str`, so callers
//! may substitute their own kernel as long as it declares the same three
//! bindings and entry point.

use crate::error::TileAlignmentError;
use crate::problem::{validate_size, TILE_DIM};

/// Kernel entry point expected by the engine.
pub const ENTRY_POINT: &str = "main";

const TEMPLATE: &str = include_str!("matmul.wgsl");

/// Renders the built-in tiled matmul kernel for a matrix dimension.
///
/// ## Errors
/// Rejects a dimension that is zero or not a multiple of the workgroup
/// tile; rendering a kernel that could never be dispatched is refused at
/// the same boundary as dispatch itself.
pub fn matmul_shader(size: usize) -> Result<String, TileAlignmentError> {
    validate_size(size)?;
    Ok(format!(
        "const MATRIX_SIZE: u32 = {size}u;\nconst TILE_DIM: u32 = {TILE_DIM}u;\n\n{TEMPLATE}"
    ))
}

/// Computes the 2-D workgroup grid for a matrix dimension.
///
/// Each workgroup covers one 16x16 output tile, so the grid is exactly
/// `(N / 16, N / 16)`. A dimension that would yield a fractional count is
/// rejected here, before any command is encoded.
pub fn dispatch_grid(size: usize) -> Result<(u32, u32), TileAlignmentError> {
    validate_size(size)?;
    let per_axis = (size / TILE_DIM) as u32;
    Ok((per_axis, per_axis))
}
