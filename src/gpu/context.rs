//! GPU device and queue acquisition.
//!
//! The context is the capability every device-path component consumes: a
//! device handle, its queue, and a record of whether timestamp queries are
//! available. Acquisition failure is fatal for the benchmark and reported
//! immediately; optional-feature absence degrades to running without
//! device-side timing.

use crate::error::{GpuError, GpuResult};

/// Features required to instrument dispatches with timestamp queries.
///
/// `TIMESTAMP_QUERY` enables the query set itself; `INSIDE_ENCODERS`
/// permits the probe's timestamp writes directly on the command encoder,
/// bracketing the measured work within one submission.
const TIMING_FEATURES: wgpu::Features = wgpu::Features::TIMESTAMP_QUERY
    .union(wgpu::Features::TIMESTAMP_QUERY_INSIDE_ENCODERS);

/// Owned device handle, queue, and capability record.
///
/// ## Role
/// Acquired once and shared read-only by every engine constructed against
/// it. The context requests timestamp-query features only when the adapter
/// offers them, so device creation never fails on account of timing
/// support.
#[derive(Debug)]
pub struct ComputeContext {
    /// Device handle used for all resource creation and polling.
    pub device: wgpu::Device,

    /// Queue used for uploads and command submission.
    pub queue: wgpu::Queue,

    timestamps_supported: bool,
}

impl ComputeContext {
    /// Acquires a high-performance adapter and device.
    ///
    /// ## Errors
    /// Returns [`GpuError::InitFailed`] when no compatible adapter exists
    /// or device creation is refused. This is a hard failure: without a
    /// device the benchmark cannot run at all, and no retry is attempted.
    pub fn new() -> GpuResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            ..Default::default()
        }))
        .map_err(|e| GpuError::InitFailed {
            message: format!("no compatible adapter: {e}"),
        })?;

        let timestamps_supported = adapter.features().contains(TIMING_FEATURES);
        if !timestamps_supported {
            log::warn!("timestamp queries unsupported; proceeding without device timing");
        }

        let required_features = if timestamps_supported {
            TIMING_FEATURES
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("matmul_bench_device"),
            required_features,
            ..Default::default()
        }))
        .map_err(|e| GpuError::InitFailed {
            message: format!("device creation failed: {e}"),
        })?;

        Ok(Self {
            device,
            queue,
            timestamps_supported,
        })
    }

    /// Whether dispatches on this device can be timestamped.
    #[inline]
    pub fn timestamps_supported(&self) -> bool {
        self.timestamps_supported
    }
}
