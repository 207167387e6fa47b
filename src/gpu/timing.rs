//! Device-side execution timing via timestamp queries.
//!
//! A [`TimingProbe`] brackets a unit of encoded device work with two
//! timestamp writes recorded in the **same command sequence** as the work
//! itself. Recording the timestamps in a separate submission would fold
//! queue latency into the measurement, so the probe exposes an
//! encoder-level wrapping API rather than a start/stop pair.
//!
//! ## Readout protocol
//! After submission the two raw samples are resolved from the query set
//! into a resolve buffer, copied into a host-mappable read buffer, and
//! interpreted on the host as monotonically increasing device-clock ticks
//! at nanosecond granularity. Elapsed time is `(end - start) / 1000`
//! microseconds.
//!
//! The probe's buffers are allocated once and reused across measurements;
//! nothing is reallocated per call.

use crate::error::{GpuError, GpuResult};
use crate::gpu::map_buffer_blocking;

/// Two 8-byte timestamp slots.
const TIMESTAMP_BYTES: u64 = 8 * 2;

/// Reusable two-timestamp measurement span.
///
/// ## Lifecycle
/// Created once per engine (when the device supports timestamp queries),
/// reused for every dispatch, and released either by [`destroy`] or on
/// drop. [`destroy`] is a checked no-op the second time; a readout after
/// destruction fails fast with [`GpuError::ProbeDestroyed`].
///
/// [`destroy`]: TimingProbe::destroy
#[derive(Debug)]
pub struct TimingProbe {
    query_set: wgpu::QuerySet,
    resolve_buffer: wgpu::Buffer,
    read_buffer: wgpu::Buffer,
    destroyed: bool,
}

impl TimingProbe {
    /// Allocates the query set and its resolve/read buffers.
    ///
    /// The device must have been created with `TIMESTAMP_QUERY` and
    /// `TIMESTAMP_QUERY_INSIDE_ENCODERS`; the engine only constructs a
    /// probe when the context reports support.
    pub fn new(device: &wgpu::Device) -> Self {
        let query_set = device.create_query_set(&wgpu::QuerySetDescriptor {
            label: Some("timing_probe.query_set"),
            ty: wgpu::QueryType::Timestamp,
            count: 2,
        });

        let resolve_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("timing_probe.resolve"),
            size: TIMESTAMP_BYTES,
            usage: wgpu::BufferUsages::QUERY_RESOLVE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let read_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("timing_probe.read"),
            size: TIMESTAMP_BYTES,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            query_set,
            resolve_buffer,
            read_buffer,
            destroyed: false,
        }
    }

    /// Encodes `work` bracketed by the probe's two timestamps.
    ///
    /// Writes timestamp 0, encodes the wrapped work, writes timestamp 1,
    /// then resolves the query set and stages the samples for host read.
    /// Everything lands in the caller's encoder, so the measurement and
    /// the measured work submit as one atomic unit.
    pub fn instrument(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        work: impl FnOnce(&mut wgpu::CommandEncoder),
    ) {
        debug_assert!(!self.destroyed, "instrument called on destroyed probe");

        encoder.write_timestamp(&self.query_set, 0);
        work(encoder);
        encoder.write_timestamp(&self.query_set, 1);

        encoder.resolve_query_set(&self.query_set, 0..2, &self.resolve_buffer, 0);
        encoder.copy_buffer_to_buffer(&self.resolve_buffer, 0, &self.read_buffer, 0, TIMESTAMP_BYTES);
    }

    /// Maps the staged samples and returns the elapsed microseconds.
    ///
    /// Blocks until the device signals map completion; valid only after
    /// the instrumented submission has been made. The mapped bytes are
    /// copied out before unmapping.
    ///
    /// ## Errors
    /// Fails fast with [`GpuError::ProbeDestroyed`] after [`destroy`],
    /// and surfaces map/poll failures from the device.
    ///
    /// [`destroy`]: TimingProbe::destroy
    pub fn elapsed_micros(&self, device: &wgpu::Device) -> GpuResult<u64> {
        if self.destroyed {
            return Err(GpuError::ProbeDestroyed);
        }

        map_buffer_blocking(device, &self.read_buffer, "timestamp read")?;

        let elapsed = {
            let data = self.read_buffer.slice(..).get_mapped_range();
            let ticks: &[u64] = bytemuck::cast_slice(&data);
            ticks[1].saturating_sub(ticks[0]) / 1_000
        };
        self.read_buffer.unmap();

        Ok(elapsed)
    }

    /// Releases the probe's buffers. Checked no-op on repeated calls.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.resolve_buffer.destroy();
        self.read_buffer.destroy();
        self.destroyed = true;
    }
}

impl Drop for TimingProbe {
    fn drop(&mut self) {
        self.destroy();
    }
}
