//! Device-accelerated matrix multiplication engine.
//!
//! The engine owns every device-resident resource the accelerated path
//! needs: the four problem buffers, the compute pipeline, and the bind
//! group wiring buffers to kernel slots. Construction performs the whole
//! setup sequence in order (allocate, upload, pipeline, bind group), so no
//! partially constructed engine is ever observable.
//!
//! ## Binding model
//! The kernel declares exactly three storage buffers:
//!
//! * binding 0 — left operand (read-only)
//! * binding 1 — right operand (read-only)
//! * binding 2 — output (read-write)
//!
//! The layout is declared explicitly rather than reflected from the kernel,
//! so a kernel whose bindings diverge from this contract fails at pipeline
//! creation instead of at dispatch.
//!
//! ## Lifecycle
//! Bind groups reference concrete buffer instances, not sizes. Running a
//! different problem size therefore requires tearing the engine down and
//! constructing a new one; there is no in-place resize.

use crate::error::{GpuError, GpuResult};
use crate::gpu::context::ComputeContext;
use crate::gpu::map_buffer_blocking;
use crate::gpu::shader::{dispatch_grid, ENTRY_POINT};
use crate::gpu::timing::TimingProbe;
use crate::problem::Problem;

/// Bytes per matrix element.
const FLOAT32_BYTES: u64 = 4;

/// The four device allocations backing one problem.
///
/// Input buffers are written once at engine construction; the output
/// buffer is the dispatch write target and cannot itself be mapped, so a
/// dedicated MAP_READ staging buffer receives a copy for host readback.
#[derive(Debug)]
struct DeviceBufferSet {
    lhs: wgpu::Buffer,
    rhs: wgpu::Buffer,
    output: wgpu::Buffer,
    staging: wgpu::Buffer,
    byte_len: u64,
}

impl DeviceBufferSet {
    fn allocate(context: &ComputeContext, problem: &Problem) -> Self {
        let byte_len = problem.elements() as u64 * FLOAT32_BYTES;
        let device = &context.device;

        let storage_input = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: byte_len,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        let lhs = storage_input("matmul.lhs");
        let rhs = storage_input("matmul.rhs");

        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("matmul.output"),
            size: byte_len,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("matmul.staging"),
            size: byte_len,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Write-only transfer of both operands; no readback path exists
        // for the input buffers.
        context.queue.write_buffer(&lhs, 0, bytemuck::cast_slice(problem.a()));
        context.queue.write_buffer(&rhs, 0, bytemuck::cast_slice(problem.b()));

        Self { lhs, rhs, output, staging, byte_len }
    }

    fn destroy(&self) {
        self.lhs.destroy();
        self.rhs.destroy();
        self.output.destroy();
        self.staging.destroy();
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    kernel_source: &str,
) -> (wgpu::ComputePipeline, wgpu::BindGroupLayout) {
    let storage_entry = |binding, read_only| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("matmul_bgl"),
        entries: &[
            storage_entry(0, true),
            storage_entry(1, true),
            storage_entry(2, false),
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("matmul_pipeline_layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("matmul_shader"),
        source: wgpu::ShaderSource::Wgsl(kernel_source.into()),
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("matmul_compute_pipeline"),
        layout: Some(&pipeline_layout),
        module: &module,
        entry_point: Some(ENTRY_POINT),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    });

    (pipeline, bind_group_layout)
}

/// Drives the accelerated path end to end for one problem.
///
/// ## Role
/// Uploads the operands at construction, then on every [`calculate`]
/// encodes one dispatch (timed when the device supports it), reads the
/// result back, and returns it as an owned host vector.
///
/// ## Concurrency
/// `calculate` takes `&mut self`, so a second submission against the same
/// engine instance cannot be issued while one is in flight.
///
/// [`calculate`]: ComputeEngine::calculate
#[derive(Debug)]
pub struct ComputeEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: DeviceBufferSet,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    probe: Option<TimingProbe>,
    grid: (u32, u32),
    destroyed: bool,
}

impl ComputeEngine {
    /// Builds the engine for one problem: buffers, operand upload,
    /// pipeline, bind group.
    ///
    /// `kernel_source` is treated as opaque compiled-kernel text; it must
    /// declare the three-buffer binding contract described in the module
    /// docs. When the context lacks timestamp support the engine runs
    /// without a probe and logs a warning instead of failing.
    ///
    /// ## Errors
    /// Rejects a problem whose dimension does not divide into workgroup
    /// tiles before any command is encoded.
    pub fn new(
        context: &ComputeContext,
        kernel_source: &str,
        problem: &Problem,
    ) -> GpuResult<Self> {
        let grid = dispatch_grid(problem.size())?;

        let buffers = DeviceBufferSet::allocate(context, problem);
        let (pipeline, bind_group_layout) = create_pipeline(&context.device, kernel_source);

        let bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("matmul_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.lhs.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.rhs.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.output.as_entire_binding(),
                },
            ],
        });

        let probe = if context.timestamps_supported() {
            Some(TimingProbe::new(&context.device))
        } else {
            log::warn!("running without device timing instrumentation");
            None
        };

        Ok(Self {
            device: context.device.clone(),
            queue: context.queue.clone(),
            buffers,
            pipeline,
            bind_group,
            probe,
            grid,
            destroyed: false,
        })
    }

    /// Dispatches the kernel once and reads the product back to the host.
    ///
    /// Encodes the compute pass (wrapped by the timing probe when one
    /// exists) and the output-to-staging copy as a single submission, then
    /// blocks on the staging map, copies the mapped bytes into an owned
    /// vector, and unmaps. Elapsed device time is logged as a diagnostic
    /// side effect, not returned.
    ///
    /// ## Errors
    /// Fails fast with [`GpuError::EngineDestroyed`] after [`destroy`],
    /// and surfaces map/poll failures from the device.
    ///
    /// [`destroy`]: ComputeEngine::destroy
    pub fn calculate(&mut self) -> GpuResult<Vec<f32>> {
        if self.destroyed {
            return Err(GpuError::EngineDestroyed);
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("matmul_encoder"),
        });

        let (grid_x, grid_y) = self.grid;
        let encode_pass = |encoder: &mut wgpu::CommandEncoder| {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("matmul_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.dispatch_workgroups(grid_x, grid_y, 1);
        };

        match &self.probe {
            Some(probe) => probe.instrument(&mut encoder, encode_pass),
            None => encode_pass(&mut encoder),
        }

        encoder.copy_buffer_to_buffer(
            &self.buffers.output,
            0,
            &self.buffers.staging,
            0,
            self.buffers.byte_len,
        );

        self.queue.submit(Some(encoder.finish()));

        map_buffer_blocking(&self.device, &self.buffers.staging, "result staging")?;

        // Copy out before unmap; the mapped view is invalid afterwards.
        let result = {
            let data = self.buffers.staging.slice(..).get_mapped_range();
            bytemuck::cast_slice::<u8, f32>(&data).to_vec()
        };
        self.buffers.staging.unmap();

        if let Some(probe) = &self.probe {
            match probe.elapsed_micros(&self.device) {
                Ok(micros) => log::info!("device matmul finished in {micros} us"),
                Err(e) => log::warn!("timing readout failed: {e}"),
            }
        }

        Ok(result)
    }

    /// Releases the four device buffers and the timing probe.
    ///
    /// Checked no-op on repeated calls; any `calculate` afterwards fails
    /// fast. Also runs on drop, so teardown happens on all exit paths.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.buffers.destroy();
        if let Some(probe) = &mut self.probe {
            probe.destroy();
        }
        self.destroyed = true;
    }
}

impl Drop for ComputeEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}
