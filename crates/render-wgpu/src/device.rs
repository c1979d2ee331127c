use std::num::NonZeroU64;
use std::sync::Arc;

use landscape_gpu::{
    BindingSlot, DepthStencilDescriptor, GpuError, Mesh, MeshData, PipelineDescriptor,
    PixelFormat, RenderDevice, STANDARD_SHADER_INPUTS,
};
use wgpu::util::DeviceExt;

use crate::encoder::{Op, Recording, WgpuEncoder};
use crate::format;
use crate::pipeline::{SlotLayouts, WgpuPipeline, build_pipeline, uniform_block_size};

const INITIAL_ARENA_CAPACITY: u64 = 16 * 1024;

/// Depth attachment format used for every surface.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU buffer backing one slot's arena, grown on demand.
#[derive(Debug)]
struct SlotBuffer {
    slot: BindingSlot,
    buffer: wgpu::Buffer,
    capacity: u64,
    /// Dynamic-offset bind group; `None` for the light array, which binds
    /// per-upload ranges instead.
    bind_group: Option<wgpu::BindGroup>,
}

impl SlotBuffer {
    fn new(device: &wgpu::Device, layouts: &SlotLayouts, slot: BindingSlot, capacity: u64) -> Self {
        let usage = match uniform_block_size(slot) {
            Some(_) => wgpu::BufferUsages::UNIFORM,
            None => wgpu::BufferUsages::STORAGE,
        } | wgpu::BufferUsages::COPY_DST;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(format!("{slot:?}_arena").as_str()),
            size: capacity,
            usage,
            mapped_at_creation: false,
        });
        let bind_group = uniform_block_size(slot).map(|size| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(format!("{slot:?}_bind_group").as_str()),
                layout: layouts.get(slot),
                entries: &[wgpu::BindGroupEntry {
                    binding: slot.index(),
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: NonZeroU64::new(size),
                    }),
                }],
            })
        });
        Self {
            slot,
            buffer,
            capacity,
            bind_group,
        }
    }

    /// Copy `bytes` to the start of the buffer, reallocating if it is too small.
    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, layouts: &SlotLayouts, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            tracing::debug!("growing {:?} arena to {capacity} bytes", self.slot);
            *self = Self::new(device, layouts, self.slot, capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

/// wgpu device, queue and presentation surface behind the [`RenderDevice`] seam.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    layouts: SlotLayouts,
    /// Indexed by `BindingSlot::group`.
    slot_buffers: Vec<SlotBuffer>,
    uniform_alignment: usize,
    storage_alignment: usize,
    clear_color: wgpu::Color,
}

impl WgpuDevice {
    /// Pick an adapter for `surface`, open a device on it and configure the
    /// surface at `width` x `height`.
    pub fn for_surface(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| GpuError::DeviceUnavailable("no compatible adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("landscape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| GpuError::DeviceUnavailable(e.to_string()))?;

        tracing::info!(
            "GPU initialized with {} backend on {}",
            adapter.get_info().backend.to_str(),
            adapter.get_info().name
        );

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb() && format::pixel_format(*f).is_some())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GpuError::DeviceUnavailable("surface has no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        Ok(Self::new(device, queue, surface, config))
    }

    /// Wrap an already opened device and configure `surface` with `config`.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);
        let layouts = SlotLayouts::new(&device);

        let mut slots = BindingSlot::ALL.to_vec();
        slots.sort_by_key(|s| s.group());
        let slot_buffers = slots
            .into_iter()
            .map(|slot| SlotBuffer::new(&device, &layouts, slot, INITIAL_ARENA_CAPACITY))
            .collect();

        let limits = device.limits();
        Self {
            uniform_alignment: limits.min_uniform_buffer_offset_alignment as usize,
            storage_alignment: limits.min_storage_buffer_offset_alignment as usize,
            device,
            queue,
            surface,
            config,
            depth_view,
            layouts,
            slot_buffers,
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Surface color format, if the renderer can target it.
    pub fn color_format(&self) -> Option<PixelFormat> {
        format::pixel_format(self.config.format)
    }

    pub fn depth_format(&self) -> PixelFormat {
        PixelFormat::Depth32Float
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn raw_device(&self) -> &wgpu::Device {
        &self.device
    }

    fn upload_arenas(&mut self, recording: &Recording) {
        for slot_buffer in &mut self.slot_buffers {
            let bytes = recording.arena(slot_buffer.slot).bytes();
            slot_buffer.write(&self.device, &self.queue, &self.layouts, bytes);
        }
    }

    fn light_bind_groups(&self, recording: &Recording) -> Vec<wgpu::BindGroup> {
        let slot = BindingSlot::Lights;
        let buffer = &self.slot_buffers[slot.group() as usize].buffer;
        recording
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::BindLights { offset, size } => Some((*offset, *size)),
                _ => None,
            })
            .map(|(offset, size)| {
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("lights_bind_group"),
                    layout: self.layouts.get(slot),
                    entries: &[wgpu::BindGroupEntry {
                        binding: slot.index(),
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer,
                            offset,
                            size: NonZeroU64::new(size),
                        }),
                    }],
                })
            })
            .collect()
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

impl RenderDevice for WgpuDevice {
    type Buffer = Arc<wgpu::Buffer>;
    type Pipeline = WgpuPipeline;
    type DepthStencilState = DepthStencilDescriptor;
    type Encoder = WgpuEncoder;

    fn upload_mesh(&self, data: &MeshData) -> Result<Mesh<Arc<wgpu::Buffer>>, GpuError> {
        data.validate()?;
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: data.indices.as_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });
        Ok(Mesh::from_uploaded(
            data,
            Arc::new(vertex_buffer),
            Arc::new(index_buffer),
        ))
    }

    fn build_pipeline(&self, desc: &PipelineDescriptor) -> Result<WgpuPipeline, GpuError> {
        desc.check_formats()?;
        if format::texture_format(desc.color_format) != self.config.format {
            return Err(GpuError::InvalidFormat {
                format: desc.color_format,
                usage: "surface color",
            });
        }
        if format::texture_format(desc.depth_format) != DEPTH_FORMAT {
            return Err(GpuError::InvalidFormat {
                format: desc.depth_format,
                usage: "depth attachment",
            });
        }
        desc.vertex_layout.validate(&STANDARD_SHADER_INPUTS)?;
        build_pipeline(&self.device, &self.layouts, desc)
    }

    fn make_depth_stencil_state(&self, desc: &DepthStencilDescriptor) -> DepthStencilDescriptor {
        *desc
    }

    fn set_clear_color(&mut self, color: [f64; 4]) {
        let [r, g, b, a] = color;
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
        tracing::debug!("surface resized to {}x{}", self.config.width, self.config.height);
    }

    fn begin_frame(&mut self) -> Option<WgpuEncoder> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(wgpu::SurfaceError::Timeout) => return None,
            Err(e) => {
                tracing::error!("surface error: {e}");
                return None;
            }
        };
        Some(WgpuEncoder {
            frame,
            recording: Recording::new(self.uniform_alignment, self.storage_alignment),
        })
    }

    fn present(&mut self, encoder: WgpuEncoder) {
        let WgpuEncoder { frame, recording } = encoder;
        self.upload_arenas(&recording);
        let light_groups = self.light_bind_groups(&recording);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut commands = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = commands.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let mut lights = light_groups.iter();
            for op in &recording.ops {
                match op {
                    Op::SetPipeline(pipeline) => pass.set_pipeline(pipeline),
                    Op::BindUniform { slot, offset } => {
                        let slot_buffer = &self.slot_buffers[slot.group() as usize];
                        pass.set_bind_group(slot.group(), slot_buffer.bind_group.as_ref(), &[*offset]);
                    }
                    Op::BindLights { .. } => {
                        pass.set_bind_group(BindingSlot::Lights.group(), lights.next(), &[]);
                    }
                    Op::SetVertexBuffer { index, buffer } => {
                        pass.set_vertex_buffer(*index, buffer.slice(..));
                    }
                    Op::DrawIndexed {
                        buffer,
                        format,
                        offset,
                        count,
                    } => {
                        pass.set_index_buffer(buffer.slice(*offset..), format::index_format(*format));
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(commands.finish()));
        frame.present();
    }
}
