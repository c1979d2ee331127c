//! A backend that records encoder calls instead of talking to a GPU.
//!
//! Used by the headless CLI to inspect what a frame would submit, and by the
//! tests to check the frame protocol without a graphics adapter.

use std::cell::Cell;

use crate::device::{DepthStencilDescriptor, PipelineDescriptor, RenderDevice, RenderEncoder};
use crate::error::GpuError;
use crate::format::IndexFormat;
use crate::layout::{STANDARD_SHADER_INPUTS, ShaderInput};
use crate::mesh::{Mesh, MeshData, Submesh};
use crate::uniforms::BindingSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(pub u32);

/// One recorded encoder call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetDepthStencilState(DepthStencilDescriptor),
    SetPipeline(PipelineId),
    SetVertexBytes {
        slot: BindingSlot,
        bytes: Vec<u8>,
    },
    SetFragmentBytes {
        slot: BindingSlot,
        bytes: Vec<u8>,
    },
    SetVertexBuffer {
        index: u32,
        buffer: BufferId,
    },
    DrawIndexed {
        index_count: u32,
        index_format: IndexFormat,
        index_buffer: BufferId,
        index_offset: u64,
    },
}

impl Command {
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawIndexed { .. })
    }

    /// Slot and payload for byte uploads, `None` for other commands.
    pub fn upload(&self) -> Option<(BindingSlot, &[u8])> {
        match self {
            Self::SetVertexBytes { slot, bytes } | Self::SetFragmentBytes { slot, bytes } => {
                Some((*slot, bytes.as_slice()))
            }
            _ => None,
        }
    }
}

/// Commands submitted for one presented frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub index: u64,
    pub commands: Vec<Command>,
}

impl RecordedFrame {
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Every payload uploaded to `slot`, in recording order.
    pub fn uploads(&self, slot: BindingSlot) -> impl Iterator<Item = &[u8]> {
        self.commands
            .iter()
            .filter_map(move |c| c.upload().filter(|(s, _)| *s == slot).map(|(_, b)| b))
    }
}

/// Encoder handed out by [`RecordingDevice::begin_frame`].
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    commands: Vec<Command>,
}

impl RecordingEncoder {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

impl RenderEncoder for RecordingEncoder {
    type Buffer = BufferId;
    type Pipeline = PipelineId;
    type DepthStencilState = DepthStencilDescriptor;

    fn set_depth_stencil_state(&mut self, state: &DepthStencilDescriptor) {
        self.commands.push(Command::SetDepthStencilState(*state));
    }

    fn set_pipeline(&mut self, pipeline: &PipelineId) {
        self.commands.push(Command::SetPipeline(*pipeline));
    }

    fn set_vertex_bytes(&mut self, slot: BindingSlot, bytes: &[u8]) {
        self.commands.push(Command::SetVertexBytes {
            slot,
            bytes: bytes.to_vec(),
        });
    }

    fn set_fragment_bytes(&mut self, slot: BindingSlot, bytes: &[u8]) {
        self.commands.push(Command::SetFragmentBytes {
            slot,
            bytes: bytes.to_vec(),
        });
    }

    fn set_vertex_buffer(&mut self, index: u32, buffer: &BufferId) {
        self.commands.push(Command::SetVertexBuffer {
            index,
            buffer: *buffer,
        });
    }

    fn draw_indexed(&mut self, submesh: &Submesh<BufferId>) {
        self.commands.push(Command::DrawIndexed {
            index_count: submesh.index_count,
            index_format: submesh.index_format,
            index_buffer: submesh.index_buffer,
            index_offset: submesh.index_offset,
        });
    }
}

/// Device that hands out buffer ids and keeps every submitted frame.
#[derive(Debug)]
pub struct RecordingDevice {
    shader_inputs: Vec<ShaderInput>,
    next_buffer: Cell<u32>,
    next_pipeline: Cell<u32>,
    /// Number of upcoming `begin_frame` calls that fail.
    unavailable_frames: u32,
    size: (u32, u32),
    clear_color: [f64; 4],
    frames: Vec<RecordedFrame>,
}

impl RecordingDevice {
    /// A device whose vertex stage reads the standard position/normal/uv inputs.
    pub fn new() -> Self {
        Self::with_shader_inputs(STANDARD_SHADER_INPUTS.to_vec())
    }

    pub fn with_shader_inputs(shader_inputs: Vec<ShaderInput>) -> Self {
        Self {
            shader_inputs,
            next_buffer: Cell::new(0),
            next_pipeline: Cell::new(0),
            unavailable_frames: 0,
            size: (1, 1),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            frames: Vec::new(),
        }
    }

    /// Make the next `count` frame acquisitions fail.
    pub fn drop_next_frames(&mut self, count: u32) {
        self.unavailable_frames += count;
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    pub fn take_frames(&mut self) -> Vec<RecordedFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Last size passed to `resize`.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn clear_color(&self) -> [f64; 4] {
        self.clear_color
    }

    /// Number of buffers allocated so far.
    pub fn buffer_count(&self) -> u32 {
        self.next_buffer.get()
    }

    fn allocate_buffer(&self) -> BufferId {
        let id = self.next_buffer.get();
        self.next_buffer.set(id + 1);
        BufferId(id)
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDevice for RecordingDevice {
    type Buffer = BufferId;
    type Pipeline = PipelineId;
    type DepthStencilState = DepthStencilDescriptor;
    type Encoder = RecordingEncoder;

    fn upload_mesh(&self, data: &MeshData) -> Result<Mesh<BufferId>, GpuError> {
        data.validate()?;
        let vertex_buffer = self.allocate_buffer();
        let index_buffer = self.allocate_buffer();
        Ok(Mesh::from_uploaded(data, vertex_buffer, index_buffer))
    }

    fn build_pipeline(&self, desc: &PipelineDescriptor) -> Result<PipelineId, GpuError> {
        desc.check_formats()?;
        if desc.vertex_entry.is_empty() || desc.fragment_entry.is_empty() {
            return Err(GpuError::PipelineBuild(format!(
                "{}: missing shader entry point",
                desc.label
            )));
        }
        desc.vertex_layout.validate(&self.shader_inputs)?;

        let id = self.next_pipeline.get();
        self.next_pipeline.set(id + 1);
        Ok(PipelineId(id))
    }

    fn make_depth_stencil_state(&self, desc: &DepthStencilDescriptor) -> DepthStencilDescriptor {
        *desc
    }

    fn set_clear_color(&mut self, color: [f64; 4]) {
        self.clear_color = color;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn begin_frame(&mut self) -> Option<RecordingEncoder> {
        if self.unavailable_frames > 0 {
            self.unavailable_frames -= 1;
            tracing::debug!(
                "recording device withholding frame, {} more to drop",
                self.unavailable_frames
            );
            return None;
        }
        Some(RecordingEncoder::default())
    }

    fn present(&mut self, encoder: RecordingEncoder) {
        let index = self.frames.len() as u64;
        tracing::trace!("recorded frame {index} with {} commands", encoder.commands.len());
        self.frames.push(RecordedFrame {
            index,
            commands: encoder.commands,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CompareFunction;
    use crate::format::{PixelFormat, VertexFormat};
    use crate::tessellate::{SphereParams, sphere};

    fn pipeline_desc(layout: crate::layout::VertexLayout) -> PipelineDescriptor {
        PipelineDescriptor {
            label: "test".into(),
            vertex_entry: "vertex_main".into(),
            fragment_entry: "fragment_main".into(),
            color_format: PixelFormat::Bgra8UnormSrgb,
            depth_format: PixelFormat::Depth32Float,
            vertex_layout: layout,
            depth_stencil: DepthStencilDescriptor::default(),
        }
    }

    #[test]
    fn upload_allocates_vertex_and_index_buffers() {
        let device = RecordingDevice::new();
        let mesh = device.upload_mesh(&sphere(&SphereParams::default()).unwrap()).unwrap();
        assert_eq!(device.buffer_count(), 2);
        assert_eq!(mesh.vertex_buffers(), [BufferId(0)].as_slice());
        assert_eq!(mesh.submeshes()[0].index_buffer, BufferId(1));
    }

    #[test]
    fn pipeline_rejects_incompatible_layout() {
        let device = RecordingDevice::with_shader_inputs(vec![ShaderInput {
            location: 0,
            format: VertexFormat::Float32x4,
        }]);
        let err = device
            .build_pipeline(&pipeline_desc(crate::mesh::Vertex::layout()))
            .unwrap_err();
        assert!(matches!(err, GpuError::AttributeMismatch { location: 0, .. }));
    }

    #[test]
    fn pipeline_rejects_missing_entry_point() {
        let device = RecordingDevice::new();
        let mut desc = pipeline_desc(crate::mesh::Vertex::layout());
        desc.fragment_entry.clear();
        assert!(matches!(
            device.build_pipeline(&desc),
            Err(GpuError::PipelineBuild(_))
        ));
    }

    #[test]
    fn dropped_frames_are_consumed_in_order() {
        let mut device = RecordingDevice::new();
        device.drop_next_frames(2);
        assert!(device.begin_frame().is_none());
        assert!(device.begin_frame().is_none());
        assert!(device.begin_frame().is_some());
    }

    #[test]
    fn present_keeps_commands() {
        let mut device = RecordingDevice::new();
        let state = device.make_depth_stencil_state(&DepthStencilDescriptor::default());
        let mut encoder = device.begin_frame().unwrap();
        encoder.set_depth_stencil_state(&state);
        encoder.set_fragment_bytes(BindingSlot::Lights, &[1, 2, 3]);
        device.present(encoder);

        let frame = device.last_frame().unwrap();
        assert_eq!(frame.index, 0);
        assert_eq!(
            frame.commands[0],
            Command::SetDepthStencilState(DepthStencilDescriptor {
                compare: CompareFunction::Less,
                depth_write_enabled: true,
            })
        );
        let lights: Vec<&[u8]> = frame.uploads(BindingSlot::Lights).collect();
        assert_eq!(lights, vec![&[1u8, 2, 3][..]]);
        assert_eq!(frame.draw_count(), 0);
    }
}
