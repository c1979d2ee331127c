use std::fmt;

use crate::error::GpuError;
use crate::format::PixelFormat;
use crate::layout::VertexLayout;
use crate::mesh::{Mesh, MeshData, Submesh};
use crate::uniforms::BindingSlot;

/// Depth comparison used by the depth test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    LessEqual,
    Equal,
    Greater,
    GreaterEqual,
    NotEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilDescriptor {
    pub compare: CompareFunction,
    pub depth_write_enabled: bool,
}

impl Default for DepthStencilDescriptor {
    /// Nearer fragments win and write their depth.
    fn default() -> Self {
        Self {
            compare: CompareFunction::Less,
            depth_write_enabled: true,
        }
    }
}

/// Everything a backend needs to build the single render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDescriptor {
    pub label: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub color_format: PixelFormat,
    pub depth_format: PixelFormat,
    /// Layout of the meshes that will be drawn, checked against the vertex
    /// stage's inputs.
    pub vertex_layout: VertexLayout,
    pub depth_stencil: DepthStencilDescriptor,
}

impl PipelineDescriptor {
    /// Reject attachment formats used in the wrong role.
    pub fn check_formats(&self) -> Result<(), GpuError> {
        if self.color_format.is_depth() {
            return Err(GpuError::InvalidFormat {
                format: self.color_format,
                usage: "color",
            });
        }
        if !self.depth_format.is_depth() {
            return Err(GpuError::InvalidFormat {
                format: self.depth_format,
                usage: "depth",
            });
        }
        Ok(())
    }
}

/// A graphics device plus the presentation surface it renders into.
///
/// Construction-time operations return `Result`; per-frame acquisition
/// returns `Option` because a missing frame is droppable.
pub trait RenderDevice {
    type Buffer: Clone + fmt::Debug;
    type Pipeline;
    type DepthStencilState;
    type Encoder: RenderEncoder<
            Buffer = Self::Buffer,
            Pipeline = Self::Pipeline,
            DepthStencilState = Self::DepthStencilState,
        >;

    /// Upload tessellated geometry into GPU buffers.
    fn upload_mesh(&self, data: &MeshData) -> Result<Mesh<Self::Buffer>, GpuError>;

    fn build_pipeline(&self, desc: &PipelineDescriptor) -> Result<Self::Pipeline, GpuError>;

    fn make_depth_stencil_state(&self, desc: &DepthStencilDescriptor) -> Self::DepthStencilState;

    /// Color the render target is cleared to at the start of every frame.
    fn set_clear_color(&mut self, color: [f64; 4]);

    /// The presentation surface changed size, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Acquire a render target and a command recorder for one frame.
    fn begin_frame(&mut self) -> Option<Self::Encoder>;

    /// End recording, present the acquired target and submit.
    fn present(&mut self, encoder: Self::Encoder);
}

/// Command recorder for one frame.
pub trait RenderEncoder {
    type Buffer;
    type Pipeline;
    type DepthStencilState;

    fn set_depth_stencil_state(&mut self, state: &Self::DepthStencilState);

    fn set_pipeline(&mut self, pipeline: &Self::Pipeline);

    /// Upload small constant data to a vertex-stage slot.
    fn set_vertex_bytes(&mut self, slot: BindingSlot, bytes: &[u8]);

    /// Upload small constant data to a fragment-stage slot.
    fn set_fragment_bytes(&mut self, slot: BindingSlot, bytes: &[u8]);

    fn set_vertex_buffer(&mut self, index: u32, buffer: &Self::Buffer);

    /// Record one indexed triangle-list draw over `submesh`.
    fn draw_indexed(&mut self, submesh: &Submesh<Self::Buffer>);
}
