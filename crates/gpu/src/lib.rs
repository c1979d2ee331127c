//! GPU seam: everything the render loop needs from a graphics backend.
//!
//! The frame renderer and scene objects are written against the
//! [`RenderDevice`] and [`RenderEncoder`] traits. A wgpu implementation lives
//! in `landscape-render-wgpu`; [`RecordingDevice`] records encoder calls and
//! backs the tests and the headless CLI.
//!
//! # Invariants
//! - Binding slots are fixed and shared with the shaders (see [`BindingSlot`]).
//! - Meshes are immutable once uploaded.
//! - Frame acquisition failure is an `Option`, never an error.

mod device;
mod error;
mod format;
mod layout;
mod mesh;
mod recording;
mod tessellate;
mod uniforms;

pub use device::{
    CompareFunction, DepthStencilDescriptor, PipelineDescriptor, RenderDevice, RenderEncoder,
};
pub use error::GpuError;
pub use format::{IndexFormat, PixelFormat, VertexFormat};
pub use layout::{STANDARD_SHADER_INPUTS, ShaderInput, VertexAttribute, VertexLayout};
pub use mesh::{IndexData, Mesh, MeshData, Submesh, SubmeshData, Vertex};
pub use recording::{BufferId, Command, PipelineId, RecordedFrame, RecordingDevice, RecordingEncoder};
pub use tessellate::{MAX_SPHERE_DIVISIONS, SphereParams, sphere};
pub use uniforms::{
    BindingSlot, FrameUniforms, LIGHT_STRIDE, LightRaw, ModelTransform, Params, ShaderStage,
    VERTEX_BUFFER_INDEX,
};
