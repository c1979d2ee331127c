//! GPU-visible data blocks and the binding slots they are uploaded to.
//!
//! Every struct here is `#[repr(C)]` and laid out to match the WGSL
//! declarations in `landscape-render-wgpu` (vec3 fields padded to 16 bytes).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use landscape_common::math::normal_matrix;

/// Shader stage a binding slot is visible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Fixed binding slots shared by the uploader and the shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingSlot {
    /// Per-object [`ModelTransform`], vertex stage.
    ObjectTransform,
    /// Per-frame [`FrameUniforms`], vertex stage.
    FrameUniforms,
    /// Shared per-draw [`Params`], fragment stage.
    Params,
    /// Array of [`LightRaw`], fragment stage.
    Lights,
}

/// Vertex buffer index the mesh's first vertex buffer is bound to.
pub const VERTEX_BUFFER_INDEX: u32 = 0;

impl BindingSlot {
    pub const ALL: [BindingSlot; 4] = [
        Self::ObjectTransform,
        Self::FrameUniforms,
        Self::Params,
        Self::Lights,
    ];

    /// Numeric slot index.
    pub const fn index(self) -> u32 {
        match self {
            Self::ObjectTransform => 10,
            Self::FrameUniforms => 11,
            Self::Params => 12,
            Self::Lights => 13,
        }
    }

    pub const fn stage(self) -> ShaderStage {
        match self {
            Self::ObjectTransform | Self::FrameUniforms => ShaderStage::Vertex,
            Self::Params | Self::Lights => ShaderStage::Fragment,
        }
    }

    /// Bind group index for backends that group resources (wgpu).
    pub const fn group(self) -> u32 {
        match self {
            Self::FrameUniforms => 0,
            Self::ObjectTransform => 1,
            Self::Params => 2,
            Self::Lights => 3,
        }
    }
}

/// Per-object transform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelTransform {
    pub model: [[f32; 4]; 4],
    /// Columns of the 3x3 normal matrix, each padded to a vec4.
    pub normal: [[f32; 4]; 3],
}

impl ModelTransform {
    pub fn from_placement(model: Mat4) -> Self {
        let n = normal_matrix(model);
        Self {
            model: model.to_cols_array_2d(),
            normal: [
                n.x_axis.extend(0.0).to_array(),
                n.y_axis.extend(0.0).to_array(),
                n.z_axis.extend(0.0).to_array(),
            ],
        }
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::from_placement(Mat4::IDENTITY)
    }
}

/// Camera matrices, uploaded once per frame.
///
/// The camera's world position is not part of this block. Lighting needs it
/// in the fragment stage, so it travels in [`Params::camera_position`] at
/// [`BindingSlot::Params`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl FrameUniforms {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// Shared fragment parameters bound with every draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Params {
    pub camera_position: [f32; 3],
    pub light_count: u32,
}

impl Params {
    pub fn new(camera_position: Vec3, light_count: u32) -> Self {
        Self {
            camera_position: camera_position.to_array(),
            light_count,
        }
    }
}

/// GPU form of one light descriptor.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LightRaw {
    pub position: [f32; 3],
    pub kind: u32,
    pub color: [f32; 3],
    pub intensity: f32,
    pub specular_color: [f32; 3],
    pub radius: f32,
    pub attenuation: [f32; 3],
    pub cone_angle: f32,
    pub cone_direction: [f32; 3],
    pub cone_attenuation: f32,
}

/// Byte stride of one light in the light array.
pub const LIGHT_STRIDE: usize = std::mem::size_of::<LightRaw>();
