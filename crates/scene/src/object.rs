use glam::{Mat4, Vec3};
use landscape_gpu::{
    BindingSlot, GpuError, Mesh, MeshData, ModelTransform, Params, RenderDevice, RenderEncoder,
    SphereParams, VERTEX_BUFFER_INDEX, VertexLayout, sphere,
};

/// Shape parameters. Only used to build the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        center: Vec3,
        segments: u32,
        rings: u32,
    },
}

impl Shape {
    /// A 64x64 sphere.
    pub fn sphere(radius: f32, center: Vec3) -> Self {
        Self::Sphere {
            radius,
            center,
            segments: 64,
            rings: 64,
        }
    }

    pub fn tessellate(&self) -> Result<MeshData, GpuError> {
        match *self {
            Self::Sphere {
                radius,
                center,
                segments,
                rings,
            } => sphere(&SphereParams {
                radius,
                center,
                segments,
                rings,
            }),
        }
    }
}

/// A named drawable: owned mesh plus its transform block.
#[derive(Debug)]
pub struct SceneObject<B> {
    name: String,
    shape: Shape,
    placement: Mat4,
    transform: ModelTransform,
    mesh: Mesh<B>,
}

impl<B: Clone> SceneObject<B> {
    /// Tessellate `shape`, upload it through `device` and place it in the world.
    pub fn new<D>(
        device: &D,
        name: impl Into<String>,
        shape: Shape,
        placement: Mat4,
    ) -> Result<Self, GpuError>
    where
        D: RenderDevice<Buffer = B>,
    {
        let mesh = device.upload_mesh(&shape.tessellate()?)?;
        Ok(Self::with_mesh(name, shape, placement, mesh))
    }

    /// Wrap geometry that is already resident on the device.
    pub fn with_mesh(name: impl Into<String>, shape: Shape, placement: Mat4, mesh: Mesh<B>) -> Self {
        let name = name.into();
        tracing::debug!(
            "built scene object {name:?} with {} submeshes",
            mesh.submeshes().len()
        );
        Self {
            name,
            shape,
            placement,
            transform: ModelTransform::from_placement(placement),
            mesh,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn placement(&self) -> Mat4 {
        self.placement
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    pub fn mesh(&self) -> &Mesh<B> {
        &self.mesh
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        self.mesh.layout()
    }

    /// Move the object, recomputing its transform block.
    pub fn set_placement(&mut self, placement: Mat4) {
        self.placement = placement;
        self.transform = ModelTransform::from_placement(placement);
    }

    /// Record this object's draws: transform and shared params to their
    /// slots, the first vertex buffer, then one indexed draw per submesh.
    pub fn emit_draw<E>(&self, encoder: &mut E, params: &Params)
    where
        E: RenderEncoder<Buffer = B>,
    {
        encoder.set_vertex_bytes(BindingSlot::ObjectTransform, bytemuck::bytes_of(&self.transform));
        encoder.set_fragment_bytes(BindingSlot::Params, bytemuck::bytes_of(params));
        if let Some(buffer) = self.mesh.vertex_buffers().first() {
            encoder.set_vertex_buffer(VERTEX_BUFFER_INDEX, buffer);
        }
        for submesh in self.mesh.submeshes() {
            encoder.draw_indexed(submesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landscape_gpu::{BufferId, Command, RecordingDevice};

    fn small_sphere() -> Shape {
        Shape::Sphere {
            radius: 0.5,
            center: Vec3::ZERO,
            segments: 8,
            rings: 6,
        }
    }

    #[test]
    fn construction_derives_transform_block() {
        let device = RecordingDevice::new();
        let placement = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
        let object = SceneObject::new(&device, "Sphere_1", small_sphere(), placement).unwrap();

        assert_eq!(object.name(), "Sphere_1");
        assert_eq!(object.transform().model, placement.to_cols_array_2d());
        assert_eq!(object.transform(), &ModelTransform::from_placement(placement));
    }

    #[test]
    fn emit_draw_binds_then_draws_each_submesh() {
        let mut device = RecordingDevice::new();
        let object = SceneObject::new(&device, "ball", small_sphere(), Mat4::IDENTITY).unwrap();
        let params = Params::new(Vec3::new(1.0, 2.0, 3.0), 2);

        let mut encoder = device.begin_frame().unwrap();
        object.emit_draw(&mut encoder, &params);
        let commands = encoder.commands().to_vec();

        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[0],
            Command::SetVertexBytes {
                slot: BindingSlot::ObjectTransform,
                bytes: bytemuck::bytes_of(object.transform()).to_vec(),
            }
        );
        assert_eq!(
            commands[1],
            Command::SetFragmentBytes {
                slot: BindingSlot::Params,
                bytes: bytemuck::bytes_of(&params).to_vec(),
            }
        );
        assert_eq!(
            commands[2],
            Command::SetVertexBuffer {
                index: VERTEX_BUFFER_INDEX,
                buffer: BufferId(0),
            }
        );
        match &commands[3] {
            Command::DrawIndexed {
                index_count,
                index_buffer,
                index_offset,
                ..
            } => {
                assert_eq!(*index_count, 8 * 6 * 6);
                assert_eq!(*index_buffer, BufferId(1));
                assert_eq!(*index_offset, 0);
            }
            other => panic!("expected a draw, got {other:?}"),
        }
    }

    #[test]
    fn set_placement_recomputes_transform() {
        let device = RecordingDevice::new();
        let mut object = SceneObject::new(&device, "ball", small_sphere(), Mat4::IDENTITY).unwrap();
        let moved = Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));
        object.set_placement(moved);
        assert_eq!(object.placement(), moved);
        assert_eq!(object.transform().normal[0], [0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn oversized_tessellation_is_an_error() {
        let device = RecordingDevice::new();
        let shape = Shape::Sphere {
            radius: 0.5,
            center: Vec3::ZERO,
            segments: u32::MAX,
            rings: 2,
        };
        let result = SceneObject::new(&device, "huge", shape, Mat4::IDENTITY);
        assert!(matches!(result, Err(GpuError::InvalidMesh(_))));
        assert_eq!(device.buffer_count(), 0);
    }
}
