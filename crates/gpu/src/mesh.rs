use bytemuck::{Pod, Zeroable};

use crate::error::GpuError;
use crate::format::{IndexFormat, VertexFormat};
use crate::layout::{VertexAttribute, VertexLayout};

/// Interleaved vertex produced by the tessellator.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Vertex>() as u64,
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttribute {
                    location: 1,
                    format: VertexFormat::Float32x3,
                    offset: 12,
                },
                VertexAttribute {
                    location: 2,
                    format: VertexFormat::Float32x2,
                    offset: 24,
                },
            ],
        }
    }
}

/// CPU-side index storage.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    /// Pick the narrowest format that can address `vertex_count` vertices.
    pub fn from_u32(indices: Vec<u32>, vertex_count: usize) -> Self {
        if vertex_count <= u16::MAX as usize + 1 {
            Self::U16(indices.into_iter().map(|i| i as u16).collect())
        } else {
            Self::U32(indices)
        }
    }

    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::Uint16,
            Self::U32(_) => IndexFormat::Uint32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// A contiguous index range, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmeshData {
    pub index_start: u32,
    pub index_count: u32,
}

/// Tessellated geometry waiting to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: IndexData,
    pub submeshes: Vec<SubmeshData>,
}

impl MeshData {
    pub fn layout(&self) -> VertexLayout {
        Vertex::layout()
    }

    /// Reject data no backend can draw: no vertices, or a submesh that reads
    /// past the index buffer.
    pub fn validate(&self) -> Result<(), GpuError> {
        if self.vertices.is_empty() {
            return Err(GpuError::InvalidMesh("no vertices".into()));
        }
        let index_len = self.indices.len() as u64;
        for (i, sub) in self.submeshes.iter().enumerate() {
            let end = sub.index_start as u64 + sub.index_count as u64;
            if end > index_len {
                return Err(GpuError::InvalidMesh(format!(
                    "submesh {i} ends at index {end}, past {index_len} indices"
                )));
            }
        }
        Ok(())
    }
}

/// One indexed draw range inside a mesh's shared buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh<B> {
    pub index_count: u32,
    pub index_format: IndexFormat,
    pub index_buffer: B,
    /// Byte offset into `index_buffer`.
    pub index_offset: u64,
}

/// GPU-resident geometry. Immutable once built; owned by one scene object.
#[derive(Debug)]
pub struct Mesh<B> {
    vertex_buffers: Vec<B>,
    submeshes: Vec<Submesh<B>>,
    layout: VertexLayout,
}

impl<B: Clone> Mesh<B> {
    pub fn new(vertex_buffers: Vec<B>, submeshes: Vec<Submesh<B>>, layout: VertexLayout) -> Self {
        Self {
            vertex_buffers,
            submeshes,
            layout,
        }
    }

    /// Assemble a mesh from one vertex buffer and one index buffer holding
    /// `data`, as every backend uploads it.
    pub fn from_uploaded(data: &MeshData, vertex_buffer: B, index_buffer: B) -> Self {
        let format = data.indices.format();
        let submeshes = data
            .submeshes
            .iter()
            .map(|sub| Submesh {
                index_count: sub.index_count,
                index_format: format,
                index_buffer: index_buffer.clone(),
                index_offset: sub.index_start as u64 * format.byte_width(),
            })
            .collect();
        Self::new(vec![vertex_buffer], submeshes, data.layout())
    }

    pub fn vertex_buffers(&self) -> &[B] {
        &self.vertex_buffers
    }

    pub fn submeshes(&self) -> &[Submesh<B>] {
        &self.submeshes
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_pair() -> MeshData {
        let v = Vertex {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0; 2],
        };
        MeshData {
            vertices: vec![v; 4],
            indices: IndexData::U16(vec![0, 1, 2, 2, 3, 0]),
            submeshes: vec![
                SubmeshData {
                    index_start: 0,
                    index_count: 3,
                },
                SubmeshData {
                    index_start: 3,
                    index_count: 3,
                },
            ],
        }
    }

    #[test]
    fn vertex_stride_is_32_bytes() {
        assert_eq!(Vertex::layout().stride, 32);
    }

    #[test]
    fn narrow_indices_when_possible() {
        assert_eq!(IndexData::from_u32(vec![0, 1, 2], 3).format(), IndexFormat::Uint16);
        assert_eq!(
            IndexData::from_u32(vec![0, 1, 70_000], 70_001).format(),
            IndexFormat::Uint32
        );
    }

    #[test]
    fn submesh_offsets_are_in_bytes() {
        let data = triangle_pair();
        let mesh = Mesh::from_uploaded(&data, 1u32, 2u32);
        let offsets: Vec<u64> = mesh.submeshes().iter().map(|s| s.index_offset).collect();
        assert_eq!(offsets, vec![0, 6]);
        assert!(mesh.submeshes().iter().all(|s| s.index_buffer == 2));
        assert_eq!(mesh.vertex_buffers(), [1u32].as_slice());
    }

    #[test]
    fn validate_rejects_out_of_range_submesh() {
        let mut data = triangle_pair();
        data.submeshes[1].index_count = 4;
        assert!(matches!(data.validate(), Err(GpuError::InvalidMesh(_))));
    }

    #[test]
    fn validate_rejects_empty_vertices() {
        let mut data = triangle_pair();
        data.vertices.clear();
        assert!(data.validate().is_err());
    }
}
