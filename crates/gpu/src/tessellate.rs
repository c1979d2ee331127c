//! UV-sphere tessellation.

use std::f32::consts::PI;

use glam::Vec3;

use crate::error::GpuError;
use crate::mesh::{IndexData, MeshData, SubmeshData, Vertex};

/// Upper bound on sphere segments and rings. A 1024x1024 sphere already has
/// about a million vertices.
pub const MAX_SPHERE_DIVISIONS: u32 = 1024;

/// Shape parameters for a tessellated sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    /// Offset applied to every generated vertex, in model space.
    pub center: Vec3,
    /// Slices around the vertical axis.
    pub segments: u32,
    /// Stacks from pole to pole.
    pub rings: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            center: Vec3::ZERO,
            segments: 64,
            rings: 64,
        }
    }
}

/// Tessellate a sphere into a single triangle-list submesh.
///
/// Produces `(rings + 1) * (segments + 1)` vertices (the seam column is
/// duplicated for texture coordinates) and `rings * segments * 6` indices.
/// Needs `3..=MAX_SPHERE_DIVISIONS` segments and `2..=MAX_SPHERE_DIVISIONS` rings.
pub fn sphere(params: &SphereParams) -> Result<MeshData, GpuError> {
    let SphereParams {
        radius,
        center,
        segments,
        rings,
    } = *params;
    if !(3..=MAX_SPHERE_DIVISIONS).contains(&segments) || !(2..=MAX_SPHERE_DIVISIONS).contains(&rings) {
        return Err(GpuError::InvalidMesh(format!(
            "sphere needs 3..={MAX_SPHERE_DIVISIONS} segments and 2..={MAX_SPHERE_DIVISIONS} rings, got {segments}x{rings}"
        )));
    }

    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            let position = center + normal * radius;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [seg as f32 / segments as f32, ring as f32 / rings as f32],
            });
        }
    }

    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    let index_count = indices.len() as u32;
    Ok(MeshData {
        indices: IndexData::from_u32(indices, vertices.len()),
        vertices,
        submeshes: vec![SubmeshData {
            index_start: 0,
            index_count,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::IndexFormat;

    #[test]
    fn default_sphere_counts() {
        let data = sphere(&SphereParams::default()).unwrap();
        assert_eq!(data.vertices.len(), 65 * 65);
        assert_eq!(data.indices.len(), 64 * 64 * 6);
        assert_eq!(data.submeshes.len(), 1);
        assert_eq!(data.submeshes[0].index_count, 64 * 64 * 6);
        assert_eq!(data.indices.format(), IndexFormat::Uint16);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn vertices_lie_on_the_surface() {
        let params = SphereParams {
            radius: 0.5,
            center: Vec3::new(1.0, 2.0, 3.0),
            segments: 12,
            rings: 8,
        };
        let data = sphere(&params).unwrap();
        for v in &data.vertices {
            let p = Vec3::from_array(v.position);
            assert!(((p - params.center).length() - 0.5).abs() < 1e-5);
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let data = sphere(&SphereParams {
            segments: 7,
            rings: 5,
            ..SphereParams::default()
        })
        .unwrap();
        let count = data.vertices.len() as u16;
        match &data.indices {
            IndexData::U16(v) => assert!(v.iter().all(|&i| i < count)),
            IndexData::U32(_) => panic!("small sphere should use 16-bit indices"),
        }
    }

    #[test]
    fn dense_sphere_switches_to_wide_indices() {
        let data = sphere(&SphereParams {
            segments: 300,
            rings: 300,
            ..SphereParams::default()
        })
        .unwrap();
        assert_eq!(data.indices.format(), IndexFormat::Uint32);
    }

    #[test]
    fn out_of_range_divisions_are_rejected() {
        for (segments, rings) in [(u32::MAX, 2), (3, u32::MAX), (100_000, 100_000), (2, 8), (8, 1)] {
            let result = sphere(&SphereParams {
                segments,
                rings,
                ..SphereParams::default()
            });
            assert!(matches!(result, Err(GpuError::InvalidMesh(_))), "{segments}x{rings}");
        }
        assert!(
            sphere(&SphereParams {
                segments: MAX_SPHERE_DIVISIONS,
                rings: 2,
                ..SphereParams::default()
            })
            .is_ok()
        );
    }
}
