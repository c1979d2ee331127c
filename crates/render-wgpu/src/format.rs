//! Conversions between the backend-agnostic GPU types and wgpu's.

use landscape_gpu::{CompareFunction, IndexFormat, PixelFormat, VertexFormat, VertexLayout};

pub fn texture_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
        PixelFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
        PixelFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        PixelFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        PixelFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
        PixelFormat::Depth24PlusStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
    }
}

/// The matching [`PixelFormat`], if the renderer supports `format`.
pub fn pixel_format(format: wgpu::TextureFormat) -> Option<PixelFormat> {
    Some(match format {
        wgpu::TextureFormat::Bgra8Unorm => PixelFormat::Bgra8Unorm,
        wgpu::TextureFormat::Bgra8UnormSrgb => PixelFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8Unorm => PixelFormat::Rgba8Unorm,
        wgpu::TextureFormat::Rgba8UnormSrgb => PixelFormat::Rgba8UnormSrgb,
        wgpu::TextureFormat::Depth32Float => PixelFormat::Depth32Float,
        wgpu::TextureFormat::Depth24PlusStencil8 => PixelFormat::Depth24PlusStencil8,
        _ => return None,
    })
}

pub fn index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

pub fn vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
    }
}

pub fn compare_function(compare: CompareFunction) -> wgpu::CompareFunction {
    match compare {
        CompareFunction::Never => wgpu::CompareFunction::Never,
        CompareFunction::Less => wgpu::CompareFunction::Less,
        CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
        CompareFunction::Equal => wgpu::CompareFunction::Equal,
        CompareFunction::Greater => wgpu::CompareFunction::Greater,
        CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
        CompareFunction::Always => wgpu::CompareFunction::Always,
    }
}

pub fn vertex_attributes(layout: &VertexLayout) -> Vec<wgpu::VertexAttribute> {
    layout
        .attributes
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: vertex_format(a.format),
            offset: a.offset,
            shader_location: a.location,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use landscape_gpu::Vertex;

    #[test]
    fn pixel_formats_round_trip() {
        for format in [
            PixelFormat::Bgra8Unorm,
            PixelFormat::Bgra8UnormSrgb,
            PixelFormat::Rgba8Unorm,
            PixelFormat::Rgba8UnormSrgb,
            PixelFormat::Depth32Float,
            PixelFormat::Depth24PlusStencil8,
        ] {
            assert_eq!(pixel_format(texture_format(format)), Some(format));
        }
        assert_eq!(pixel_format(wgpu::TextureFormat::R8Unorm), None);
    }

    #[test]
    fn vertex_attributes_keep_offsets_and_sizes() {
        let attrs = vertex_attributes(&Vertex::layout());
        assert_eq!(attrs.len(), 3);
        for (attr, ours) in attrs.iter().zip(Vertex::layout().attributes) {
            assert_eq!(attr.offset, ours.offset);
            assert_eq!(attr.shader_location, ours.location);
            assert_eq!(attr.format.size(), ours.format.size());
        }
    }
}
