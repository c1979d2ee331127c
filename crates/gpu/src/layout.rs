use crate::error::GpuError;
use crate::format::VertexFormat;

/// One attribute inside an interleaved vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u64,
}

/// Layout of the first vertex buffer of a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

/// An input the vertex stage reads at `location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderInput {
    pub location: u32,
    pub format: VertexFormat,
}

/// Inputs read by the bundled vertex stage: position, normal, uv.
pub const STANDARD_SHADER_INPUTS: [ShaderInput; 3] = [
    ShaderInput {
        location: 0,
        format: VertexFormat::Float32x3,
    },
    ShaderInput {
        location: 1,
        format: VertexFormat::Float32x3,
    },
    ShaderInput {
        location: 2,
        format: VertexFormat::Float32x2,
    },
];

impl VertexLayout {
    pub fn attribute(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }

    /// Check that every shader input is provided with the same format and
    /// fits inside one vertex. Extra attributes are allowed.
    pub fn validate(&self, inputs: &[ShaderInput]) -> Result<(), GpuError> {
        for input in inputs {
            let attr = self
                .attribute(input.location)
                .ok_or(GpuError::MissingAttribute {
                    location: input.location,
                })?;
            if attr.format != input.format {
                return Err(GpuError::AttributeMismatch {
                    location: input.location,
                    expected: input.format,
                    found: attr.format,
                });
            }
            let end = attr.offset + attr.format.size();
            if end > self.stride {
                return Err(GpuError::AttributeOutOfStride {
                    location: input.location,
                    end,
                    stride: self.stride,
                });
            }
        }
        Ok(())
    }
}
