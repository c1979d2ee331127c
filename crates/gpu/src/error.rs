use crate::format::{PixelFormat, VertexFormat};

/// Construction-time GPU failures. All of them are fatal to the renderer.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("GPU device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("pipeline build failed: {0}")]
    PipelineBuild(String),
    #[error("vertex layout has no attribute at location {location}")]
    MissingAttribute { location: u32 },
    #[error("vertex attribute {location} is {found:?}, shader expects {expected:?}")]
    AttributeMismatch {
        location: u32,
        expected: VertexFormat,
        found: VertexFormat,
    },
    #[error("vertex attribute {location} ends at byte {end}, past the stride of {stride}")]
    AttributeOutOfStride { location: u32, end: u64, stride: u64 },
    #[error("{format:?} cannot be used as a {usage} attachment")]
    InvalidFormat {
        format: PixelFormat,
        usage: &'static str,
    },
    #[error("invalid mesh data: {0}")]
    InvalidMesh(String),
}
