use landscape_gpu::GpuError;

/// Errors from loading, validating or building a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported scene file extension: {0:?}")]
    UnsupportedFormat(String),
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
    #[error("invalid object {name:?}: {reason}")]
    InvalidObject { name: String, reason: String },
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
