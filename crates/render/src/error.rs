use landscape_gpu::GpuError;

/// Fatal renderer construction failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("object {object:?} does not use the pipeline's vertex layout")]
    LayoutMismatch { object: String },
}
