//! wgpu render backend.
//!
//! Implements the `landscape-gpu` device seam on a wgpu surface. Encoder
//! calls are recorded during the frame, with per-slot byte uploads staged in
//! aligned arenas, then replayed into a single render pass at present time.
//!
//! # Invariants
//! - One render pass per frame, cleared to the configured clear color.
//! - Depth state is baked into the pipeline; a differing state set on the
//!   encoder is reported and ignored.
//! - A surface that cannot produce a texture yields no encoder, never an error.

mod device;
mod encoder;
mod format;
mod pipeline;
mod shaders;

pub use device::{DEPTH_FORMAT, WgpuDevice};
pub use encoder::WgpuEncoder;
pub use format::{pixel_format, texture_format};
pub use pipeline::WgpuPipeline;
pub use shaders::{FRAGMENT_ENTRY, SCENE_SHADER, VERTEX_ENTRY};
