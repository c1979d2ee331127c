//! Frame renderer: turns a scene into one frame of GPU commands per tick.
//!
//! # Invariants
//! - The renderer never mutates the scene; it borrows it for each frame.
//! - Frame uniforms are recomputed exactly once per frame, before any draw.
//! - A frame whose target cannot be acquired is dropped without submitting.
//! - Pipeline and depth-stencil state are read-only after construction.

mod clock;
mod delegate;
mod error;
mod renderer;
mod summary;

pub use clock::FrameClock;
pub use delegate::{FrameDelegate, SceneRenderer};
pub use error::RenderError;
pub use renderer::{FrameOutcome, FrameRenderer, FrameState, RendererDescriptor};
pub use summary::summarize_frame;

pub fn crate_info() -> &'static str {
    "landscape-render v0.1.0"
}
