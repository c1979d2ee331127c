use std::time::{Duration, Instant};

use landscape_common::ViewportSize;
use landscape_gpu::{
    BindingSlot, DepthStencilDescriptor, FrameUniforms, Params, PipelineDescriptor, PixelFormat,
    RenderDevice, RenderEncoder, Vertex,
};
use landscape_scene::Scene;

use crate::clock::FrameClock;
use crate::error::RenderError;

/// Surface formats and fixed pipeline settings, supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererDescriptor {
    pub label: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub color_format: PixelFormat,
    pub depth_format: PixelFormat,
    pub clear_color: [f64; 4],
}

impl Default for RendererDescriptor {
    fn default() -> Self {
        Self {
            label: "landscape".into(),
            vertex_entry: "vertex_main".into(),
            fragment_entry: "fragment_main".into(),
            color_format: PixelFormat::Bgra8UnormSrgb,
            depth_format: PixelFormat::Depth32Float,
            clear_color: [1.0, 1.0, 0.9, 1.0],
        }
    }
}

/// Where the renderer is inside one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    FrameAcquired,
    Recording,
    Submitted,
}

impl FrameState {
    /// The only state that may follow `self`.
    pub fn successor(self) -> Self {
        match self {
            Self::Idle => Self::FrameAcquired,
            Self::FrameAcquired => Self::Recording,
            Self::Recording => Self::Submitted,
            Self::Submitted => Self::Idle,
        }
    }
}

/// Result of one `draw` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No render target was available; nothing was submitted.
    Dropped,
}

/// Drives one frame per `draw`: acquire, bind, upload, draw, present.
pub struct FrameRenderer<D: RenderDevice> {
    device: D,
    pipeline: D::Pipeline,
    depth_state: D::DepthStencilState,
    state: FrameState,
    clock: FrameClock,
    uniforms: FrameUniforms,
    frames_presented: u64,
    frames_dropped: u64,
}

impl<D: RenderDevice> FrameRenderer<D> {
    /// Build the pipeline and depth-stencil state for the meshes in `scene`.
    ///
    /// Every object must share one vertex layout; it is checked against the
    /// vertex stage once, here.
    pub fn new(
        mut device: D,
        desc: &RendererDescriptor,
        scene: &Scene<D::Buffer>,
    ) -> Result<Self, RenderError> {
        let vertex_layout = scene
            .objects()
            .first()
            .map(|o| o.vertex_layout().clone())
            .unwrap_or_else(Vertex::layout);
        if let Some(object) = scene
            .objects()
            .iter()
            .find(|o| *o.vertex_layout() != vertex_layout)
        {
            return Err(RenderError::LayoutMismatch {
                object: object.name().to_string(),
            });
        }

        let depth_stencil = DepthStencilDescriptor::default();
        let pipeline = device.build_pipeline(&PipelineDescriptor {
            label: desc.label.clone(),
            vertex_entry: desc.vertex_entry.clone(),
            fragment_entry: desc.fragment_entry.clone(),
            color_format: desc.color_format,
            depth_format: desc.depth_format,
            vertex_layout,
            depth_stencil,
        })?;
        let depth_state = device.make_depth_stencil_state(&depth_stencil);
        device.set_clear_color(desc.clear_color);

        tracing::info!(
            "frame renderer ready: {:?} color, {:?} depth, {} objects",
            desc.color_format,
            desc.depth_format,
            scene.objects().len()
        );

        Ok(Self {
            device,
            pipeline,
            depth_state,
            state: FrameState::Idle,
            clock: FrameClock::new(),
            uniforms: FrameUniforms::default(),
            frames_presented: 0,
            frames_dropped: 0,
        })
    }

    /// Forward a drawable size change to the camera and the device.
    /// Zero-area sizes (a minimized window) are ignored.
    pub fn resize(&mut self, scene: &mut Scene<D::Buffer>, size: ViewportSize) {
        if size.is_empty() {
            tracing::debug!("ignoring empty resize {}x{}", size.width, size.height);
            return;
        }
        scene.resize(size);
        self.device.resize(size.width as u32, size.height as u32);
    }

    pub fn draw(&mut self, scene: &Scene<D::Buffer>) -> FrameOutcome {
        self.draw_at(scene, Instant::now())
    }

    /// Render one frame, taking `now` as the frame's wall-clock time.
    pub fn draw_at(&mut self, scene: &Scene<D::Buffer>, now: Instant) -> FrameOutcome {
        let Some(mut encoder) = self.device.begin_frame() else {
            self.frames_dropped += 1;
            tracing::debug!("no render target, dropping frame");
            return FrameOutcome::Dropped;
        };
        self.advance(FrameState::FrameAcquired);
        self.clock.tick(now);

        let camera = scene.camera();
        self.uniforms = FrameUniforms::new(camera.view_matrix(), camera.projection_matrix());
        let lights = scene.lighting().to_raw();
        let params = Params::new(camera.position(), lights.len() as u32);

        self.advance(FrameState::Recording);
        encoder.set_depth_stencil_state(&self.depth_state);
        encoder.set_pipeline(&self.pipeline);
        encoder.set_vertex_bytes(BindingSlot::FrameUniforms, bytemuck::bytes_of(&self.uniforms));
        encoder.set_fragment_bytes(BindingSlot::Lights, bytemuck::cast_slice(lights.as_slice()));

        for object in scene.objects() {
            object.emit_draw(&mut encoder, &params);
        }

        self.device.present(encoder);
        self.advance(FrameState::Submitted);
        self.frames_presented += 1;
        tracing::trace!(
            "frame {} submitted with {} objects",
            self.frames_presented,
            scene.objects().len()
        );
        self.advance(FrameState::Idle);
        FrameOutcome::Presented
    }

    fn advance(&mut self, next: FrameState) {
        debug_assert_eq!(self.state.successor(), next, "frame states out of order");
        self.state = next;
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Uniforms uploaded by the last presented frame.
    pub fn frame_uniforms(&self) -> &FrameUniforms {
        &self.uniforms
    }

    /// Wall-clock time between the last two presented frames.
    pub fn delta_time(&self) -> Duration {
        self.clock.delta()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
