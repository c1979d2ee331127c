use landscape_common::ViewportSize;
use landscape_gpu::RenderDevice;
use landscape_scene::Scene;

use crate::error::RenderError;
use crate::renderer::{FrameOutcome, FrameRenderer, RendererDescriptor};

/// What a host shell drives: a size change hook and one draw per refresh.
pub trait FrameDelegate {
    fn resize(&mut self, size: ViewportSize);

    fn draw(&mut self) -> FrameOutcome;
}

/// A scene together with the renderer that draws it.
pub struct SceneRenderer<D: RenderDevice> {
    renderer: FrameRenderer<D>,
    scene: Scene<D::Buffer>,
}

impl<D: RenderDevice> SceneRenderer<D> {
    pub fn new(
        device: D,
        desc: &RendererDescriptor,
        scene: Scene<D::Buffer>,
    ) -> Result<Self, RenderError> {
        let renderer = FrameRenderer::new(device, desc, &scene)?;
        Ok(Self { renderer, scene })
    }

    pub fn scene(&self) -> &Scene<D::Buffer> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<D::Buffer> {
        &mut self.scene
    }

    pub fn renderer(&self) -> &FrameRenderer<D> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut FrameRenderer<D> {
        &mut self.renderer
    }
}

impl<D: RenderDevice> FrameDelegate for SceneRenderer<D> {
    fn resize(&mut self, size: ViewportSize) {
        self.renderer.resize(&mut self.scene, size);
    }

    fn draw(&mut self) -> FrameOutcome {
        self.renderer.draw(&self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landscape_gpu::RecordingDevice;
    use landscape_scene::SceneConfig;

    fn host_loop(delegate: &mut dyn FrameDelegate, ticks: usize) -> Vec<FrameOutcome> {
        delegate.resize(ViewportSize::new(1280.0, 720.0));
        (0..ticks).map(|_| delegate.draw()).collect()
    }

    #[test]
    fn host_drives_resize_and_draw() {
        let device = RecordingDevice::new();
        let scene = SceneConfig::default().build(&device).unwrap();
        let mut delegate =
            SceneRenderer::new(device, &RendererDescriptor::default(), scene).unwrap();

        let outcomes = host_loop(&mut delegate, 3);
        assert_eq!(outcomes, vec![FrameOutcome::Presented; 3]);
        assert_eq!(delegate.renderer().device().frames().len(), 3);
        assert_eq!(delegate.scene().camera().aspect(), 1280.0 / 720.0);
    }

    #[test]
    fn dropped_frames_surface_as_outcomes() {
        let device = RecordingDevice::new();
        let scene = SceneConfig::default().build(&device).unwrap();
        let mut delegate =
            SceneRenderer::new(device, &RendererDescriptor::default(), scene).unwrap();
        delegate.renderer_mut().device_mut().drop_next_frames(1);

        let outcomes = host_loop(&mut delegate, 2);
        assert_eq!(outcomes, vec![FrameOutcome::Dropped, FrameOutcome::Presented]);
    }
}
