use landscape_common::ViewportSize;

use crate::camera::Camera;
use crate::lighting::Lighting;
use crate::object::SceneObject;

/// Camera, lighting and the ordered list of drawable objects.
#[derive(Debug)]
pub struct Scene<B> {
    camera: Camera,
    lighting: Lighting,
    objects: Vec<SceneObject<B>>,
}

impl<B> Scene<B> {
    pub fn new(camera: Camera, lighting: Lighting) -> Self {
        Self {
            camera,
            lighting,
            objects: Vec::new(),
        }
    }

    /// Append an object. Objects draw in insertion order.
    pub fn push_object(&mut self, object: SceneObject<B>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject<B>] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject<B>] {
        &mut self.objects
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject<B>>
    where
        B: Clone,
    {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = lighting;
    }

    /// Drawable size changed.
    pub fn resize(&mut self, size: ViewportSize) {
        tracing::debug!("scene resize to {}x{}", size.width, size.height);
        self.camera.resize(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ArcballCamera;
    use crate::object::Shape;
    use glam::{Mat4, Vec3};
    use landscape_gpu::{BufferId, RecordingDevice};

    fn ball(device: &RecordingDevice, name: &str) -> SceneObject<BufferId> {
        let shape = Shape::Sphere {
            radius: 1.0,
            center: Vec3::ZERO,
            segments: 4,
            rings: 3,
        };
        SceneObject::new(device, name, shape, Mat4::IDENTITY).unwrap()
    }

    #[test]
    fn objects_keep_insertion_order() {
        let device = RecordingDevice::new();
        let mut scene = Scene::new(Camera::default(), Lighting::default());
        for name in ["a", "b", "c"] {
            scene.push_object(ball(&device, name));
        }
        let names: Vec<&str> = scene.objects().iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(scene.object("b").is_some());
        assert!(scene.object("d").is_none());
    }

    #[test]
    fn resize_forwards_to_camera() {
        let mut scene: Scene<BufferId> =
            Scene::new(ArcballCamera::default().into(), Lighting::empty());
        scene.resize(ViewportSize::new(1920.0, 1080.0));
        assert_eq!(scene.camera().aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn lighting_can_be_replaced() {
        let mut scene: Scene<BufferId> = Scene::new(Camera::default(), Lighting::default());
        assert_eq!(scene.lighting().len(), 2);
        scene.set_lighting(Lighting::empty());
        assert!(scene.lighting().is_empty());
    }
}
