use serde::{Deserialize, Serialize};

/// Size of the drawable the host is presenting into.
///
/// Stored as floats so that aspect computations match what the host reports,
/// including fractional sizes from scaled surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Build from a physical pixel size, as reported by a window or surface.
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Width divided by height. The caller guarantees `height > 0`.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// True when either dimension is zero, e.g. a minimized window.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_width_over_height() {
        let size = ViewportSize::new(1280.0, 720.0);
        assert_eq!(size.aspect(), 1280.0 / 720.0);
    }

    #[test]
    fn from_physical_converts() {
        let size = ViewportSize::from_physical(800, 600);
        assert_eq!(size, ViewportSize::new(800.0, 600.0));
    }

    #[test]
    fn zero_height_is_empty() {
        assert!(ViewportSize::new(100.0, 0.0).is_empty());
        assert!(!ViewportSize::default().is_empty());
    }
}
