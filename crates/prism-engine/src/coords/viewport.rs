use winit::dpi::PhysicalSize;

/// Framebuffer size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or `None` for a degenerate (e.g. minimized) framebuffer.
    #[inline]
    pub fn aspect_ratio(self) -> Option<f32> {
        self.is_valid().then(|| self.width / self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_landscape() {
        assert_eq!(Viewport::new(640.0, 480.0).aspect_ratio(), Some(640.0 / 480.0));
    }

    #[test]
    fn aspect_of_square_is_one() {
        assert_eq!(Viewport::new(640.0, 640.0).aspect_ratio(), Some(1.0));
    }

    #[test]
    fn zero_height_has_no_aspect() {
        assert_eq!(Viewport::new(640.0, 0.0).aspect_ratio(), None);
        assert_eq!(Viewport::new(0.0, 0.0).aspect_ratio(), None);
    }

    #[test]
    fn from_physical_size() {
        let v = Viewport::from_physical(PhysicalSize::new(800, 600));
        assert_eq!(v, Viewport::new(800.0, 600.0));
    }
}
