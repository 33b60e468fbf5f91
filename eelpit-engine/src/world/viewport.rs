// viewport.rs - Container extent as the host reports it

use crate::config::valid_extent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub w: f32,
    pub h: f32,
}

impl Viewport {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.w * 0.5, self.h * 0.5)
    }

    #[inline]
    pub fn short_side(&self) -> f32 {
        self.w.min(self.h)
    }

    /// Resize in place, ignoring nonsense sizes (a collapsed container
    /// mid-layout reports zero).
    pub fn resize(&mut self, w: f32, h: f32) -> bool {
        if !valid_extent(w) || !valid_extent(h) {
            return false;
        }
        self.w = w;
        self.h = h;
        true
    }
}
