/// Momentum scrolling for the main track list.
///
/// Offsets are in the renderer's units (pixels, rows); the renderer reports
/// the content and viewport extents with [`ScrollState::set_bounds`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    offset: f32,
    velocity: f32,
    max_scroll: f32,
}
impl ScrollState {
    /// Velocity added per wheel notch.
    pub const WHEEL_IMPULSE: f32 = 25.0;
    /// Velocity retained each frame.
    pub const FRICTION: f32 = 0.92;
    /// Below this speed, scrolling comes to rest.
    pub const REST_THRESHOLD: f32 = 0.1;

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    /// The offset as a fraction of the scrollable range.
    pub fn fraction(&self) -> f32 {
        if self.max_scroll > 0.0 {
            self.offset / self.max_scroll
        } else {
            0.0
        }
    }

    pub fn set_bounds(&mut self, content_extent: f32, viewport_extent: f32) {
        self.max_scroll = (content_extent - viewport_extent).max(0.0);
        self.clamp();
    }

    /// Adds momentum for `notches` of wheel movement; positive scrolls down.
    pub fn wheel(&mut self, notches: f32) {
        self.velocity += notches * Self::WHEEL_IMPULSE;
    }

    /// Applies one frame of momentum.
    pub fn tick(&mut self) {
        if self.velocity.abs() <= Self::REST_THRESHOLD {
            self.velocity = 0.0;
            return;
        }
        self.offset += self.velocity;
        self.clamp();
        self.velocity *= Self::FRICTION;
    }

    /// Jumps to `fraction` of the scrollable range, stopping any momentum.
    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        self.offset = fraction.clamp(0.0, 1.0) * self.max_scroll;
        self.velocity = 0.0;
    }

    /// Scrolls the least amount needed to show `start..start + extent`.
    pub fn ensure_visible(&mut self, start: f32, extent: f32, viewport_extent: f32) {
        if start < self.offset {
            self.offset = start;
        } else if start + extent > self.offset + viewport_extent {
            self.offset = start + extent - viewport_extent;
        }
        self.velocity = 0.0;
        self.clamp();
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.velocity = 0.0;
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_scroll);
    }
}
