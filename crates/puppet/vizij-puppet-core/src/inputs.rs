//! Input contracts: pointer samples and viewport geometry.
//!
//! Adapters translate DOM/windowing events into these values and pass them to
//! the session. Samples are consumed immediately and never stored.

use serde::{Deserialize, Serialize};

/// Pointer position in viewport (CSS) pixels, origin at the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Normalized device coordinates in [-1, 1], +y up. Used for hit testing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ndc {
    pub x: f32,
    pub y: f32,
}

/// Current viewport size in CSS pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or not a usable number.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Map a pixel sample into NDC for a picking ray. None for an empty viewport.
    pub fn to_ndc(&self, sample: PointerSample) -> Option<Ndc> {
        if self.is_empty() {
            return None;
        }
        Some(Ndc {
            x: 2.0 * (sample.x / self.width) - 1.0,
            y: 1.0 - 2.0 * (sample.y / self.height),
        })
    }

    /// Whether a canvas whose backing store is `canvas_px_width` x `canvas_px_height`
    /// device pixels must be resized to cover this viewport at `device_pixel_ratio`.
    pub fn needs_resize(
        &self,
        canvas_px_width: f32,
        canvas_px_height: f32,
        device_pixel_ratio: f32,
    ) -> bool {
        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        canvas_px_width / dpr != self.width || canvas_px_height / dpr != self.height
    }
}
