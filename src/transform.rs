//! View transform snapshots shared between gestures, scales and rendering.

use serde::{Deserialize, Serialize};

/// Independent x/y pan and zoom applied on top of the base domain scales.
///
/// Owned exclusively by the gesture tracker; every other component receives
/// read-only copies through the update callback. A screen coordinate is
/// `base_pixel * k + t` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub kx: f64,
    pub ky: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self { x: 0.0, y: 0.0, kx: 1.0, ky: 1.0 }
    }

    pub fn apply_x(&self, base_px: f64) -> f64 {
        base_px * self.kx + self.x
    }

    pub fn apply_y(&self, base_px: f64) -> f64 {
        base_px * self.ky + self.y
    }

    /// Untransformed pixel for a transformed one, used by the rescale
    /// composition.
    pub fn invert_x(&self, screen_px: f64) -> f64 {
        (screen_px - self.x) / self.kx
    }

    pub fn invert_y(&self, screen_px: f64) -> f64 {
        (screen_px - self.y) / self.ky
    }
}

/// Per-axis zoom and pan bounds for the gesture tracker.
///
/// Scale extents are absolute; pan extents bound the translation of the
/// zoomed content (the negative side scales with the zoom factor, since the
/// content itself grows).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformExtent {
    pub kx: [f64; 2],
    pub ky: [f64; 2],
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for TransformExtent {
    fn default() -> Self {
        Self {
            kx: [f64::MIN_POSITIVE, f64::MAX],
            ky: [f64::MIN_POSITIVE, f64::MAX],
            x: [f64::NEG_INFINITY, f64::INFINITY],
            y: [f64::NEG_INFINITY, f64::INFINITY],
        }
    }
}

impl TransformExtent {
    /// Zoom extents per axis mode; the date domain is much wider than the
    /// day/percent domains so it gets more zoom headroom.
    pub fn for_axis_mode(date_mode: bool) -> Self {
        Self {
            kx: if date_mode { [0.67, 2000.0] } else { [0.67, 100.0] },
            ky: [1.0 / 1000.0, 5.0],
            ..Default::default()
        }
    }

    pub fn with_pan_bounds(mut self, x: [f64; 2], y: [f64; 2]) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}
