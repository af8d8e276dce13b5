use crate::transform::{TransformExtent, ViewTransform};

/// ViewController holds the business logic of the pan/zoom interactions
/// independently of pointer bookkeeping and of the GPUI infrastructure, to
/// facilitate testing.
pub struct ViewController;

impl ViewController {
    /// Pseudo-distance baseline for wheel zooms: a wheel tick behaves like a
    /// pinch whose fingers start this far apart.
    pub const WHEEL_BASELINE: f64 = 100.0;
    /// Wheel delta divisor converting deltaY into a pseudo-distance change.
    pub const WHEEL_DIVISOR: f64 = 20.0;
    /// Inter-pointer distances are floored here to avoid near-zero ratios.
    pub const MIN_PINCH_DISTANCE: f64 = 50.0;

    /// Applies a two-axis zoom step around a centroid point.
    ///
    /// `x0`/`y0` are the previous inter-pointer distances, `dx`/`dy` the
    /// distance changes. When the scale clamps at an extent the effective
    /// ratio is recomputed as `clamped / old` so the translation stays
    /// consistent with the clamped scale instead of jumping at the boundary.
    pub fn zoom(
        t: &mut ViewTransform,
        extent: &TransformExtent,
        x0: f64,
        y0: f64,
        dx: f64,
        dy: f64,
        x_cent: f64,
        y_cent: f64,
    ) {
        let dkx = 1.0 + dx / x0;
        let dky = 1.0 + dy / y0;

        let (kx, eff_x) = Self::clamp_scale(t.kx, dkx, extent.kx);
        t.kx = kx;
        t.x = x_cent - (x_cent - t.x) * eff_x;

        let (ky, eff_y) = Self::clamp_scale(t.ky, dky, extent.ky);
        t.ky = ky;
        t.y = y_cent - (y_cent - t.y) * eff_y;

        Self::clamp_translation(t, extent);
    }

    /// Applies a pan step in screen pixels.
    pub fn pan(t: &mut ViewTransform, extent: &TransformExtent, dx: f64, dy: f64) {
        t.x += dx;
        t.y += dy;
        Self::clamp_translation(t, extent);
    }

    /// Uniform wheel zoom around the cursor point, routed through the same
    /// clamped formula as a pinch.
    pub fn wheel_zoom(
        t: &mut ViewTransform,
        extent: &TransformExtent,
        delta_y: f64,
        x: f64,
        y: f64,
    ) {
        let pseudo_delta = -delta_y / Self::WHEEL_DIVISOR;
        Self::zoom(
            t,
            extent,
            Self::WHEEL_BASELINE,
            Self::WHEEL_BASELINE,
            pseudo_delta,
            pseudo_delta,
            x,
            y,
        );
    }

    /// Clamped scale step: returns the new scale and the ratio that was
    /// actually applied.
    fn clamp_scale(old: f64, ratio: f64, bounds: [f64; 2]) -> (f64, f64) {
        let new = old * ratio;
        if new < bounds[0] {
            (bounds[0], bounds[0] / old)
        } else if new > bounds[1] {
            (bounds[1], bounds[1] / old)
        } else {
            (new, ratio)
        }
    }

    /// Keeps the translation inside the pan extent. The negative side bounds
    /// how far the content start may move off-screen and therefore scales
    /// with the zoom factor; the positive side is a fixed screen-space limit.
    pub fn clamp_translation(t: &mut ViewTransform, extent: &TransformExtent) {
        let x_min = extent.x[0] * t.kx.max(1.0);
        if t.x < x_min {
            t.x = x_min;
        } else if t.x > extent.x[1] {
            t.x = extent.x[1];
        }

        let y_min = extent.y[0] * t.ky.max(1.0);
        if t.y < y_min {
            t.y = y_min;
        } else if t.y > extent.y[1] {
            t.y = extent.y[1];
        }
    }
}
