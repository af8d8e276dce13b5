//! Batched rectangle renderer.
//!
//! One attribute entry per record, double-buffered (primary/secondary
//! intervals) so a transition can morph the whole batch between two layouts
//! with a single pair of blend uniforms. The geometry kernel runs per record
//! at paint time and emits GPU-ready quads; gpui's quad pipeline instances
//! the whole batch in one draw.

use crate::data_types::{RecordField, RenderStates, SickRecord, Slot};
use crate::scales::ChartScale;
use crate::theme::ChartMetrics;
use crate::transform::ViewTransform;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Per-record attribute set. `x`/`x_secondary` are pixel intervals from the
/// base x scale; `index`/`index_secondary` are row indices expanded into y
/// intervals by the kernel.
#[derive(Clone, Copy, Debug, Default)]
pub struct RectAttributes {
    pub x: [f32; 2],
    pub x_secondary: [f32; 2],
    pub index: f32,
    pub index_secondary: f32,
    pub colour: [f32; 4],
    pub opacity: f32,
    pub animation_index: f32,
}

/// Batch-global uniforms.
#[derive(Clone, Copy, Debug)]
pub struct RectUniforms {
    pub pan: Vec2,
    pub zoom: Vec2,
    /// Blend factors between the primary and secondary intervals, in [0, 1].
    pub tx: f32,
    pub ty: f32,
    /// How much the stagger spreads across records: 0 morphs everything in
    /// lockstep, 1 lets the last record start when the first one finishes.
    pub skewing: f32,
    pub pixel_ratio: f32,
    pub row_height: f32,
    /// Filled fraction of a row (1 - padding ratio), tightened as the y zoom
    /// drops below 1.
    pub row_fill: f32,
    /// Padding ratio kept for the opacity shaping term.
    pub padding_ratio: f32,
    pub min_opacity: f32,
    pub animation_max_index: f32,
}

impl RectUniforms {
    pub fn new(metrics: &ChartMetrics, pixel_ratio: f32) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: Vec2::ONE,
            tx: 0.0,
            ty: 0.0,
            skewing: 1.0,
            pixel_ratio,
            row_height: metrics.row_height,
            row_fill: metrics.row_fill_ratio(),
            padding_ratio: metrics.row_padding_ratio,
            min_opacity: 0.0,
            animation_max_index: 1.0,
        }
    }
}

/// Shaded output of one record: a screen-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectQuad {
    pub x: Vec2,
    pub y: Vec2,
    pub colour: [f32; 4],
}

/// GPU-uploadable vertex; the batch expands to two filled triangles (six
/// vertices) per rectangle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct RectVertex {
    pub position: [f32; 2],
    pub colour: [f32; 4],
}

pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quintic ease-in-out driving the morph.
pub fn quintic_ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        16.0 * t * t * t * t * t
    } else {
        let t = t - 1.0;
        1.0 + 16.0 * t * t * t * t * t
    }
}

fn mix(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

pub struct RectangleBatch {
    attributes: Vec<RectAttributes>,
    pub uniforms: RectUniforms,
    base_row_fill: f32,
}

impl RectangleBatch {
    pub fn new(record_count: usize, metrics: &ChartMetrics, pixel_ratio: f32) -> Self {
        let uniforms = RectUniforms::new(metrics, pixel_ratio);
        Self {
            attributes: vec![RectAttributes::default(); record_count],
            base_row_fill: uniforms.row_fill,
            uniforms,
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self, i: usize) -> &RectAttributes {
        &self.attributes[i]
    }

    /// Loads one slot of x intervals through the base (untransformed) scale.
    pub fn set_x_points(
        &mut self,
        records: &[SickRecord],
        scale: &ChartScale,
        x_start: RecordField,
        x_end: RecordField,
        slot: Slot,
    ) {
        for (attrs, r) in self.attributes.iter_mut().zip(records) {
            let x0 = scale.map(x_start.numeric(r).unwrap_or(f64::NAN));
            let x1 = scale.map(x_end.numeric(r).unwrap_or(f64::NAN));
            match slot {
                Slot::Primary => attrs.x = [x0, x1],
                Slot::Secondary => attrs.x_secondary = [x0, x1],
            }
        }
    }

    /// Loads one slot of row indices from the layout engine's output.
    pub fn set_y_points(&mut self, states: &RenderStates, slot: Slot) {
        for (i, attrs) in self.attributes.iter_mut().enumerate() {
            match slot {
                Slot::Primary => attrs.index = states.get(i).index as f32,
                Slot::Secondary => attrs.index_secondary = states.get(i).index_secondary as f32,
            }
        }
    }

    /// Refreshes colour and opacity from the render states.
    pub fn set_colours(&mut self, states: &RenderStates) {
        for (i, attrs) in self.attributes.iter_mut().enumerate() {
            let s = states.get(i);
            attrs.colour = s.colour;
            attrs.opacity = s.opacity;
        }
    }

    /// Refreshes opacity only, for hover highlighting and filtering.
    pub fn set_opacities(&mut self, states: &RenderStates) {
        for (i, attrs) in self.attributes.iter_mut().enumerate() {
            attrs.opacity = states.get(i).opacity;
        }
    }

    /// Refreshes the stagger ranks and their shared denominator.
    pub fn set_animation_indices(&mut self, states: &RenderStates) {
        for (i, attrs) in self.attributes.iter_mut().enumerate() {
            attrs.animation_index = states.get(i).animation_index;
        }
        self.uniforms.animation_max_index = states.animation_max.max(1.0);
    }

    /// Applies a transform snapshot to the pan/zoom uniforms. Shrinking the
    /// y zoom below 1 tightens the inter-row gap so rows do not dissolve
    /// into stripes of background.
    pub fn update_pan_zoom(&mut self, t: &ViewTransform) {
        self.uniforms.pan = Vec2::new(t.x as f32, t.y as f32);
        self.uniforms.zoom = Vec2::new(t.kx as f32, t.ky as f32);
        if t.ky < 1.0 {
            self.uniforms.row_fill = 1.0 - self.uniforms.padding_ratio * t.ky as f32;
        } else {
            self.uniforms.row_fill = self.base_row_fill;
        }
    }

    pub fn set_blend(&mut self, tx: f32, ty: f32) {
        self.uniforms.tx = clamp01(tx);
        self.uniforms.ty = clamp01(ty);
    }

    pub fn set_min_opacity(&mut self, min_opacity: f32) {
        self.uniforms.min_opacity = clamp01(min_opacity);
    }

    pub fn set_skewing(&mut self, skewing: f32) {
        self.uniforms.skewing = skewing;
    }

    /// The geometry kernel: morph blend, pan/zoom, degenerate-row and
    /// minimum-width rules, opacity shaping. Returns `None` for records that
    /// would be fully transparent.
    pub fn shade(&self, i: usize) -> Option<RectQuad> {
        let a = &self.attributes[i];
        let u = &self.uniforms;

        let stagger = u.skewing * a.animation_index / u.animation_max_index;
        let ex = quintic_ease_in_out(clamp01(u.tx * 2.0 - stagger));
        let ey = quintic_ease_in_out(clamp01(u.ty * 2.0 - stagger));

        let x = mix(Vec2::from(a.x), Vec2::from(a.x_secondary), ex);
        let y_of = |index: f32| {
            Vec2::new(
                index * u.row_height,
                (index + u.row_fill) * u.row_height,
            )
        };
        let y = mix(y_of(a.index), y_of(a.index_secondary), ey);

        // Zoom + pan
        let mut x = x * u.zoom.x + Vec2::splat(u.pan.x);
        let mut y = y * u.zoom.y + Vec2::splat(u.pan.y);

        // Fade rows out as they shrink, down to the configured floor.
        let alpha = clamp01((u.pixel_ratio * (y.y - y.x) + u.padding_ratio).max(u.min_opacity))
            * a.opacity;
        if alpha <= 0.0 {
            return None;
        }

        // Sub-device-pixel rows clamp to exactly one device pixel so
        // zero-length intervals stay visible.
        if y.y - y.x + u.padding_ratio / u.pixel_ratio < 1.0 / u.pixel_ratio {
            y = Vec2::new(y.x, y.x + 1.0 / u.pixel_ratio);
        }

        // Minimum width: never narrower than the current row height.
        if x.y - x.x < y.y - y.x {
            x = Vec2::new(x.x, x.x + (y.y - y.x));
        }

        Some(RectQuad {
            x,
            y,
            colour: [a.colour[0], a.colour[1], a.colour[2], alpha],
        })
    }

    pub fn quads(&self) -> impl Iterator<Item = RectQuad> + '_ {
        (0..self.attributes.len()).filter_map(|i| self.shade(i))
    }

    /// Expands the shaded batch into a vertex buffer, two CCW triangles per
    /// rectangle, ready for GPU upload.
    pub fn vertices(&self, out: &mut Vec<RectVertex>) {
        out.clear();
        for quad in self.quads() {
            let c = quad.colour;
            let (x0, x1) = (quad.x.x, quad.x.y);
            let (y0, y1) = (quad.y.x, quad.y.y);
            out.extend_from_slice(&[
                RectVertex { position: [x0, y0], colour: c },
                RectVertex { position: [x1, y0], colour: c },
                RectVertex { position: [x1, y1], colour: c },
                RectVertex { position: [x0, y0], colour: c },
                RectVertex { position: [x0, y1], colour: c },
                RectVertex { position: [x1, y1], colour: c },
            ]);
        }
    }
}
