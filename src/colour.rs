//! Colour encoding of the rectangle batch.

use crate::data_types::{RecordField, RenderStates, SickRecord};
use crate::theme::SicklistTheme;
use serde::{Deserialize, Serialize};

/// Sequential colour ramps, sampled as piecewise-linear interpolations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColourScheme {
    #[default]
    Reds,
    Blues,
    Greens,
    Greys,
    Viridis,
}

impl ColourScheme {
    /// Samples the ramp at `t` in [0, 1].
    pub fn interpolate(&self, t: f64) -> [f32; 4] {
        let stops: &[[f32; 3]] = match self {
            ColourScheme::Reds => &[
                [1.0, 0.96, 0.94],
                [0.99, 0.73, 0.63],
                [0.98, 0.42, 0.29],
                [0.80, 0.09, 0.11],
                [0.40, 0.0, 0.05],
            ],
            ColourScheme::Blues => &[
                [0.97, 0.98, 1.0],
                [0.78, 0.86, 0.94],
                [0.42, 0.68, 0.84],
                [0.13, 0.44, 0.71],
                [0.03, 0.19, 0.42],
            ],
            ColourScheme::Greens => &[
                [0.97, 0.99, 0.96],
                [0.78, 0.91, 0.75],
                [0.45, 0.77, 0.46],
                [0.14, 0.55, 0.27],
                [0.0, 0.27, 0.11],
            ],
            ColourScheme::Greys => &[
                [1.0, 1.0, 1.0],
                [0.74, 0.74, 0.74],
                [0.45, 0.45, 0.45],
                [0.15, 0.15, 0.15],
                [0.0, 0.0, 0.0],
            ],
            ColourScheme::Viridis => &[
                [0.267, 0.005, 0.329],
                [0.254, 0.265, 0.530],
                [0.164, 0.471, 0.558],
                [0.135, 0.659, 0.518],
                [0.478, 0.821, 0.318],
                [0.993, 0.906, 0.144],
            ],
        };

        let t = t.clamp(0.0, 1.0) as f32;
        let segments = (stops.len() - 1) as f32;
        let scaled = t * segments;
        let i = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - i as f32;

        let a = stops[i];
        let b = stops[i + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
            1.0,
        ]
    }
}

/// Normalization over a min/max pair: maps min -> 0 and max -> 1.
pub fn normalise(min: f64, max: f64) -> impl Fn(f64) -> f64 {
    let a = if (max - min).abs() < f64::EPSILON {
        0.0
    } else {
        1.0 / (max - min)
    };
    move |val| a * val - a * min
}

pub struct ColourEncoder;

impl ColourEncoder {
    /// Recolours the batch from the colour key.
    ///
    /// Normalization runs over the FULL record set so filtered views keep
    /// their colours comparable; records without a defined value paint in
    /// the missing colour. All records start at opacity 0, visible ones at
    /// 1, so filtered-out rows vanish from the draw without re-uploading
    /// geometry.
    pub fn apply(
        records: &[SickRecord],
        visible: &[usize],
        states: &mut RenderStates,
        key: Option<RecordField>,
        scheme: ColourScheme,
        invert: bool,
        theme: &SicklistTheme,
    ) {
        match key {
            None => {
                let default = theme.row_default;
                for &pos in visible {
                    states.get_mut(pos).colour = [default.r, default.g, default.b, default.a];
                }
            }
            Some(field) => {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for r in records {
                    if let Some(v) = field.numeric(r) {
                        min = min.min(v);
                        max = max.max(v);
                    }
                }
                if min > max {
                    min = 0.0;
                    max = 1.0;
                }
                let norm = normalise(min, max);
                let missing = theme.row_missing;

                for &pos in visible {
                    let state = states.get_mut(pos);
                    state.colour = match field.numeric(&records[pos]) {
                        Some(v) => {
                            let t = if invert { 1.0 - norm(v) } else { norm(v) };
                            scheme.interpolate(t)
                        }
                        None => [missing.r, missing.g, missing.b, missing.a],
                    };
                }
            }
        }

        for state in states.iter_mut() {
            state.opacity = 0.0;
        }
        for &pos in visible {
            states.get_mut(pos).opacity = 1.0;
        }
    }
}
