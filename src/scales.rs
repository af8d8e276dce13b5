use crate::data_types::AxisMode;
use crate::transform::ViewTransform;
use crate::utils::date_formatter;
use d3rs::scale::{LinearScale, Scale as D3Scale};

/// Monotonic domain -> pixel mapping used for geometry, ticks and labels.
///
/// All three axis modes (days, percent of voyage, calendar date) are linear;
/// the date mode runs over unix timestamps. Degenerate domains are widened
/// so the mapping stays invertible.
#[derive(Clone)]
pub struct ChartScale {
    scale: LinearScale,
}

impl ChartScale {
    pub fn new_linear(domain: (f64, f64), range: (f32, f32)) -> Self {
        let mut d_min = domain.0;
        let mut d_max = domain.1;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        let scale = LinearScale::new()
            .domain(d_min, d_max)
            .range(range.0 as f64, range.1 as f64);
        Self { scale }
    }

    pub fn map(&self, value: f64) -> f32 {
        let res = self.scale.scale(value) as f32;
        if res.is_nan() || res.is_infinite() {
            0.0
        } else {
            res
        }
    }

    pub fn invert(&self, pixel: f32) -> f64 {
        self.scale.invert(pixel as f64).unwrap_or(0.0)
    }

    pub fn range(&self) -> (f32, f32) {
        (D3Scale::range(&self.scale).0 as f32, D3Scale::range(&self.scale).1 as f32)
    }

    pub fn domain(&self) -> (f64, f64) {
        (D3Scale::domain(&self.scale).0, D3Scale::domain(&self.scale).1)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        self.scale.ticks(count)
    }

    pub fn update_domain(&mut self, min: f64, max: f64) {
        let mut d_min = min;
        let mut d_max = max;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        self.scale.domain(d_min, d_max);
    }

    pub fn update_range(&mut self, min: f32, max: f32) {
        self.scale.range(min as f64, max as f64);
    }

    /// Returns (m, c) such that pixel = value * m + c.
    pub fn get_linear_coeffs(&self) -> (f32, f32) {
        let (d_min, d_max) = self.domain();
        let (r_min, r_max) = self.range();

        let m = (r_max - r_min) as f64 / (d_max - d_min);
        let c = r_min as f64 - m * d_min;

        (m as f32, c as f32)
    }

    /// Composes this scale with the x part of a view transform.
    ///
    /// The returned scale keeps the same pixel range but maps the domain the
    /// transformed view exposes: range endpoints are pulled back through
    /// `(r - t) / k` and inverted through the untransformed scale. The
    /// result satisfies `effective.map(v) == base.map(v) * kx + x` and is
    /// handed identically to the renderer geometry and the tick/label paths.
    pub fn rescaled_x(&self, t: &ViewTransform) -> Self {
        self.rescaled(t.x, t.kx)
    }

    /// Composes this scale with the y part of a view transform.
    pub fn rescaled_y(&self, t: &ViewTransform) -> Self {
        self.rescaled(t.y, t.ky)
    }

    fn rescaled(&self, offset: f64, factor: f64) -> Self {
        let (r_min, r_max) = self.range();
        let d_min = self.invert(((r_min as f64 - offset) / factor) as f32);
        let d_max = self.invert(((r_max as f64 - offset) / factor) as f32);
        let mut out = self.clone();
        out.update_domain(d_min, d_max);
        out
    }

    /// Tick label per axis mode: `"{n} days"`, `"{n}%"`, or a calendar date.
    pub fn format_tick(&self, value: f64, mode: AxisMode) -> String {
        match mode {
            AxisMode::InDays => format!("{} days", format_number(value)),
            AxisMode::PercentVoyage => format!("{}%", format_number(value)),
            AxisMode::Date => {
                let (d_min, d_max) = self.domain();
                let fmt = date_formatter::determine_date_format((d_max - d_min).abs());
                date_formatter::format_timestamp(value, fmt)
            }
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else if value.abs() < 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.1}", value)
    }
}
