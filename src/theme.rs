use gpui::*;
use serde::{Deserialize, Serialize};

/// Colour theme of the sicklist chart.
#[derive(Clone, Debug)]
pub struct SicklistTheme {
    pub background: Rgba,
    /// Fill of rows with no colour encoding.
    pub row_default: Rgba,
    /// Fill of rows whose colour-key value is undefined.
    pub row_missing: Rgba,
    pub row_highlight: Rgba,
    pub axis_tick: Hsla,
    pub axis_label_size: Pixels,
    pub group_label: Hsla,
    pub label_text_dark: Hsla,
    pub label_text_light: Hsla,
    pub popup_backdrop: Hsla,
    pub popup_panel: Hsla,
    pub popup_text: Hsla,
}

impl Default for SicklistTheme {
    fn default() -> Self {
        Self {
            background: Rgba { r: 0.03, g: 0.03, b: 0.03, a: 1.0 },
            row_default: Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 },
            row_missing: Rgba { r: 0.2, g: 0.2, b: 0.2, a: 1.0 },
            row_highlight: Rgba { r: 0.0, g: 0.84, b: 0.67, a: 1.0 },
            axis_tick: gpui::white(),
            axis_label_size: px(11.0),
            group_label: gpui::white(),
            label_text_dark: gpui::black().opacity(0.8),
            label_text_light: gpui::white(),
            popup_backdrop: gpui::black().opacity(0.6),
            popup_panel: gpui::white().opacity(0.9),
            popup_text: gpui::black(),
        }
    }
}

/// Fixed layout metrics of the chart, owned by the chart instance rather
/// than floating as module globals.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ChartMetrics {
    /// Unzoomed height of one sicklist row in pixels.
    pub row_height: f32,
    /// Fraction of the row height left as inter-row gap.
    pub row_padding_ratio: f32,
    pub row_label_margin_left: f32,
    pub x_axis_margin_bottom: f32,
    pub y_axis_margin_left: f32,
    /// Vertical gap between groups, in index-space units.
    pub group_padding: f64,
    pub group_label_x_padding: f32,
    /// Row labels appear once the zoomed row height exceeds this.
    pub min_row_label_height: f32,
    /// Group labels hide below this pixel height.
    pub min_group_label_height: f32,
    /// Duration of the layout morph, seconds.
    pub morph_duration: f64,
    /// Duration of label fades, seconds.
    pub label_fade_duration: f64,
}

impl Default for ChartMetrics {
    fn default() -> Self {
        let row_height = 10.0;
        Self {
            row_height,
            row_padding_ratio: 0.25,
            row_label_margin_left: 10.0,
            x_axis_margin_bottom: 60.0,
            y_axis_margin_left: 5.0,
            group_padding: 500.0 / row_height as f64,
            group_label_x_padding: 15.0,
            min_row_label_height: 15.0,
            min_group_label_height: 8.0,
            morph_duration: 1.5,
            label_fade_duration: 0.75,
        }
    }
}

impl ChartMetrics {
    /// Complement of the padding ratio: the filled fraction of a row.
    pub fn row_fill_ratio(&self) -> f32 {
        1.0 - self.row_padding_ratio
    }
}
