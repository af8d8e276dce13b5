use crate::data_types::AxisMode;
use crate::overlay_labels::GroupLabel;
use crate::scales::ChartScale;
use crate::theme::SicklistTheme;
use crate::utils::PixelsExt;
use gpui::*;

pub struct AxisRenderer;

impl AxisRenderer {
    /// Paints the bottom x axis: full-height tick lines plus mode-formatted
    /// labels above the bottom margin. Works entirely off the effective
    /// (transform-composed) scale so ticks track the rectangles exactly.
    pub fn paint_x_axis(
        scale_t: &ChartScale,
        mode: AxisMode,
        theme: &SicklistTheme,
        margin_bottom: f32,
        bounds: Bounds<Pixels>,
        window: &mut Window,
        cx: &mut App,
    ) {
        let width = bounds.size.width.as_f32();
        let height = bounds.size.height.as_f32();

        // Dynamic tick density, wider slots for date labels.
        let label_size_est = match mode {
            AxisMode::Date => 120.0,
            _ => 70.0,
        };
        let count = ((width / label_size_est).floor() as usize).clamp(2, 10);
        let ticks = scale_t.ticks(count);

        let mut line_builder = PathBuilder::stroke(px(1.0));
        let mut has_lines = false;
        for tick in &ticks {
            let x = scale_t.map(*tick);
            if !(0.0..=width).contains(&x) {
                continue;
            }
            let x = bounds.origin.x.as_f32() + x;
            line_builder.move_to(point(px(x), bounds.origin.y));
            line_builder.line_to(point(px(x), bounds.origin.y + px(height)));
            has_lines = true;
        }
        if has_lines {
            if let Ok(path) = line_builder.build() {
                window.paint_path(path, theme.axis_tick.opacity(0.1));
            }
        }

        let font_size = theme.axis_label_size;
        let font = TextStyle::default().font();
        for tick in &ticks {
            let tick_px = scale_t.map(*tick);
            if !(0.0..=width).contains(&tick_px) {
                continue;
            }
            let text = scale_t.format_tick(*tick, mode);
            let run = TextRun {
                len: text.len(),
                font: font.clone(),
                color: theme.axis_tick,
                background_color: None,
                underline: None,
                strikethrough: None,
            };
            if let Ok(lines) =
                window
                    .text_system()
                    .shape_text(text.into(), font_size, &[run], None, None)
            {
                for line in lines {
                    let x_centered = px(tick_px) - line.width() / 2.0;
                    let y = px(height - margin_bottom + 10.0);
                    let origin = bounds.origin + point(x_centered, y);
                    let _ = line.paint(origin, font_size, TextAlign::Left, Some(bounds), window, cx);
                }
            }
        }
    }

    /// Paints the group (voyage) labels: one tick line spanning the group
    /// plus its name. Rotated labels fall back to clipped horizontal text.
    pub fn paint_group_labels(
        labels: &[GroupLabel],
        theme: &SicklistTheme,
        bounds: Bounds<Pixels>,
        window: &mut Window,
        cx: &mut App,
    ) {
        let font = TextStyle::default().font();

        for label in labels {
            if label.hidden {
                continue;
            }
            let origin_x = bounds.origin.x.as_f32() + label.origin.0;
            let origin_y = bounds.origin.y.as_f32() + label.origin.1;

            let mut line_builder = PathBuilder::stroke(px(1.0));
            line_builder.move_to(point(px(origin_x), px(origin_y)));
            line_builder.line_to(point(px(origin_x), px(origin_y + label.line_height)));
            if let Ok(path) = line_builder.build() {
                window.paint_path(path, theme.group_label);
            }

            let font_size = px(label.font_size);
            let run = TextRun {
                len: label.display.len(),
                font: font.clone(),
                color: theme.group_label,
                background_color: None,
                underline: None,
                strikethrough: None,
            };
            if let Ok(lines) = window.text_system().shape_text(
                label.display.clone().into(),
                font_size,
                &[run],
                None,
                None,
            ) {
                for line in lines {
                    // Text sits right-aligned against the tick line.
                    let origin = point(px(origin_x - 5.0) - line.width(), px(origin_y + 10.0));
                    let _ = line.paint(origin, font_size, TextAlign::Left, Some(bounds), window, cx);
                }
            }
        }
    }
}
