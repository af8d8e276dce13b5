// SicklistView implementation: GPUI glue around the chart model.

use crate::axis_renderer::AxisRenderer;
use crate::chart::Chart;
use crate::data_types::state::FieldChoice;
use crate::data_types::{AxisMode, RecordField, SharedChartState};
use crate::gesture_tracker::{GestureTracker, PointerInput};
use crate::overlay_labels::{DetailPopup, RowLabel};
use crate::transform::ViewTransform;
use crate::utils::PixelsExt;
use gpui::prelude::*;
use gpui::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::info;

actions!(sicklist_chart, [ResetView]);

/// Pointer id used for the mouse; touch pointers carry their platform ids.
const MOUSE_POINTER: u64 = 0;

const POPUP_WIDTH: f32 = 400.0;
const POPUP_HEIGHT: f32 = 600.0;
const POPUP_PADDING: f32 = 15.0;

pub fn init(_cx: &mut impl AppContext) {
    // Initialization code if needed
}

/// The main view: owns the gesture tracker, forwards raw input into it and
/// repaints from the chart model's state.
pub struct SicklistView {
    pub chart: Entity<Chart>,
    pub shared_state: Entity<SharedChartState>,

    tracker: Rc<RefCell<GestureTracker>>,
    /// Transform snapshots the tracker callback parked for the next flush.
    pending_transform: Rc<Cell<Option<ViewTransform>>>,

    bounds: Rc<RefCell<Bounds<Pixels>>>,
    focus_handle: FocusHandle,
}

impl SicklistView {
    pub fn new(
        chart: Entity<Chart>,
        shared_state: Entity<SharedChartState>,
        cx: &mut Context<Self>,
    ) -> Self {
        cx.observe(&chart, |_, _, cx| cx.notify()).detach();
        cx.observe(&shared_state, |_, _, cx| cx.notify()).detach();

        let pending_transform: Rc<Cell<Option<ViewTransform>>> = Rc::new(Cell::new(None));
        let pending = pending_transform.clone();
        let extent = chart.read(cx).make_gesture_extent();
        let tracker = GestureTracker::new(ViewTransform::identity(), extent, move |t| {
            pending.set(Some(t));
        });

        info!("sicklist view created");

        Self {
            chart,
            shared_state,
            tracker: Rc::new(RefCell::new(tracker)),
            pending_transform,
            bounds: Rc::new(RefCell::new(Bounds::default())),
            focus_handle: cx.focus_handle(),
        }
    }

    fn local_point(&self, position: Point<Pixels>) -> (f64, f64) {
        let bounds = *self.bounds.borrow();
        (
            (position.x - bounds.origin.x).as_f32() as f64,
            (position.y - bounds.origin.y).as_f32() as f64,
        )
    }

    /// Forwards the latest tracker snapshot into the chart. The tracker's
    /// callback is the sole transform integration point; this just bridges
    /// it into the entity system.
    fn flush_transform(&mut self, cx: &mut Context<Self>) {
        if let Some(t) = self.pending_transform.take() {
            self.chart.update(cx, |c, _| c.on_pan_or_zoom(t));
            self.notify_if_dirty(cx);
        }
    }

    /// Consumes the chart's coalesced render request: many mutations between
    /// frames collapse into one notify and thus one repaint.
    fn notify_if_dirty(&mut self, cx: &mut Context<Self>) {
        if self.chart.update(cx, |c, _| c.take_render_request()) {
            cx.notify();
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn handle_mouse_down(
        &mut self,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        window.focus(&self.focus_handle);
        let (x, y) = self.local_point(event.position);
        self.tracker
            .borrow_mut()
            .pointer_down(PointerInput { id: MOUSE_POINTER, x, y });
        self.shared_state.update(cx, |s, _| s.is_dragging = true);
    }

    fn handle_mouse_move(
        &mut self,
        event: &MouseMoveEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.shared_state
            .update(cx, |s, _| s.mouse_pos = Some(event.position));
        if event.pressed_button == Some(MouseButton::Left) {
            let (x, y) = self.local_point(event.position);
            self.tracker
                .borrow_mut()
                .pointer_move(PointerInput { id: MOUSE_POINTER, x, y });
            self.flush_transform(cx);
        }
    }

    fn handle_mouse_up(
        &mut self,
        _event: &MouseUpEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.tracker.borrow_mut().pointer_up(MOUSE_POINTER);
        self.shared_state.update(cx, |s, _| s.is_dragging = false);
    }

    fn handle_scroll_wheel(
        &mut self,
        event: &ScrollWheelEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let delta_y = match event.delta {
            ScrollDelta::Pixels(p) => p.y.as_f32(),
            ScrollDelta::Lines(p) => p.y * 20.0,
        };
        let (x, y) = self.local_point(event.position);
        // gpui's scroll sign is inverted relative to DOM wheel deltas.
        self.tracker.borrow_mut().wheel(-delta_y as f64, x, y);
        self.flush_transform(cx);
    }

    fn reset_view(&mut self, _: &ResetView, _window: &mut Window, cx: &mut Context<Self>) {
        self.tracker
            .borrow_mut()
            .set_transform(ViewTransform::identity());
        self.chart
            .update(cx, |c, _| c.on_pan_or_zoom(ViewTransform::identity()));
        self.notify_if_dirty(cx);
    }

    // ------------------------------------------------------------------
    // Control operations
    // ------------------------------------------------------------------

    pub fn set_sort_key(
        &mut self,
        choice: FieldChoice,
        invert: bool,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.chart.update(cx, |c, _| c.set_sort_key(choice, invert));
        self.after_control_change(window, cx);
    }

    pub fn set_group_key(
        &mut self,
        group: Option<RecordField>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.chart.update(cx, |c, _| c.set_group_key(group));
        self.after_control_change(window, cx);
    }

    pub fn set_axis_mode(
        &mut self,
        mode: AxisMode,
        sort: FieldChoice,
        colour: Option<FieldChoice>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.chart
            .update(cx, |c, _| c.set_axis_mode(mode, sort, colour));
        self.after_control_change(window, cx);
    }

    pub fn set_colour(
        &mut self,
        key: Option<RecordField>,
        scheme: crate::colour::ColourScheme,
        invert: bool,
        cx: &mut Context<Self>,
    ) {
        self.chart.update(cx, |c, _| c.set_colour(key, scheme, invert));
        self.notify_if_dirty(cx);
    }

    pub fn set_min_opacity(&mut self, min_opacity: f32, cx: &mut Context<Self>) {
        self.chart.update(cx, |c, _| c.set_min_opacity(min_opacity));
        self.notify_if_dirty(cx);
    }

    pub fn set_animation(
        &mut self,
        key: Option<RecordField>,
        invert: bool,
        cx: &mut Context<Self>,
    ) {
        self.chart.update(cx, |c, _| c.set_animation(key, invert));
        self.notify_if_dirty(cx);
    }

    pub fn apply_filter(
        &mut self,
        field: RecordField,
        key: String,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.chart.update(cx, |c, _| c.apply_filter(field, &key));
        self.after_control_change(window, cx);
    }

    pub fn clear_filters(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.chart.update(cx, |c, _| c.clear_filters());
        self.after_control_change(window, cx);
    }

    fn after_control_change(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let extent = self.chart.read(cx).make_gesture_extent();
        self.tracker.borrow_mut().set_extent(extent);
        self.notify_if_dirty(cx);
        self.drive_transitions(window, cx);
    }

    /// Frame chain driving the transition scheduler: tick, repaint if
    /// dirty, reschedule while anything is still running.
    fn drive_transitions(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let (active, dirty) = self
            .chart
            .update(cx, |c, _| (c.tick_transitions(), c.take_render_request()));
        if dirty {
            cx.notify();
        }
        if active {
            cx.on_next_frame(window, |this, window, cx| {
                this.drive_transitions(window, cx);
            });
        }
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    fn paint_canvas(
        chart: Entity<Chart>,
        shared_state: Entity<SharedChartState>,
        bounds: Bounds<Pixels>,
        window: &mut Window,
        cx: &mut App,
    ) {
        let start = std::time::Instant::now();

        let (quads, group_labels, axis_scale_t, axis_mode, theme, margin_bottom) =
            chart.update(cx, |c, _| {
                c.take_render_request();
                (
                    c.rectangles.quads().collect::<Vec<_>>(),
                    c.group_labels.labels().to_vec(),
                    c.x_axis_scale_t.clone(),
                    c.layout.axis_mode,
                    c.theme.clone(),
                    c.metrics.x_axis_margin_bottom,
                )
            });

        // Clear to the background colour, then one batched pass of quads.
        window.paint_quad(fill(bounds, theme.background));
        let origin = bounds.origin;
        for quad in &quads {
            let w = (quad.x.y - quad.x.x).max(0.0);
            let h = (quad.y.y - quad.y.x).max(0.0);
            if w <= 0.0 || h <= 0.0 {
                continue;
            }
            let rect = Bounds::new(
                Point::new(origin.x + px(quad.x.x), origin.y + px(quad.y.x)),
                Size::new(px(w), px(h)),
            );
            let colour = Rgba {
                r: quad.colour[0],
                g: quad.colour[1],
                b: quad.colour[2],
                a: quad.colour[3],
            };
            window.paint_quad(fill(rect, colour));
        }

        AxisRenderer::paint_x_axis(
            &axis_scale_t,
            axis_mode,
            &theme,
            margin_bottom,
            bounds,
            window,
            cx,
        );
        AxisRenderer::paint_group_labels(&group_labels, &theme, bounds, window, cx);

        let nanos = start.elapsed().as_nanos() as u64;
        *shared_state.read(cx).paint_nanos.write() = nanos;
    }

    fn render_row_label(&self, label: &RowLabel, cx: &mut Context<Self>) -> Stateful<Div> {
        let pos = label.record;
        let colour = Rgba {
            r: label.colour[0],
            g: label.colour[1],
            b: label.colour[2],
            a: 0.5,
        };
        let text_color = if label.dark_text {
            self.chart.read(cx).theme.label_text_dark
        } else {
            self.chart.read(cx).theme.label_text_light
        };

        div()
            .id(SharedString::from(format!("row-label-{}", pos)))
            .absolute()
            .left(px(label.origin.0))
            .top(px(label.origin.1))
            .w(px(label.rect_width))
            .h(px(label.rect_height))
            .overflow_hidden()
            .flex()
            .items_center()
            .when(label.pointer_enabled, |d| {
                d.cursor_pointer()
                    .hover(|s| s.w_auto().bg(colour))
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |this, _: &MouseDownEvent, _window, cx| {
                            this.chart.update(cx, |c, _| c.open_popup(pos));
                            cx.notify();
                        }),
                    )
            })
            .child(
                div()
                    .ml(px(self.chart.read(cx).metrics.row_label_margin_left))
                    .text_size(px(label.font_size.max(1.0)))
                    .text_color(text_color)
                    .when(label.died, |d| d.font_weight(FontWeight::EXTRA_BOLD))
                    .opacity(label.opacity)
                    .child(label.text.clone()),
            )
    }

    fn render_popup(&self, popup: &DetailPopup, cx: &mut Context<Self>) -> Vec<AnyElement> {
        let theme = self.chart.read(cx).theme.clone();
        let bounds = *self.bounds.borrow();
        let (w, h) = (
            bounds.size.width.as_f32().max(POPUP_WIDTH),
            bounds.size.height.as_f32().max(POPUP_HEIGHT),
        );

        let backdrop = div()
            .id("row-popup-backdrop")
            .absolute()
            .top_0()
            .left_0()
            .size_full()
            .bg(theme.popup_backdrop)
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _: &MouseDownEvent, _window, cx| {
                    cx.stop_propagation();
                    this.chart.update(cx, |c, _| c.close_popup());
                    cx.notify();
                }),
            )
            .into_any_element();

        let mut panel = div()
            .id("row-popup")
            .absolute()
            .left(px((w - POPUP_WIDTH) / 2.0))
            .top(px((h - POPUP_HEIGHT) / 2.0))
            .w(px(POPUP_WIDTH))
            .h(px(POPUP_HEIGHT))
            .p(px(POPUP_PADDING))
            .bg(theme.popup_panel)
            .text_color(theme.popup_text)
            .flex()
            .flex_col()
            .gap_1()
            .overflow_hidden()
            .child(
                div()
                    .text_size(px(18.0))
                    .font_weight(FontWeight::BOLD)
                    .child(popup.title.clone()),
            )
            .child(div().text_size(px(13.0)).child(popup.subtitle.clone()));

        for (key, value) in &popup.fields {
            panel = panel.child(
                div()
                    .flex()
                    .flex_row()
                    .gap_2()
                    .child(
                        div()
                            .w(px(120.0))
                            .text_size(px(11.0))
                            .font_weight(FontWeight::SEMIBOLD)
                            .child(key.clone()),
                    )
                    .child(div().text_size(px(11.0)).child(value.clone())),
            );
        }

        panel = panel.child(
            div()
                .mt_auto()
                .text_size(px(10.0))
                .opacity(0.6)
                .child(popup.identifier.clone()),
        );

        vec![backdrop, panel.into_any_element()]
    }
}

impl Focusable for SicklistView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for SicklistView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let chart = self.chart.clone();
        let shared_state = self.shared_state.clone();
        let bounds_rc = self.bounds.clone();
        let theme = chart.read(cx).theme.clone();
        let row_labels: Vec<RowLabel> = chart.read(cx).row_labels.labels().cloned().collect();
        let popup = chart.read(cx).popup.clone();

        let mut root = div()
            .id("sicklist-chart")
            .key_context("SicklistChart")
            .track_focus(&self.focus_handle)
            .relative()
            .size_full()
            .bg(theme.background)
            .on_action(cx.listener(Self::reset_view))
            .on_mouse_down(MouseButton::Left, cx.listener(Self::handle_mouse_down))
            .on_mouse_move(cx.listener(Self::handle_mouse_move))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::handle_mouse_up))
            .on_scroll_wheel(cx.listener(Self::handle_scroll_wheel))
            .child(
                canvas(|_, _, _| {}, {
                    move |bounds, (), window: &mut Window, cx| {
                        *bounds_rc.borrow_mut() = bounds;
                        Self::paint_canvas(chart, shared_state, bounds, window, cx);
                    }
                })
                .size_full(),
            );

        for label in &row_labels {
            root = root.child(self.render_row_label(label, cx));
        }

        if let Some(popup) = &popup {
            for el in self.render_popup(popup, cx) {
                root = root.child(el);
            }
        }

        root
    }
}
