//! Chart model.
//!
//! Single source of truth for the sicklist chart: records, voyages, render
//! states, layout configuration, scales, the rectangle batch, the transition
//! scheduler and the label managers all hang off one `Chart` instance. The
//! GPUI view drives it through the operation methods below and repaints from
//! its state; nothing in here touches the windowing layer, so the whole
//! model runs headless in tests.

use crate::colour::ColourEncoder;
use crate::data_types::{
    canonicalize_records, AxisMode, LayoutState, RecordField, RenderStates, SickRecord, Slot,
    Voyage,
};
use crate::data_types::state::FieldChoice;
use crate::overlay_labels::{DetailPopup, GroupLabelManager, RowLabelManager};
use crate::rectangles::RectangleBatch;
use crate::row_layout::{GroupBin, RowLayoutEngine};
use crate::scales::ChartScale;
use crate::theme::{ChartMetrics, SicklistTheme};
use crate::transform::{TransformExtent, ViewTransform};
use crate::transition::TransitionScheduler;
use eyre::{ensure, Result};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info};

/// Which control changed, steering how much of the view is rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionAction {
    Sort,
    Group,
    AxisMode,
    Filter,
}

const MORPH_ID: &str = "mainXY";

pub struct Chart {
    pub records: Vec<SickRecord>,
    pub voyages: Vec<Voyage>,
    pub states: RenderStates,
    /// Record positions surviving the active filters, in load order.
    pub visible: Vec<usize>,

    pub layout: LayoutState,
    /// Pending layout while a morph is in flight.
    pub target: Option<LayoutState>,

    pub metrics: ChartMetrics,
    pub theme: SicklistTheme,
    width: f32,
    height: f32,
    pixel_ratio: f32,

    /// Latest transform snapshot from the gesture tracker.
    pub transform: ViewTransform,
    /// Base geometry x scale for the current axis mode.
    pub x_scale: ChartScale,
    /// Geometry scale composed with the view transform.
    pub x_scale_t: ChartScale,
    /// Timestamp-domain scale backing Date-mode ticks; equals the geometry
    /// scale up to the date-number reparameterization.
    pub x_axis_scale: ChartScale,
    pub x_axis_scale_t: ChartScale,
    /// Row-index -> pixel scale (unzoomed) and its transformed companion.
    pub y_scale: ChartScale,
    pub y_scale_t: ChartScale,

    pub rectangles: RectangleBatch,
    pub transitions: TransitionScheduler,
    pub row_labels: RowLabelManager,
    pub group_labels: GroupLabelManager,
    pub group_bins: Vec<GroupBin>,
    pub zoom_extent: TransformExtent,
    pub popup: Option<DetailPopup>,

    /// Morph uniforms shared with the scheduler's per-frame closure.
    blend: Rc<Cell<(f32, f32)>>,
    morph_done: Rc<Cell<bool>>,
    frame_dirty: Rc<Cell<bool>>,
    render_requested: bool,

    /// Full-dataset date bounds in unix seconds, set at canonicalization.
    date_bounds: (f64, f64),
}

impl Chart {
    pub fn new(
        mut records: Vec<SickRecord>,
        voyages: Vec<Voyage>,
        width: f32,
        height: f32,
        pixel_ratio: f32,
    ) -> Result<Self> {
        ensure!(!records.is_empty(), "sicklist record set is empty");
        ensure!(width > 0.0 && height > 0.0, "viewport has no area");

        canonicalize_records(&mut records, width as f64);

        let mut min_ts = f64::INFINITY;
        let mut max_ts = f64::NEG_INFINITY;
        for r in &records {
            if let Some(d) = r.on_date {
                min_ts = min_ts.min(d.and_utc().timestamp() as f64);
            }
            if let Some(d) = r.off_date {
                max_ts = max_ts.max(d.and_utc().timestamp() as f64);
            }
        }
        if min_ts > max_ts {
            min_ts = 0.0;
            max_ts = 1.0;
        }

        let metrics = ChartMetrics::default();
        let theme = SicklistTheme::default();
        let states = RenderStates::new(&records);
        let visible: Vec<usize> = (0..records.len()).collect();
        let layout = LayoutState::default();

        let placeholder = ChartScale::new_linear((0.0, 1.0), (0.0, width));
        let rectangles = RectangleBatch::new(records.len(), &metrics, pixel_ratio);

        let mut chart = Self {
            records,
            voyages,
            states,
            visible,
            layout,
            target: None,
            metrics,
            theme,
            width,
            height,
            pixel_ratio,
            transform: ViewTransform::identity(),
            x_scale: placeholder.clone(),
            x_scale_t: placeholder.clone(),
            x_axis_scale: placeholder.clone(),
            x_axis_scale_t: placeholder.clone(),
            y_scale: placeholder.clone(),
            y_scale_t: placeholder,
            rectangles,
            transitions: TransitionScheduler::with_system_clock(),
            row_labels: RowLabelManager::new(pixel_ratio),
            group_labels: GroupLabelManager::new(),
            group_bins: Vec::new(),
            zoom_extent: TransformExtent::for_axis_mode(false),
            popup: None,
            blend: Rc::new(Cell::new((0.0, 0.0))),
            morph_done: Rc::new(Cell::new(false)),
            frame_dirty: Rc::new(Cell::new(false)),
            render_requested: false,
            date_bounds: (min_ts, max_ts),
        };

        chart.rebuild_x_scales();
        chart.rebuild_layout(Slot::Primary);
        chart.rebuild_y_scale();
        chart.apply_colours();
        chart.rebuild_group_labels();
        chart.rebuild_zoom_extent();
        chart.recompose_scales();
        chart.refresh_row_labels();
        chart.request_render();

        info!(
            records = chart.records.len(),
            voyages = chart.voyages.len(),
            "sicklist chart initialized"
        );
        Ok(chart)
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// The layout a staged or running transition is heading toward, else the
    /// committed one.
    pub fn effective_layout(&self) -> &LayoutState {
        self.target.as_ref().unwrap_or(&self.layout)
    }

    // ------------------------------------------------------------------
    // Render coalescing
    // ------------------------------------------------------------------

    /// Marks the frame dirty; repeated calls before the frame fires fold
    /// into one draw.
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    pub fn take_render_request(&mut self) -> bool {
        std::mem::replace(&mut self.render_requested, false)
    }

    // ------------------------------------------------------------------
    // Scales
    // ------------------------------------------------------------------

    fn rebuild_x_scales(&mut self) {
        let mode = self.effective_layout().axis_mode;
        let (x_start, x_end) = mode.geometry_keys();

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for r in &self.records {
            if let Some(v) = x_start.numeric(r) {
                min = min.min(v);
            }
            if let Some(v) = x_end.numeric(r) {
                max = max.max(v);
            }
        }
        if min > max {
            min = 0.0;
            max = 1.0;
        }

        self.x_scale = ChartScale::new_linear((min, max), (0.0, self.width));
        self.x_axis_scale = match mode {
            AxisMode::Date => ChartScale::new_linear(self.date_bounds, (0.0, self.width)),
            _ => self.x_scale.clone(),
        };
    }

    fn rebuild_y_scale(&mut self) {
        let n = self.visible.len() as f64;
        let span = match self.effective_layout().group_key {
            Some(_) => n + self.group_bins.len() as f64 * self.metrics.group_padding,
            None => n,
        };
        self.y_scale = ChartScale::new_linear(
            (0.0, span.max(1.0)),
            (0.0, (span.max(1.0) * self.metrics.row_height as f64) as f32),
        );
    }

    /// Recomputes the effective scales from the current transform. The same
    /// composed scales feed the renderer, the ticks and the labels.
    fn recompose_scales(&mut self) {
        self.x_scale_t = self.x_scale.rescaled_x(&self.transform);
        self.x_axis_scale_t = self.x_axis_scale.rescaled_x(&self.transform);
        self.y_scale_t = self.y_scale.rescaled_y(&self.transform);
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn rebuild_layout(&mut self, slot: Slot) {
        let layout = match slot {
            Slot::Primary => self.layout.clone(),
            Slot::Secondary => self.effective_layout().clone(),
        };
        RowLayoutEngine::assign_rows(
            &self.records,
            &self.visible,
            &mut self.states,
            layout.sort_key,
            layout.sort_invert,
            layout.group_key,
            self.metrics.group_padding,
            slot,
        );
        RowLayoutEngine::assign_animation_ranks(
            &self.records,
            &self.visible,
            &mut self.states,
            layout.animation_key,
            layout.animation_invert,
            slot,
        );
        let (x_start, x_end) = layout.axis_mode.geometry_keys();
        self.rectangles
            .set_x_points(&self.records, &self.x_scale, x_start, x_end, slot);
        self.rectangles.set_y_points(&self.states, slot);
        self.rectangles.set_animation_indices(&self.states);
    }

    fn apply_colours(&mut self) {
        let layout = self.effective_layout().clone();
        ColourEncoder::apply(
            &self.records,
            &self.visible,
            &mut self.states,
            layout.colour_key,
            layout.colour_scheme,
            layout.colour_invert,
            &self.theme,
        );
        self.rectangles.set_colours(&self.states);
    }

    fn rebuild_group_labels(&mut self) {
        let layout = self.effective_layout().clone();
        match layout.group_key {
            Some(group) => {
                let (x_start, x_end) = layout.axis_mode.geometry_keys();
                self.group_bins = RowLayoutEngine::group_bins(
                    &self.records,
                    &self.visible,
                    group,
                    x_start,
                    x_end,
                );
                self.group_labels
                    .rebuild(&self.group_bins, group, self.metrics.group_padding);
            }
            None => {
                self.group_bins.clear();
                self.group_labels.clear();
            }
        }
    }

    fn rebuild_zoom_extent(&mut self) {
        let mode = self.effective_layout().axis_mode;
        let max_x = self.width as f64;
        let min_y = -(self.y_scale.range().1 as f64);

        self.zoom_extent = TransformExtent::for_axis_mode(mode == AxisMode::Date)
            .with_pan_bounds([-max_x, max_x], [min_y, self.height as f64]);
        debug!(?mode, "zoom extent rebuilt");
    }

    /// Extent handed to a freshly constructed gesture tracker.
    pub fn make_gesture_extent(&self) -> TransformExtent {
        self.zoom_extent
    }

    // ------------------------------------------------------------------
    // Gesture integration
    // ------------------------------------------------------------------

    /// Transform broadcast target: recomputes the composed scales, the
    /// renderer uniforms and the overlay labels, then requests one coalesced
    /// frame. Everything is updated before the frame is requested so no
    /// consumer renders from a stale transform.
    pub fn on_pan_or_zoom(&mut self, t: ViewTransform) {
        self.transform = t;
        self.recompose_scales();
        self.rectangles.update_pan_zoom(&t);
        self.group_labels.position(
            &t,
            &self.y_scale,
            &self.y_scale_t,
            &self.x_scale_t,
            &self.metrics,
        );
        self.refresh_row_labels();
        self.request_render();
    }

    fn refresh_row_labels(&mut self) {
        let (x_start, x_end) = self.effective_layout().axis_mode.geometry_keys();
        self.row_labels.update(
            &self.records,
            &mut self.states,
            &self.visible,
            &self.transform,
            &self.x_scale_t,
            x_start,
            x_end,
            &self.metrics,
            (self.width, self.height),
        );
        // A label recreated mid-pan must stay inert while its popup is open.
        if let Some(popup) = &self.popup {
            self.row_labels.set_pointer_enabled(popup.record, false);
        }
    }

    // ------------------------------------------------------------------
    // Control operations
    // ------------------------------------------------------------------

    pub fn set_sort_key(&mut self, choice: FieldChoice, invert: bool) {
        let mode = self.effective_layout().axis_mode;
        let field = choice.resolve(mode);
        let current = self.effective_layout();
        if current.sort_key == field && current.sort_invert == invert {
            return;
        }
        let mut target = current.clone();
        target.sort_key = field;
        target.sort_invert = invert;
        self.begin_morph(target, TransitionAction::Sort);
    }

    pub fn set_group_key(&mut self, group: Option<RecordField>) {
        if self.effective_layout().group_key == group {
            return;
        }
        let mut target = self.effective_layout().clone();
        target.group_key = group;
        self.begin_morph(target, TransitionAction::Group);
    }

    pub fn set_axis_mode(&mut self, mode: AxisMode, sort: FieldChoice, colour: Option<FieldChoice>) {
        let mut target = self.effective_layout().clone();
        target.axis_mode = mode;
        // Mode-relative sort/colour selectors re-resolve against the new mode.
        target.sort_key = sort.resolve(mode);
        target.colour_key = colour.map(|c| c.resolve(mode));
        self.begin_morph(target, TransitionAction::AxisMode);
    }

    /// Recolours in place; colour changes do not morph geometry.
    pub fn set_colour(
        &mut self,
        key: Option<RecordField>,
        scheme: crate::colour::ColourScheme,
        invert: bool,
    ) {
        let layout = match &mut self.target {
            Some(t) => t,
            None => &mut self.layout,
        };
        layout.colour_key = key;
        layout.colour_scheme = scheme;
        layout.colour_invert = invert;
        self.apply_colours();
        let states = &mut self.states;
        self.row_labels.hide_all(states);
        self.refresh_row_labels();
        self.request_render();
    }

    pub fn set_min_opacity(&mut self, min_opacity: f32) {
        let layout = match &mut self.target {
            Some(t) => t,
            None => &mut self.layout,
        };
        layout.min_opacity = min_opacity;
        self.rectangles.set_min_opacity(min_opacity);
        self.request_render();
    }

    pub fn set_animation(&mut self, key: Option<RecordField>, invert: bool) {
        let layout = match &mut self.target {
            Some(t) => t,
            None => &mut self.layout,
        };
        layout.animation_key = key;
        layout.animation_invert = invert;
        let (key, invert) = (layout.animation_key, layout.animation_invert);
        RowLayoutEngine::assign_animation_ranks(
            &self.records,
            &self.visible,
            &mut self.states,
            key,
            invert,
            Slot::Primary,
        );
        self.rectangles.set_animation_indices(&self.states);
    }

    // ------------------------------------------------------------------
    // Filtering and highlighting
    // ------------------------------------------------------------------

    /// Restricts the visible set to one bin of a categorical field.
    pub fn apply_filter(&mut self, field: RecordField, key: &str) {
        let (x_start, x_end) = self.effective_layout().axis_mode.geometry_keys();
        let bins =
            RowLayoutEngine::group_bins(&self.records, &self.visible, field, x_start, x_end);
        if let Some(bin) = bins.into_iter().find(|b| b.key == key) {
            info!(?field, key, count = bin.count, "filter applied");
            self.visible = bin.rows;
            let target = self.effective_layout().clone();
            self.begin_morph(target, TransitionAction::Filter);
        }
    }

    pub fn clear_filters(&mut self) {
        self.visible = (0..self.records.len()).collect();
        let target = self.effective_layout().clone();
        self.begin_morph(target, TransitionAction::Filter);
    }

    /// Bins of a categorical field over the visible set, for the filter
    /// panel.
    pub fn filter_bins(&self, field: RecordField) -> Vec<GroupBin> {
        RowLayoutEngine::group_bins(
            &self.records,
            &self.visible,
            field,
            RecordField::OnInDays,
            RecordField::OffInDays,
        )
    }

    /// Dims everything outside the hovered bin without touching geometry.
    pub fn highlight_rows(&mut self, rows: &[usize]) {
        for &pos in &self.visible {
            self.states.get_mut(pos).opacity = 0.015;
        }
        for &pos in rows {
            self.states.get_mut(pos).opacity = 1.0;
        }
        self.rectangles.set_opacities(&self.states);
        self.refresh_row_labels();
        self.request_render();
    }

    pub fn clear_highlight(&mut self) {
        for &pos in &self.visible {
            self.states.get_mut(pos).opacity = 1.0;
        }
        self.rectangles.set_opacities(&self.states);
        self.refresh_row_labels();
        self.request_render();
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Swaps the transition clock. In-flight transitions are discarded, so
    /// call this before starting any morph; tests use it to drive morphs
    /// against a manual clock.
    pub fn set_transition_clock(&mut self, clock: impl Fn() -> f64 + 'static) {
        self.transitions = TransitionScheduler::new(clock);
    }

    /// Stages `target` as the secondary attribute set and starts the morph.
    /// A morph already in flight is cancelled; the committed primary state
    /// stays authoritative and the new morph departs from it.
    fn begin_morph(&mut self, target: LayoutState, action: TransitionAction) {
        self.transitions.cancel(MORPH_ID);
        self.blend.set((0.0, 0.0));
        self.rectangles.set_blend(0.0, 0.0);
        self.target = Some(target);

        self.rebuild_x_scales();
        self.rebuild_layout(Slot::Secondary);
        self.apply_colours();

        self.row_labels.hide_all(&mut self.states);
        if action != TransitionAction::Sort {
            self.rebuild_group_labels();
            self.rebuild_y_scale();
            self.rebuild_zoom_extent();
        } else {
            self.rebuild_y_scale();
        }
        self.recompose_scales();
        self.group_labels.position(
            &self.transform,
            &self.y_scale,
            &self.y_scale_t,
            &self.x_scale_t,
            &self.metrics,
        );

        let blend = self.blend.clone();
        let dirty = self.frame_dirty.clone();
        let done = self.morph_done.clone();
        self.transitions.begin(
            MORPH_ID,
            self.metrics.morph_duration,
            move |t| {
                blend.set((t, t));
                dirty.set(true);
            },
            move || {
                done.set(true);
            },
        );
        debug!(?action, "morph started");
        self.request_render();
    }

    /// Drives in-flight transitions one frame. Returns true while any remain
    /// so the view keeps scheduling frame callbacks.
    pub fn tick_transitions(&mut self) -> bool {
        let any = self.transitions.tick();
        let (tx, ty) = self.blend.get();
        self.rectangles.set_blend(tx, ty);
        if self.frame_dirty.replace(false) {
            self.request_render();
        }
        if self.morph_done.replace(false) {
            self.commit_transition();
        }
        any
    }

    /// Commits the staged layout: secondary becomes primary and the blend
    /// resets so the next morph starts from a clean baseline.
    fn commit_transition(&mut self) {
        if let Some(target) = self.target.take() {
            self.layout = target;
        }
        self.states.commit_secondary();
        self.rebuild_layout(Slot::Primary);
        self.rectangles.set_blend(0.0, 0.0);
        self.blend.set((0.0, 0.0));
        self.refresh_row_labels();
        self.request_render();
        debug!("morph committed");
    }

    // ------------------------------------------------------------------
    // Popup
    // ------------------------------------------------------------------

    /// Opens the detail popup for a record and disables its row label's
    /// pointer handlers until dismissal.
    pub fn open_popup(&mut self, pos: usize) {
        self.row_labels.set_pointer_enabled(pos, false);
        self.popup = Some(DetailPopup::build(pos, &self.records[pos]));
        self.request_render();
    }

    pub fn close_popup(&mut self) {
        if let Some(popup) = self.popup.take() {
            self.row_labels.set_pointer_enabled(popup.record, true);
        }
        self.request_render();
    }
}
