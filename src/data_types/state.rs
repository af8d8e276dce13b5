use super::field::RecordField;
use crate::colour::ColourScheme;
use crate::theme::SicklistTheme;
use serde::{Deserialize, Serialize};

/// X-axis unit system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisMode {
    #[default]
    InDays,
    PercentVoyage,
    Date,
}

impl AxisMode {
    /// Field pair driving rectangle geometry. Date mode renders through the
    /// normalized date numbers so the geometry domain stays in pixel-like
    /// units.
    pub fn geometry_keys(&self) -> (RecordField, RecordField) {
        match self {
            AxisMode::InDays => (RecordField::OnInDays, RecordField::OffInDays),
            AxisMode::PercentVoyage => {
                (RecordField::OnPercentVoyage, RecordField::OffPercentVoyage)
            }
            AxisMode::Date => (RecordField::OnDateNum, RecordField::OffDateNum),
        }
    }

    /// Resolves the "On"/"Off"/"Total" interval selectors of the sort and
    /// colour controls against this mode. There is no `TotalDate` field, so
    /// Total falls back to days in Date mode.
    pub fn interval_field(&self, end: IntervalEnd) -> RecordField {
        match (self, end) {
            (AxisMode::InDays, IntervalEnd::On) => RecordField::OnInDays,
            (AxisMode::InDays, IntervalEnd::Off) => RecordField::OffInDays,
            (AxisMode::InDays, IntervalEnd::Total) => RecordField::TotalInDays,
            (AxisMode::PercentVoyage, IntervalEnd::On) => RecordField::OnPercentVoyage,
            (AxisMode::PercentVoyage, IntervalEnd::Off) => RecordField::OffPercentVoyage,
            (AxisMode::PercentVoyage, IntervalEnd::Total) => RecordField::TotalPercentVoyage,
            (AxisMode::Date, IntervalEnd::On) => RecordField::OnDateNum,
            (AxisMode::Date, IntervalEnd::Off) => RecordField::OffDateNum,
            (AxisMode::Date, IntervalEnd::Total) => RecordField::TotalInDays,
        }
    }
}

/// Mode-relative interval selector produced by the sort/colour dropdowns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalEnd {
    On,
    Off,
    Total,
}

/// Sort/colour control value: either mode-relative or an absolute field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldChoice {
    Interval(IntervalEnd),
    Field(RecordField),
}

impl FieldChoice {
    pub fn resolve(&self, mode: AxisMode) -> RecordField {
        match self {
            FieldChoice::Interval(end) => mode.interval_field(*end),
            FieldChoice::Field(f) => *f,
        }
    }
}

/// The "control panel" configuration. Exactly one LayoutState is current;
/// at most one target is pending while a transition is in flight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutState {
    pub sort_key: RecordField,
    pub sort_invert: bool,
    pub group_key: Option<RecordField>,
    pub axis_mode: AxisMode,
    pub colour_key: Option<RecordField>,
    pub colour_scheme: ColourScheme,
    pub colour_invert: bool,
    pub min_opacity: f32,
    pub animation_key: Option<RecordField>,
    pub animation_invert: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            sort_key: RecordField::OnInDays,
            sort_invert: false,
            group_key: None,
            axis_mode: AxisMode::InDays,
            colour_key: Some(RecordField::Died),
            colour_scheme: ColourScheme::Reds,
            colour_invert: false,
            min_opacity: 0.0,
            animation_key: None,
            animation_invert: false,
        }
    }
}

/// State shared between the chart model, the paint closures and the input
/// glue.
#[derive(Debug, Default)]
pub struct SharedChartState {
    pub is_dragging: bool,
    pub mouse_pos: Option<gpui::Point<gpui::Pixels>>,
    pub theme: SicklistTheme,

    /// Time taken by the last rectangle paint, for the debug readout.
    pub paint_nanos: std::sync::Arc<parking_lot::RwLock<u64>>,
}

impl Clone for SharedChartState {
    fn clone(&self) -> Self {
        Self {
            is_dragging: self.is_dragging,
            mouse_pos: self.mouse_pos,
            theme: self.theme.clone(),
            paint_nanos: self.paint_nanos.clone(),
        }
    }
}
