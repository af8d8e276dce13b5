//! sicklist_chart crate: interactive voyage sicklist charting in GPUI

pub mod axis_renderer;
pub mod chart;
pub mod chart_view;
pub mod colour;
pub mod data_types;
pub mod gesture_tracker;
pub mod overlay_labels;
pub mod rectangles;
pub mod row_layout;
pub mod scales;
pub mod theme;
pub mod transform;
pub mod transition;
pub mod utils;
pub mod view_controller;

pub use chart::{Chart, TransitionAction};
pub use chart_view::{init, SicklistView};
pub use data_types::{AxisMode, LayoutState, RecordField, SickRecord, Voyage};
pub use transform::{TransformExtent, ViewTransform};
