// Data structures for the sicklist chart

pub mod field;
pub mod record;
pub mod render_state;
pub mod state;
pub mod voyage;

pub use field::{FieldKind, RecordField};
pub use record::{canonicalize_records, records_from_json, SickRecord};
pub use render_state::{RenderState, RenderStates, Slot};
pub use state::{AxisMode, FieldChoice, IntervalEnd, LayoutState, SharedChartState};
pub use voyage::{voyages_from_json, Voyage};
