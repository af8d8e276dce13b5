//! Overlay label lifecycle: per-row labels, per-group labels and the detail
//! popup.
//!
//! This module owns the WHAT (which labels exist, where, with which text and
//! size); the gpui view renders them as positioned elements. Labels are kept
//! in maps keyed by record/bin so a reposition mutates the existing entry in
//! place and any pointer/hover state attached to it survives.

use crate::data_types::{RecordField, RenderStates, SickRecord};
use crate::row_layout::GroupBin;
use crate::scales::ChartScale;
use crate::theme::ChartMetrics;
use crate::transform::ViewTransform;
use crate::utils::{can_text_be_dark, paste};
use std::collections::HashMap;

/// One visible row label, positioned and clipped to its record's rectangle.
#[derive(Clone, Debug)]
pub struct RowLabel {
    pub record: usize,
    pub origin: (f32, f32),
    pub rect_width: f32,
    pub rect_height: f32,
    pub clip_width: f32,
    pub font_size: f32,
    pub text: String,
    pub dark_text: bool,
    pub opacity: f32,
    pub colour: [f32; 4],
    pub died: bool,
    /// Cleared while the detail popup for this record is open.
    pub pointer_enabled: bool,
    pub hovered: bool,
}

pub struct RowLabelManager {
    labels: HashMap<usize, RowLabel>,
    pixel_ratio: f32,
}

impl RowLabelManager {
    pub fn new(pixel_ratio: f32) -> Self {
        Self {
            labels: HashMap::new(),
            pixel_ratio,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &RowLabel> {
        self.labels.values()
    }

    pub fn get(&self, record: usize) -> Option<&RowLabel> {
        self.labels.get(&record)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn hide_all(&mut self, states: &mut RenderStates) {
        for (&pos, _) in self.labels.iter() {
            states.get_mut(pos).label_visible = false;
        }
        self.labels.clear();
    }

    /// Recomputes label visibility against the current transform.
    ///
    /// A record's label is live iff the zoomed row height clears the
    /// threshold AND its row start lies inside the viewport AND its x
    /// interval intersects the viewport. Newly visible records get a fresh
    /// label; still-visible ones are repositioned in place; everything else
    /// is torn down.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        records: &[SickRecord],
        states: &mut RenderStates,
        visible: &[usize],
        transform: &ViewTransform,
        x_scale_t: &ChartScale,
        x_start: RecordField,
        x_end: RecordField,
        metrics: &ChartMetrics,
        viewport: (f32, f32),
    ) {
        let (width, height) = viewport;
        let zoomed_row = transform.ky as f32 * metrics.row_height;
        if zoomed_row <= metrics.min_row_label_height {
            self.hide_all(states);
            return;
        }

        for &pos in visible {
            let r = &records[pos];
            let state = *states.get(pos);
            let start_y =
                (state.index as f32) * metrics.row_height * transform.ky as f32 + transform.y as f32;

            let mut live = false;
            let mut start_x = 0.0;
            let mut end_x = 0.0;
            if start_y > 0.0 && start_y < height {
                start_x = x_scale_t.map(x_start.numeric(r).unwrap_or(f64::NAN));
                end_x = x_scale_t.map(x_end.numeric(r).unwrap_or(f64::NAN));
                live = (start_x < 0.0 && end_x > 0.0)
                    || (start_x < width && end_x > width)
                    || (start_x > 0.0 && end_x < width);
            }

            if live {
                if !self.labels.contains_key(&pos) {
                    let label = Self::create(pos, r, &state);
                    states.get_mut(pos).label_visible = true;
                    self.labels.insert(pos, label);
                }
                let pixel_ratio = self.pixel_ratio;
                if let Some(label) = self.labels.get_mut(&pos) {
                    Self::position(
                        label,
                        &state,
                        start_x,
                        end_x,
                        start_y,
                        transform,
                        metrics,
                        pixel_ratio,
                    );
                }
            } else if self.labels.remove(&pos).is_some() {
                states.get_mut(pos).label_visible = false;
            }
        }
    }

    fn create(pos: usize, r: &SickRecord, state: &crate::data_types::RenderState) -> RowLabel {
        let age = r
            .age_in_years
            .map(|a| format!(" ({a})"))
            .unwrap_or_default();
        let second = if r.disease_classification_2.is_empty() {
            String::new()
        } else {
            format!(" ({})", r.disease_classification_2)
        };
        let text = format!(
            "{} {}{} — {}{}",
            r.forenames, r.name, age, r.disease_classification_1, second
        );

        RowLabel {
            record: pos,
            origin: (0.0, 0.0),
            rect_width: 0.0,
            rect_height: 0.0,
            clip_width: 0.0,
            font_size: 0.0,
            text,
            dark_text: can_text_be_dark(state.colour),
            opacity: state.opacity,
            colour: state.colour,
            died: r.died,
            pointer_enabled: true,
            hovered: false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn position(
        label: &mut RowLabel,
        state: &crate::data_types::RenderState,
        start_x: f32,
        end_x: f32,
        start_y: f32,
        transform: &ViewTransform,
        metrics: &ChartMetrics,
        pixel_ratio: f32,
    ) {
        let margin = metrics.group_label_x_padding + metrics.row_label_margin_left;
        let x_start_min = start_x.max(margin);
        let label_height = metrics.row_height * transform.ky as f32;
        let fill = metrics.row_fill_ratio();

        label.origin = (x_start_min, start_y);
        label.rect_width = (end_x - x_start_min).max(label_height * fill);
        label.rect_height = label_height * fill;
        label.clip_width =
            (label.rect_width.max(label_height * fill) - metrics.row_label_margin_left) / pixel_ratio;
        label.font_size = 4.0 * transform.ky as f32;
        label.opacity = state.opacity;
        label.colour = state.colour;
        label.dark_text = can_text_be_dark(state.colour);
    }

    /// Disables the label's own pointer handlers while its popup is open.
    pub fn set_pointer_enabled(&mut self, record: usize, enabled: bool) {
        if let Some(label) = self.labels.get_mut(&record) {
            label.pointer_enabled = enabled;
            if !enabled {
                label.hovered = false;
            }
        }
    }

    pub fn set_hovered(&mut self, record: usize, hovered: bool) {
        if let Some(label) = self.labels.get_mut(&record) {
            if label.pointer_enabled {
                label.hovered = hovered;
            }
        }
    }
}

/// One group (voyage) label: a tick line spanning the group plus its name.
#[derive(Clone, Debug)]
pub struct GroupLabel {
    pub key: String,
    pub display: String,
    /// Starting row-index count of the group, including group padding.
    pub index_start: f64,
    pub count: usize,
    pub min_x: f64,
    pub max_x: f64,

    pub origin: (f32, f32),
    pub line_height: f32,
    pub font_size: f32,
    pub rotated: bool,
    pub hidden: bool,
}

pub struct GroupLabelManager {
    labels: Vec<GroupLabel>,
}

impl GroupLabelManager {
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn labels(&self) -> &[GroupLabel] {
        &self.labels
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Rebuilds the label set from sorted group bins. Bins with an empty key
    /// are counted in the index offsets but get no label of their own.
    pub fn rebuild(&mut self, bins: &[GroupBin], field: RecordField, group_padding: f64) {
        self.labels.clear();
        let mut cumulative = 0usize;
        for (ordinal, bin) in bins.iter().enumerate() {
            let index_start = ordinal as f64 * group_padding + cumulative as f64;
            cumulative += bin.count;
            if bin.key.is_empty() {
                continue;
            }
            self.labels.push(GroupLabel {
                display: field.display_label(&bin.key),
                key: bin.key.clone(),
                index_start,
                count: bin.count,
                min_x: bin.min_x,
                max_x: bin.max_x,
                origin: (0.0, 0.0),
                line_height: 0.0,
                font_size: 0.0,
                rotated: false,
                hidden: true,
            });
        }
    }

    /// Repositions every group label against the effective scales.
    pub fn position(
        &mut self,
        transform: &ViewTransform,
        y_scale: &ChartScale,
        y_scale_t: &ChartScale,
        x_scale_t: &ChartScale,
        metrics: &ChartMetrics,
    ) {
        let min_x_position = metrics.y_axis_margin_left + 2.0 * metrics.group_label_x_padding;
        let min_y_position = metrics.x_axis_margin_bottom;

        for label in &mut self.labels {
            let mut y_t = y_scale_t.map(label.index_start);
            let mut height_t = y_scale.map(label.count as f64) * transform.ky as f32;

            let mut x_min_t = x_scale_t.map(label.min_x);
            let x_max_t = x_scale_t.map(label.max_x);

            if y_t < min_y_position {
                if y_t + (height_t - min_y_position) > 0.0 {
                    height_t += y_t - min_y_position;
                    y_t = min_y_position;
                } else {
                    height_t = -100.0;
                    y_t = -100.0;
                }
            }

            if x_min_t < min_x_position {
                x_min_t = if x_max_t >= min_x_position {
                    min_x_position
                } else {
                    x_max_t
                };
            }

            label.origin = (x_min_t - metrics.group_label_x_padding, y_t);
            label.line_height = height_t;
            label.hidden = height_t <= metrics.min_group_label_height;
            label.font_size = 10.0 + (transform.ky as f32 * 6.0).min(4.0);
            label.rotated = x_min_t <= min_x_position;
        }
    }
}

impl Default for GroupLabelManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The centred detail popup, assembled from the record's full field set
/// under a fixed display schema. Rows whose value is empty are omitted.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailPopup {
    pub record: usize,
    pub title: String,
    pub subtitle: String,
    pub fields: Vec<(String, String)>,
    pub identifier: String,
}

impl DetailPopup {
    pub fn build(pos: usize, r: &SickRecord) -> Self {
        let title = format!("{} {}", r.forenames, r.name);

        let gender = match r.gender {
            Some(1) => "Male",
            Some(2) => "Female",
            _ => "Unknown",
        };
        let subtitle = if r.died {
            format!("{gender} (Died)")
        } else {
            gender.to_string()
        };

        let age = {
            let mut out = String::new();
            if let Some(a) = r.age_in_years {
                out.push_str(&format!("{a}"));
            } else {
                out.push_str("unknown");
            }
            if !r.year_of_birth.is_empty() {
                out.push_str(&format!(" (Born in {})", r.year_of_birth));
            }
            out
        };
        let died = paste(
            &[&r.death_date_day, &r.death_date_month, &r.death_date_year],
            " ",
        );
        let height = {
            let feet = if r.height_feet.is_empty() {
                String::new()
            } else {
                format!("{}\u{2032}", r.height_feet)
            };
            let inches = if r.height_inches.is_empty() {
                String::new()
            } else {
                format!("{}\u{2033}", r.height_inches)
            };
            paste(&[&feet, &inches], " ")
        };
        let disease_class = paste(
            &[&r.disease_classification_1, &r.disease_classification_2],
            ", ",
        );
        let from = paste(&[&r.np_town, &r.np_county_state, &r.np_country], ", ");
        let trial = paste(
            &[
                &r.trial_place_court,
                &r.trial_place_location,
                &r.trial_place_country,
            ],
            ", ",
        );
        let priors = format!(
            "{}",
            r.prior_conviction_count.map(|c| c as i64).unwrap_or(0)
        );

        let candidates: [(&str, String); 12] = [
            ("Age", age),
            ("Died", died),
            ("Height", height),
            ("Disease Class", disease_class),
            ("Disease", r.disease_or_wound.clone()),
            ("Type", r.quality.clone()),
            ("Occupation", r.occupation.clone()),
            ("Ship and Year", r.ship_with_year.clone()),
            ("From", from),
            ("Trial at", trial),
            ("Sentence", r.crime_sentence.clone()),
            ("Prior Convictions", priors),
        ];

        let fields = candidates
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let identifier = if r.convict {
            format!("{} ({})", r.id, r.convict_id)
        } else {
            r.id.clone()
        };

        Self {
            record: pos,
            title,
            subtitle,
            fields,
            identifier,
        }
    }
}
