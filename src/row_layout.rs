//! Row layout: stable sort + optional grouping -> per-record row indices.
//!
//! The produced index is the sole input of the y axis. The same computation
//! can target the secondary slot to stage a transition layout next to the
//! committed one.

use crate::data_types::{FieldKind, RecordField, RenderStates, SickRecord, Slot};
use rayon::prelude::*;
use std::cmp::Ordering;

/// One bin of records sharing a categorical value, with the x extent of its
/// members. Feeds the group labels and the filter panel.
#[derive(Clone, Debug)]
pub struct GroupBin {
    pub key: String,
    pub count: usize,
    pub min_x: f64,
    pub max_x: f64,
    /// Member record positions.
    pub rows: Vec<usize>,
}

pub struct RowLayoutEngine;

impl RowLayoutEngine {
    /// Comparator for a field, honouring its kind. Numerical, CategoricalId
    /// and Date fields compare numerically with undefined/NaN ordered last
    /// (first when inverted); plain categoricals compare lexically.
    pub fn compare(
        field: RecordField,
        invert: bool,
        a: &SickRecord,
        b: &SickRecord,
    ) -> Ordering {
        match field.kind() {
            FieldKind::Categorical => {
                let (ta, tb) = (field.text(a), field.text(b));
                if invert {
                    tb.cmp(&ta)
                } else {
                    ta.cmp(&tb)
                }
            }
            _ => Self::numeric_cmp(field.numeric(a), field.numeric(b), invert),
        }
    }

    fn numeric_cmp(a: Option<f64>, b: Option<f64>, invert: bool) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            // Undefined sorts last ascending, first descending.
            (None, Some(_)) => {
                if invert {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Some(_), None) => {
                if invert {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (Some(va), Some(vb)) => {
                let ord = va.partial_cmp(&vb).unwrap_or(Ordering::Equal);
                if invert {
                    ord.reverse()
                } else {
                    ord
                }
            }
        }
    }

    /// Sorts the visible positions by sort key, then stably by group key so
    /// groups come first and the sort order is preserved within each group.
    pub fn sorted_order(
        records: &[SickRecord],
        visible: &[usize],
        sort_key: RecordField,
        sort_invert: bool,
        group_key: Option<RecordField>,
    ) -> Vec<usize> {
        let mut order = visible.to_vec();
        order.par_sort_by(|&a, &b| Self::compare(sort_key, sort_invert, &records[a], &records[b]));
        if let Some(group) = group_key {
            order.par_sort_by(|&a, &b| Self::compare(group, false, &records[a], &records[b]));
        }
        order
    }

    /// Assigns every visible record a row index into the given slot.
    ///
    /// Grouped layouts add `group_ordinal * group_padding` on top of the
    /// sorted rank, inserting a constant index-space gap between groups;
    /// ungrouped indices are the contiguous 0-based rank.
    #[allow(clippy::too_many_arguments)]
    pub fn assign_rows(
        records: &[SickRecord],
        visible: &[usize],
        states: &mut RenderStates,
        sort_key: RecordField,
        sort_invert: bool,
        group_key: Option<RecordField>,
        group_padding: f64,
        slot: Slot,
    ) {
        if visible.is_empty() {
            return;
        }
        let order = Self::sorted_order(records, visible, sort_key, sort_invert, group_key);

        match group_key {
            Some(group) => {
                let mut current = group.text(&records[order[0]]);
                let mut ordinal = 0usize;
                for (rank, &pos) in order.iter().enumerate() {
                    let value = group.text(&records[pos]);
                    if value != current {
                        current = value;
                        ordinal += 1;
                    }
                    states.set_index(pos, slot, rank as f64 + ordinal as f64 * group_padding);
                }
            }
            None => {
                for (rank, &pos) in order.iter().enumerate() {
                    states.set_index(pos, slot, rank as f64);
                }
            }
        }
    }

    /// Assigns the stagger ranks driving the morph cascade.
    ///
    /// With an animation key, records are ranked over it and tied values
    /// share a rank; without one, each record staggers by its own row index.
    pub fn assign_animation_ranks(
        records: &[SickRecord],
        visible: &[usize],
        states: &mut RenderStates,
        key: Option<RecordField>,
        invert: bool,
        slot: Slot,
    ) {
        if visible.is_empty() {
            return;
        }

        match key {
            Some(field) => {
                let mut order = visible.to_vec();
                order.par_sort_by(|&a, &b| Self::compare(field, invert, &records[a], &records[b]));

                let mut rank = 0u32;
                let mut prev = order[0];
                for &pos in &order {
                    if Self::compare(field, invert, &records[pos], &records[prev]) == Ordering::Greater
                    {
                        prev = pos;
                        rank += 1;
                    }
                    states.get_mut(pos).animation_index = rank as f32;
                }
                states.animation_max = rank.max(1) as f32;
            }
            None => {
                let mut max_index = 0.0f64;
                for &pos in visible {
                    let index = states.index(pos, slot);
                    states.get_mut(pos).animation_index = index as f32;
                    max_index = max_index.max(index);
                }
                states.animation_max = (max_index as f32).max(1.0);
            }
        }
    }

    /// Bins the visible records over a categorical field, accumulating the
    /// member count and x extent per bin. Bins come back sorted by key with
    /// the field's comparator semantics.
    pub fn group_bins(
        records: &[SickRecord],
        visible: &[usize],
        field: RecordField,
        x_start: RecordField,
        x_end: RecordField,
    ) -> Vec<GroupBin> {
        let mut bins: Vec<GroupBin> = Vec::new();
        for &pos in visible {
            let r = &records[pos];
            let key = field.text(r);
            let min_x = x_start.numeric(r).unwrap_or(f64::NAN);
            let max_x = x_end.numeric(r).unwrap_or(f64::NAN);

            match bins.iter_mut().find(|b| b.key == key) {
                Some(bin) => {
                    bin.count += 1;
                    if min_x < bin.min_x || bin.min_x.is_nan() {
                        bin.min_x = min_x;
                    }
                    if max_x > bin.max_x || bin.max_x.is_nan() {
                        bin.max_x = max_x;
                    }
                    bin.rows.push(pos);
                }
                None => bins.push(GroupBin {
                    key,
                    count: 1,
                    min_x,
                    max_x,
                    rows: vec![pos],
                }),
            }
        }

        bins.sort_by(|a, b| Self::bin_key_cmp(field, &a.key, &b.key));
        bins
    }

    /// Key comparator matching the record comparator for the field kind.
    pub fn bin_key_cmp(field: RecordField, a: &str, b: &str) -> Ordering {
        match field.kind() {
            FieldKind::Categorical => a.cmp(b),
            _ => Self::numeric_cmp(a.parse::<f64>().ok(), b.parse::<f64>().ok(), false),
        }
    }
}
