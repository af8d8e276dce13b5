use super::record::SickRecord;
use std::collections::HashMap;

/// Which attribute slot a layout pass writes into. The renderer blends
/// Primary toward Secondary during a transition; on completion Secondary is
/// committed into Primary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Secondary,
}

/// Mutable render bookkeeping for one record.
///
/// Kept out of `SickRecord` on purpose: domain data stays immutable after
/// canonicalization, UI lifecycle state lives here.
#[derive(Clone, Copy, Debug)]
pub struct RenderState {
    /// Row index along the y axis, in index space (may carry group padding).
    pub index: f64,
    pub index_secondary: f64,
    /// Stagger rank for the morph cascade.
    pub animation_index: f32,
    pub colour: [f32; 4],
    pub opacity: f32,
    /// Whether an overlay row label is currently attached to this record.
    pub label_visible: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            index: 0.0,
            index_secondary: 0.0,
            animation_index: 0.0,
            colour: [1.0, 1.0, 1.0, 1.0],
            opacity: 1.0,
            label_visible: false,
        }
    }
}

/// Render states for the whole record set, parallel to the record vector and
/// addressable by record id for label lifecycle checks.
pub struct RenderStates {
    states: Vec<RenderState>,
    by_id: HashMap<String, usize>,
    /// Largest animation index of the current assignment, shared by every
    /// record as the stagger denominator.
    pub animation_max: f32,
}

impl RenderStates {
    pub fn new(records: &[SickRecord]) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id.clone(), pos))
            .collect();
        Self {
            states: vec![RenderState::default(); records.len()],
            by_id,
            animation_max: 1.0,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, pos: usize) -> &RenderState {
        &self.states[pos]
    }

    pub fn get_mut(&mut self, pos: usize) -> &mut RenderState {
        &mut self.states[pos]
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderState> {
        self.states.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RenderState> {
        self.states.iter_mut()
    }

    pub fn index(&self, pos: usize, slot: Slot) -> f64 {
        match slot {
            Slot::Primary => self.states[pos].index,
            Slot::Secondary => self.states[pos].index_secondary,
        }
    }

    pub fn set_index(&mut self, pos: usize, slot: Slot, value: f64) {
        match slot {
            Slot::Primary => self.states[pos].index = value,
            Slot::Secondary => self.states[pos].index_secondary = value,
        }
    }

    /// Commits the secondary layout into primary after a finished morph.
    pub fn commit_secondary(&mut self) {
        for s in &mut self.states {
            s.index = s.index_secondary;
        }
    }
}
