use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ship-year reference entry: groups records of one voyage and carries the
/// domain bounds that scale the per-voyage percent/day axes. Built once from
/// the shipyear stats array, immutable thereafter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Voyage {
    #[serde(rename = "ShipWithYear", default)]
    pub ship_with_year: String,
    #[serde(rename = "VoyageStartDate", default, with = "super::record::naive_date_time")]
    pub start: Option<NaiveDateTime>,
    #[serde(rename = "VoyageEndDate", default, with = "super::record::naive_date_time")]
    pub end: Option<NaiveDateTime>,
    #[serde(rename = "VoyageInDays", default)]
    pub duration_days: f64,
}

impl Voyage {
    /// Day-axis domain of this voyage.
    pub fn day_domain(&self) -> (f64, f64) {
        (0.0, self.duration_days.max(1.0))
    }

    /// Percent-of-voyage domain, fixed by definition.
    pub fn percent_domain(&self) -> (f64, f64) {
        (0.0, 100.0)
    }

    /// Index by ship-with-year key for record lookup.
    pub fn index_by_key(voyages: &[Voyage]) -> HashMap<String, usize> {
        voyages
            .iter()
            .enumerate()
            .map(|(i, v)| (v.ship_with_year.clone(), i))
            .collect()
    }
}

/// Parses the shipyear stats JSON array.
pub fn voyages_from_json(json: &str) -> eyre::Result<Vec<Voyage>> {
    let voyages: Vec<Voyage> = serde_json::from_str(json)?;
    Ok(voyages)
}
