use sicklist_chart::data_types::{RecordField, RenderStates, SickRecord, Slot};
use sicklist_chart::row_layout::RowLayoutEngine;

fn rec(id: &str, on: f64, off: f64) -> SickRecord {
    SickRecord {
        id: id.to_string(),
        on_in_days: on,
        off_in_days: off,
        total_in_days: off - on,
        ..Default::default()
    }
}

fn rec_in_voyage(id: &str, on: f64, off: f64, voyage: &str) -> SickRecord {
    let mut r = rec(id, on, off);
    r.ship_with_year = voyage.to_string();
    r
}

fn indices(states: &RenderStates, n: usize) -> Vec<f64> {
    (0..n).map(|i| states.get(i).index).collect()
}

#[test]
fn test_sort_ascending_yields_contiguous_ranks() {
    let records = vec![rec("a", 0.0, 5.0), rec("b", 2.0, 2.0), rec("c", 10.0, 12.0)];
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        None,
        50.0,
        Slot::Primary,
    );

    assert_eq!(indices(&states, 3), vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_sort_switch_to_recovery_descending() {
    // End-to-end scenario: {0,5},{2,2},{10,12} by recovery descending maps
    // record 3 -> 0, record 1 -> 1, record 2 -> 2.
    let records = vec![rec("a", 0.0, 5.0), rec("b", 2.0, 2.0), rec("c", 10.0, 12.0)];
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OffInDays,
        true,
        None,
        50.0,
        Slot::Primary,
    );

    assert_eq!(states.get(2).index, 0.0);
    assert_eq!(states.get(0).index, 1.0);
    assert_eq!(states.get(1).index, 2.0);
}

#[test]
fn test_index_sequence_is_monotone_in_sort_key() {
    let values = [13.0, 2.0, 7.0, 7.0, 0.5, 21.0, 4.0, 4.0, 4.0, 11.0];
    let records: Vec<SickRecord> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| rec(&format!("r{i}"), v, v + 1.0))
        .collect();
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        None,
        50.0,
        Slot::Primary,
    );

    let mut by_rank: Vec<(f64, f64)> = (0..records.len())
        .map(|i| (states.get(i).index, values[i]))
        .collect();
    by_rank.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    for pair in by_rank.windows(2) {
        assert!(pair[0].1 <= pair[1].1, "sort key must be non-decreasing");
    }
}

#[test]
fn test_undefined_sort_values_are_contiguous_at_the_end() {
    let mut records = vec![
        rec("a", 5.0, 6.0),
        rec("b", 1.0, 2.0),
        rec("c", 0.0, 1.0),
        rec("d", 3.0, 4.0),
    ];
    records[0].on_in_days = f64::NAN;
    records[3].on_in_days = f64::NAN;
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        None,
        50.0,
        Slot::Primary,
    );

    // Defined values occupy ranks 0..1, NaNs the trailing ranks, ties in
    // prior relative order (stable).
    assert_eq!(states.get(2).index, 0.0);
    assert_eq!(states.get(1).index, 1.0);
    assert_eq!(states.get(0).index, 2.0);
    assert_eq!(states.get(3).index, 3.0);
}

#[test]
fn test_undefined_sort_values_lead_when_inverted() {
    let mut records = vec![rec("a", 5.0, 6.0), rec("b", 1.0, 2.0), rec("c", 3.0, 4.0)];
    records[1].on_in_days = f64::NAN;
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        true,
        None,
        50.0,
        Slot::Primary,
    );

    assert_eq!(states.get(1).index, 0.0, "NaN first under invert");
    assert_eq!(states.get(0).index, 1.0, "then descending values");
    assert_eq!(states.get(2).index, 2.0);
}

#[test]
fn test_group_gap_is_exactly_group_padding() {
    let group_padding = 50.0;
    let records = vec![
        rec_in_voyage("a", 0.0, 1.0, "Asia 1820"),
        rec_in_voyage("b", 1.0, 2.0, "Asia 1820"),
        rec_in_voyage("c", 0.0, 1.0, "Britannia 1823"),
        rec_in_voyage("d", 1.0, 2.0, "Britannia 1823"),
        rec_in_voyage("e", 2.0, 3.0, "Britannia 1823"),
        rec_in_voyage("f", 0.0, 1.0, "Clyde 1830"),
    ];
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        Some(RecordField::ShipWithYear),
        group_padding,
        Slot::Primary,
    );

    // Last of group g to first of group g+1: one rank plus the padding,
    // independent of group size.
    let last_asia = states.get(1).index;
    let first_britannia = states.get(2).index;
    let last_britannia = states.get(4).index;
    let first_clyde = states.get(5).index;

    assert_eq!(first_britannia - last_asia - 1.0, group_padding);
    assert_eq!(first_clyde - last_britannia - 1.0, group_padding);

    // Within a group the sort order is preserved.
    assert!(states.get(2).index < states.get(3).index);
    assert!(states.get(3).index < states.get(4).index);
}

#[test]
fn test_ungrouped_indices_are_contiguous_zero_based() {
    let records = vec![rec("a", 3.0, 4.0), rec("b", 1.0, 2.0), rec("c", 2.0, 3.0)];
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        None,
        50.0,
        Slot::Primary,
    );

    let mut all: Vec<f64> = indices(&states, 3);
    all.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(all, vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_secondary_slot_leaves_primary_untouched() {
    let records = vec![rec("a", 0.0, 5.0), rec("b", 2.0, 2.0), rec("c", 10.0, 12.0)];
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        None,
        50.0,
        Slot::Primary,
    );
    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OffInDays,
        true,
        None,
        50.0,
        Slot::Secondary,
    );

    assert_eq!(indices(&states, 3), vec![0.0, 1.0, 2.0]);
    assert_eq!(states.get(2).index_secondary, 0.0);
    assert_eq!(states.get(0).index_secondary, 1.0);
    assert_eq!(states.get(1).index_secondary, 2.0);

    states.commit_secondary();
    assert_eq!(states.get(2).index, 0.0);
}

#[test]
fn test_animation_ranks_share_rank_on_ties() {
    let mut records = vec![
        rec("a", 2.0, 3.0),
        rec("b", 2.0, 3.0),
        rec("c", 5.0, 6.0),
        rec("d", 1.0, 2.0),
    ];
    records[0].age_in_years = Some(20.0);
    records[1].age_in_years = Some(20.0);
    records[2].age_in_years = Some(31.0);
    records[3].age_in_years = Some(18.0);
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_animation_ranks(
        &records,
        &visible,
        &mut states,
        Some(RecordField::AgeInYears),
        false,
        Slot::Primary,
    );

    assert_eq!(states.get(3).animation_index, 0.0);
    assert_eq!(states.get(0).animation_index, 1.0);
    assert_eq!(states.get(1).animation_index, 1.0, "ties share a rank");
    assert_eq!(states.get(2).animation_index, 2.0);
    assert_eq!(states.animation_max, 2.0);
}

#[test]
fn test_animation_without_key_staggers_by_row_index() {
    let records = vec![rec("a", 3.0, 4.0), rec("b", 1.0, 2.0)];
    let visible: Vec<usize> = (0..records.len()).collect();
    let mut states = RenderStates::new(&records);

    RowLayoutEngine::assign_rows(
        &records,
        &visible,
        &mut states,
        RecordField::OnInDays,
        false,
        None,
        50.0,
        Slot::Primary,
    );
    RowLayoutEngine::assign_animation_ranks(
        &records,
        &visible,
        &mut states,
        None,
        false,
        Slot::Primary,
    );

    assert_eq!(states.get(1).animation_index, 0.0);
    assert_eq!(states.get(0).animation_index, 1.0);
    assert_eq!(states.animation_max, 1.0);
}

#[test]
fn test_group_bins_accumulate_count_and_extent() {
    let records = vec![
        rec_in_voyage("a", 3.0, 9.0, "Asia 1820"),
        rec_in_voyage("b", 1.0, 4.0, "Asia 1820"),
        rec_in_voyage("c", 0.0, 2.0, "Clyde 1830"),
    ];
    let visible: Vec<usize> = (0..records.len()).collect();

    let bins = RowLayoutEngine::group_bins(
        &records,
        &visible,
        RecordField::ShipWithYear,
        RecordField::OnInDays,
        RecordField::OffInDays,
    );

    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].key, "Asia 1820");
    assert_eq!(bins[0].count, 2);
    assert_eq!(bins[0].min_x, 1.0);
    assert_eq!(bins[0].max_x, 9.0);
    assert_eq!(bins[0].rows, vec![0, 1]);
    assert_eq!(bins[1].key, "Clyde 1830");
    assert_eq!(bins[1].count, 1);
}
