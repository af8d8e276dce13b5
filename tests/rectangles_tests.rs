use sicklist_chart::data_types::{RecordField, RenderStates, SickRecord, Slot};
use sicklist_chart::rectangles::{clamp01, quintic_ease_in_out, RectVertex, RectangleBatch};
use sicklist_chart::scales::ChartScale;
use sicklist_chart::theme::ChartMetrics;
use sicklist_chart::transform::ViewTransform;

fn rec(id: &str, on: f64, off: f64) -> SickRecord {
    SickRecord {
        id: id.to_string(),
        on_in_days: on,
        off_in_days: off,
        ..Default::default()
    }
}

/// Batch over the given intervals, rows stacked in record order.
fn batch_for(intervals: &[(f64, f64)], pixel_ratio: f32) -> (RectangleBatch, Vec<SickRecord>) {
    let records: Vec<SickRecord> = intervals
        .iter()
        .enumerate()
        .map(|(i, &(on, off))| rec(&format!("r{i}"), on, off))
        .collect();
    let mut states = RenderStates::new(&records);
    for i in 0..records.len() {
        states.set_index(i, Slot::Primary, i as f64);
        states.set_index(i, Slot::Secondary, i as f64);
    }

    let metrics = ChartMetrics::default();
    let mut batch = RectangleBatch::new(records.len(), &metrics, pixel_ratio);
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 100.0));
    batch.set_x_points(&records, &scale, RecordField::OnInDays, RecordField::OffInDays, Slot::Primary);
    batch.set_x_points(&records, &scale, RecordField::OnInDays, RecordField::OffInDays, Slot::Secondary);
    batch.set_y_points(&states, Slot::Primary);
    batch.set_y_points(&states, Slot::Secondary);
    batch.set_colours(&states);
    batch.set_animation_indices(&states);
    (batch, records)
}

#[test]
fn test_quintic_ease_endpoints_and_midpoint() {
    assert_eq!(quintic_ease_in_out(0.0), 0.0);
    assert_eq!(quintic_ease_in_out(1.0), 1.0);
    assert!((quintic_ease_in_out(0.5) - 0.5).abs() < 1e-6);
    assert!(quintic_ease_in_out(0.1) < 0.1, "slow start");
    assert!(quintic_ease_in_out(0.9) > 0.9, "fast finish");
    assert_eq!(clamp01(-0.5), 0.0);
    assert_eq!(clamp01(1.5), 1.0);
}

#[test]
fn test_degenerate_row_clamps_to_one_device_pixel_with_reduced_alpha() {
    let (mut batch, _) = batch_for(&[(10.0, 40.0)], 1.0);

    // Normal zoom: full-height row, full alpha.
    batch.update_pan_zoom(&ViewTransform::identity());
    let normal = batch.shade(0).unwrap();
    assert!((normal.y.y - normal.y.x - 7.5).abs() < 1e-4);
    assert!((normal.colour[3] - 1.0).abs() < 1e-6);

    // Collapse the y zoom: computed height ~0, emitted height exactly one
    // device pixel, alpha strictly below the normal sibling.
    batch.update_pan_zoom(&ViewTransform { x: 0.0, y: 0.0, kx: 1.0, ky: 1e-5 });
    let degenerate = batch.shade(0).unwrap();
    assert!((degenerate.y.y - degenerate.y.x - 1.0).abs() < 1e-4);
    assert!(degenerate.colour[3] < normal.colour[3]);
    assert!(degenerate.colour[3] > 0.0, "faded, not invisible");
}

#[test]
fn test_device_pixel_clamp_respects_pixel_ratio() {
    let (mut batch, _) = batch_for(&[(10.0, 40.0)], 2.0);
    batch.update_pan_zoom(&ViewTransform { x: 0.0, y: 0.0, kx: 1.0, ky: 1e-5 });
    let quad = batch.shade(0).unwrap();
    // One device pixel at pixelRatio 2 is half a logical pixel.
    assert!((quad.y.y - quad.y.x - 0.5).abs() < 1e-4);
}

#[test]
fn test_min_opacity_floor_holds_for_degenerate_rows() {
    let (mut batch, _) = batch_for(&[(10.0, 40.0)], 1.0);
    batch.set_min_opacity(0.8);
    batch.update_pan_zoom(&ViewTransform { x: 0.0, y: 0.0, kx: 1.0, ky: 1e-5 });
    let quad = batch.shade(0).unwrap();
    assert!(quad.colour[3] >= 0.8 - 1e-6);
}

#[test]
fn test_zero_length_interval_renders_as_square() {
    let (mut batch, _) = batch_for(&[(25.0, 25.0)], 1.0);
    batch.update_pan_zoom(&ViewTransform::identity());
    let quad = batch.shade(0).unwrap();
    let width = quad.x.y - quad.x.x;
    let height = quad.y.y - quad.y.x;
    assert!(width > 0.0);
    assert!((width - height).abs() < 1e-5, "expanded to row height");
}

#[test]
fn test_narrow_interval_expands_to_row_height() {
    let (mut batch, _) = batch_for(&[(25.0, 26.0)], 1.0);
    // Zoom y up so the row is taller than the 1px interval.
    batch.update_pan_zoom(&ViewTransform { x: 0.0, y: 0.0, kx: 1.0, ky: 2.0 });
    let quad = batch.shade(0).unwrap();
    assert!((quad.x.y - quad.x.x) >= (quad.y.y - quad.y.x) - 1e-5);
}

#[test]
fn test_blend_endpoints_select_primary_then_secondary() {
    let records = vec![rec("a", 10.0, 20.0)];
    let mut states = RenderStates::new(&records);
    states.set_index(0, Slot::Primary, 0.0);
    states.set_index(0, Slot::Secondary, 4.0);

    let metrics = ChartMetrics::default();
    let mut batch = RectangleBatch::new(1, &metrics, 1.0);
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 100.0));
    batch.set_x_points(&records, &scale, RecordField::OnInDays, RecordField::OffInDays, Slot::Primary);
    batch.set_x_points(&records, &scale, RecordField::OffInDays, RecordField::OnInDays, Slot::Secondary);
    batch.set_y_points(&states, Slot::Primary);
    batch.set_y_points(&states, Slot::Secondary);
    batch.set_colours(&states);
    batch.set_animation_indices(&states);
    batch.set_skewing(0.0);
    batch.update_pan_zoom(&ViewTransform::identity());

    batch.set_blend(0.0, 0.0);
    let start = batch.shade(0).unwrap();
    assert!((start.y.x - 0.0).abs() < 1e-5);
    assert!((start.x.x - 10.0).abs() < 1e-5);

    batch.set_blend(1.0, 1.0);
    let end = batch.shade(0).unwrap();
    assert!((end.y.x - 40.0).abs() < 1e-5, "secondary row index 4");
    assert!((end.x.x - 20.0).abs() < 1e-5, "secondary x interval");

    // Halfway through the raw blend the doubled ramp is already saturated.
    batch.set_blend(0.5, 0.5);
    let mid = batch.shade(0).unwrap();
    assert_eq!(mid.y.x, end.y.x);

    // A quarter in, the eased midpoint sits exactly between the layouts.
    batch.set_blend(0.25, 0.25);
    let quarter = batch.shade(0).unwrap();
    assert!((quarter.y.x - 20.0).abs() < 1e-4);
}

#[test]
fn test_stagger_delays_high_animation_indices() {
    let (mut batch, _) = batch_for(&[(0.0, 10.0), (0.0, 10.0)], 1.0);

    // Record 0 leads, record 1 trails; full skew.
    let records = [rec("a", 0.0, 10.0), rec("b", 0.0, 10.0)];
    let mut states = RenderStates::new(&records);
    states.set_index(0, Slot::Primary, 0.0);
    states.set_index(1, Slot::Primary, 1.0);
    states.set_index(0, Slot::Secondary, 10.0);
    states.set_index(1, Slot::Secondary, 11.0);
    states.get_mut(0).animation_index = 0.0;
    states.get_mut(1).animation_index = 1.0;
    states.animation_max = 1.0;

    batch.set_y_points(&states, Slot::Primary);
    batch.set_y_points(&states, Slot::Secondary);
    batch.set_animation_indices(&states);
    batch.set_skewing(1.0);
    batch.update_pan_zoom(&ViewTransform::identity());

    batch.set_blend(0.4, 0.4);
    let leader = batch.shade(0).unwrap();
    let trailer = batch.shade(1).unwrap();

    // tx*2 = 0.8 for the leader; 0.8 - 1.0 clamps to 0 for the trailer.
    assert!(leader.y.x > 0.0, "leader already moving");
    assert!((trailer.y.x - 10.0).abs() < 1e-5, "trailer still at primary");
}

#[test]
fn test_invisible_records_are_culled_from_the_batch() {
    let records = vec![rec("a", 0.0, 10.0), rec("b", 20.0, 30.0)];
    let mut states = RenderStates::new(&records);
    states.set_index(0, Slot::Primary, 0.0);
    states.set_index(1, Slot::Primary, 1.0);
    states.get_mut(1).opacity = 0.0;

    let metrics = ChartMetrics::default();
    let mut batch = RectangleBatch::new(2, &metrics, 1.0);
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 100.0));
    batch.set_x_points(&records, &scale, RecordField::OnInDays, RecordField::OffInDays, Slot::Primary);
    batch.set_y_points(&states, Slot::Primary);
    batch.set_colours(&states);
    batch.set_animation_indices(&states);
    batch.update_pan_zoom(&ViewTransform::identity());

    assert!(batch.shade(1).is_none());
    assert_eq!(batch.quads().count(), 1);
}

#[test]
fn test_vertex_expansion_emits_two_triangles_per_rectangle() {
    let (mut batch, _) = batch_for(&[(0.0, 10.0), (20.0, 30.0)], 1.0);
    batch.update_pan_zoom(&ViewTransform::identity());

    let mut vertices: Vec<RectVertex> = Vec::new();
    batch.vertices(&mut vertices);
    assert_eq!(vertices.len(), 12, "6 vertices per visible rectangle");

    let quad = batch.shade(0).unwrap();
    let v = &vertices[0..6];
    assert_eq!(v[0].position, [quad.x.x, quad.y.x]);
    assert_eq!(v[1].position, [quad.x.y, quad.y.x]);
    assert_eq!(v[2].position, [quad.x.y, quad.y.y]);
    assert_eq!(v[3].position, [quad.x.x, quad.y.x]);
    assert_eq!(v[4].position, [quad.x.x, quad.y.y]);
    assert_eq!(v[5].position, [quad.x.y, quad.y.y]);
    for vertex in v {
        assert_eq!(vertex.colour, quad.colour);
    }

    // Pod layout: the buffer reinterprets as raw bytes for upload.
    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
    assert_eq!(bytes.len(), vertices.len() * std::mem::size_of::<RectVertex>());
}

#[test]
fn test_row_gap_tightens_when_zoomed_out() {
    let (mut batch, _) = batch_for(&[(0.0, 10.0)], 1.0);

    batch.update_pan_zoom(&ViewTransform { x: 0.0, y: 0.0, kx: 1.0, ky: 0.5 });
    assert!((batch.uniforms.row_fill - 0.875).abs() < 1e-6);

    batch.update_pan_zoom(&ViewTransform::identity());
    assert!((batch.uniforms.row_fill - 0.75).abs() < 1e-6);
}

#[test]
fn test_pan_zoom_uniforms_shift_geometry() {
    let (mut batch, _) = batch_for(&[(10.0, 20.0)], 1.0);
    batch.update_pan_zoom(&ViewTransform { x: 5.0, y: -3.0, kx: 2.0, ky: 1.0 });
    let quad = batch.shade(0).unwrap();
    assert!((quad.x.x - 25.0).abs() < 1e-5, "10 * 2 + 5");
    assert!((quad.x.y - 45.0).abs() < 1e-5);
    assert!((quad.y.x - -3.0).abs() < 1e-5);
}
