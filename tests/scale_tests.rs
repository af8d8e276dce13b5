use chrono::NaiveDate;
use sicklist_chart::data_types::AxisMode;
use sicklist_chart::scales::ChartScale;
use sicklist_chart::transform::ViewTransform;

#[test]
fn test_linear_map_and_invert() {
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 500.0));

    assert_eq!(scale.map(0.0), 0.0);
    assert_eq!(scale.map(50.0), 250.0);
    assert_eq!(scale.map(100.0), 500.0);

    assert_eq!(scale.invert(0.0), 0.0);
    assert_eq!(scale.invert(250.0), 50.0);
    assert_eq!(scale.invert(500.0), 100.0);
}

#[test]
fn test_degenerate_domain_is_widened() {
    let scale = ChartScale::new_linear((5.0, 5.0), (0.0, 100.0));
    let (d_min, d_max) = scale.domain();
    assert!(d_max > d_min);
    assert!(scale.map(5.0).is_finite());
}

#[test]
fn test_nan_maps_to_zero() {
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 500.0));
    assert_eq!(scale.map(f64::NAN), 0.0);
}

#[test]
fn test_rescaled_composition_equals_affine_transform() {
    let base = ChartScale::new_linear((0.0, 200.0), (0.0, 800.0));
    let t = ViewTransform { x: 37.0, y: -12.0, kx: 2.5, ky: 0.5 };

    let eff_x = base.rescaled_x(&t);
    let eff_y = base.rescaled_y(&t);

    for v in [0.0, 13.0, 50.0, 123.4, 200.0] {
        let expected_x = base.map(v) as f64 * t.kx + t.x;
        assert!(
            (eff_x.map(v) as f64 - expected_x).abs() < 0.01,
            "effective({v}) = {} want {expected_x}",
            eff_x.map(v)
        );
        let expected_y = base.map(v) as f64 * t.ky + t.y;
        assert!((eff_y.map(v) as f64 - expected_y).abs() < 0.01);
    }
}

#[test]
fn test_rescaled_identity_is_identity() {
    let base = ChartScale::new_linear((0.0, 100.0), (0.0, 1024.0));
    let eff = base.rescaled_x(&ViewTransform::identity());
    for v in [0.0, 42.0, 100.0] {
        assert!((eff.map(v) - base.map(v)).abs() < 1e-3);
    }
}

#[test]
fn test_linear_coeffs_reproduce_map() {
    let scale = ChartScale::new_linear((10.0, 20.0), (100.0, 300.0));
    let (m, c) = scale.get_linear_coeffs();
    for v in [10.0f32, 15.0, 20.0] {
        assert!((v * m + c - scale.map(v as f64)).abs() < 1e-3);
    }
}

#[test]
fn test_day_and_percent_tick_formats() {
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 500.0));
    assert_eq!(scale.format_tick(5.0, AxisMode::InDays), "5 days");
    assert_eq!(scale.format_tick(50.0, AxisMode::PercentVoyage), "50%");
    assert_eq!(scale.format_tick(2.5, AxisMode::InDays), "2.5 days");
}

#[test]
fn test_date_tick_formats_as_calendar_date() {
    let on = NaiveDate::from_ymd_opt(1838, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp() as f64;
    let off = NaiveDate::from_ymd_opt(1838, 9, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp() as f64;

    // Sub-year visible span: full date labels.
    let scale = ChartScale::new_linear((on, off), (0.0, 1024.0));
    assert_eq!(scale.format_tick(on, AxisMode::Date), "March 01, 1838");
}

#[test]
fn test_date_tick_coarsens_across_multi_year_spans() {
    let y1820 = NaiveDate::from_ymd_opt(1820, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp() as f64;
    let y1840 = NaiveDate::from_ymd_opt(1840, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp() as f64;

    let scale = ChartScale::new_linear((y1820, y1840), (0.0, 1024.0));
    assert_eq!(scale.format_tick(y1820, AxisMode::Date), "1820");
}

#[test]
fn test_ticks_cover_domain() {
    let scale = ChartScale::new_linear((0.0, 100.0), (0.0, 500.0));
    let ticks = scale.ticks(5);
    assert!(!ticks.is_empty());
    for t in &ticks {
        assert!(*t >= -1e-9 && *t <= 100.0 + 1e-9);
    }
}
