use chrono::NaiveDate;
use sicklist_chart::data_types::{canonicalize_records, records_from_json, SickRecord};

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn rec(on_days: f64, off_days: f64, on_pct: f64, off_pct: f64) -> SickRecord {
    SickRecord {
        on_in_days: on_days,
        off_in_days: off_days,
        on_percent_voyage: on_pct,
        off_percent_voyage: off_pct,
        on_date: Some(date(1838, 3, 10)),
        off_date: Some(date(1838, 3, 20)),
        ..Default::default()
    }
}

#[test]
fn test_inverted_pairs_are_swapped_in_every_unit_system() {
    let mut records = vec![
        rec(5.0, 1.0, 50.0, 10.0),
        rec(1.0, 5.0, 10.0, 50.0),
        SickRecord {
            on_date: Some(date(1838, 6, 1)),
            off_date: Some(date(1838, 5, 1)),
            on_in_days: 3.0,
            off_in_days: 2.0,
            on_percent_voyage: 30.0,
            off_percent_voyage: 20.0,
            ..Default::default()
        },
    ];

    canonicalize_records(&mut records, 1024.0);

    for r in &records {
        assert!(r.on_in_days <= r.off_in_days);
        assert!(r.on_percent_voyage <= r.off_percent_voyage);
        if let (Some(on), Some(off)) = (r.on_date, r.off_date) {
            assert!(on <= off);
        }
        assert!(r.on_date_num <= r.off_date_num);
    }
}

#[test]
fn test_date_num_normalizes_to_chart_width() {
    let mut records = vec![
        SickRecord {
            on_date: Some(date(1838, 1, 1)),
            off_date: Some(date(1838, 6, 1)),
            ..Default::default()
        },
        SickRecord {
            on_date: Some(date(1838, 6, 1)),
            off_date: Some(date(1838, 12, 31)),
            ..Default::default()
        },
    ];

    canonicalize_records(&mut records, 1024.0);

    assert_eq!(records[0].on_date_num, 0.0);
    assert!((records[1].off_date_num - 1024.0).abs() < 1e-6);
    assert!(records[0].off_date_num > 0.0 && records[0].off_date_num < 1024.0);
    // Both records see the same mapping for the shared date.
    assert!((records[0].off_date_num - records[1].on_date_num).abs() < 1e-9);
}

#[test]
fn test_missing_dates_yield_nan_date_nums() {
    let mut records = vec![
        SickRecord {
            on_date: Some(date(1838, 1, 1)),
            off_date: Some(date(1838, 2, 1)),
            ..Default::default()
        },
        SickRecord::default(),
    ];
    canonicalize_records(&mut records, 1024.0);
    assert!(records[1].on_date_num.is_nan());
    assert!(records[1].off_date_num.is_nan());
}

#[test]
fn test_convict_flag_derives_from_convict_id() {
    let mut records = vec![
        SickRecord {
            convict_id: "C1234".to_string(),
            ..Default::default()
        },
        SickRecord::default(),
    ];
    canonicalize_records(&mut records, 1024.0);
    assert!(records[0].convict);
    assert!(!records[1].convict);
}

#[test]
fn test_record_deserializes_from_dataset_keys() {
    let json = r#"{
        "id": "S-17",
        "ConvictId": "C-99",
        "Forenames": "John",
        "Name": "Doe",
        "OnInDays": 3.0,
        "OffInDays": 8.0,
        "OnPercentVoyage": 2.5,
        "OffPercentVoyage": 6.0,
        "OnDate": "1838-03-10 00:00:00",
        "OffDate": "1838-03-15 00:00:00",
        "ShipWithYear": "Asia 1820",
        "Died": true,
        "Gender": 1,
        "Disease.1.Code": 15,
        "Disease.Classification.1": "Influenza",
        "Status.Code": 1
    }"#;

    let r: SickRecord = serde_json::from_str(json).unwrap();
    let from_array = records_from_json(&format!("[{json}]")).unwrap();
    assert_eq!(from_array.len(), 1);
    assert_eq!(from_array[0].id, r.id);
    assert_eq!(r.id, "S-17");
    assert_eq!(r.forenames, "John");
    assert_eq!(r.on_in_days, 3.0);
    assert_eq!(r.off_percent_voyage, 6.0);
    assert_eq!(r.on_date, Some(date(1838, 3, 10)));
    assert_eq!(r.ship_with_year, "Asia 1820");
    assert!(r.died);
    assert_eq!(r.gender, Some(1));
    assert_eq!(r.disease_1_code, Some(15));
    assert_eq!(r.disease_classification_1, "Influenza");
    // Unset numeric fields stay undefined rather than zero.
    assert!(r.total_in_days.is_nan());
    assert!(r.age_in_years.is_none());
}
