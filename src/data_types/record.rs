use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One sicklist interval: a single illness event aboard a voyage, carrying
/// its onset/recovery pair in three parallel unit systems (elapsed days,
/// percent of voyage, calendar date) plus the categorical fields used for
/// grouping, colouring and filtering.
///
/// Field names map onto the keys of the merged sicklist JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SickRecord {
    #[serde(rename = "id", default)]
    pub id: String,
    #[serde(rename = "ConvictId", default)]
    pub convict_id: String,
    #[serde(rename = "Forenames", default)]
    pub forenames: String,
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "OnInDays", default = "f64_nan")]
    pub on_in_days: f64,
    #[serde(rename = "OffInDays", default = "f64_nan")]
    pub off_in_days: f64,
    #[serde(rename = "TotalInDays", default = "f64_nan")]
    pub total_in_days: f64,

    #[serde(rename = "OnPercentVoyage", default = "f64_nan")]
    pub on_percent_voyage: f64,
    #[serde(rename = "OffPercentVoyage", default = "f64_nan")]
    pub off_percent_voyage: f64,
    #[serde(rename = "TotalPercentVoyage", default = "f64_nan")]
    pub total_percent_voyage: f64,

    #[serde(rename = "OnDate", default, with = "naive_date_time")]
    pub on_date: Option<NaiveDateTime>,
    #[serde(rename = "OffDate", default, with = "naive_date_time")]
    pub off_date: Option<NaiveDateTime>,

    /// Dates normalized to the chart pixel domain, derived at load time.
    #[serde(skip)]
    pub on_date_num: f64,
    #[serde(skip)]
    pub off_date_num: f64,
    #[serde(skip)]
    pub convict: bool,

    #[serde(rename = "ShipWithYear", default)]
    pub ship_with_year: String,
    #[serde(rename = "Died", default)]
    pub died: bool,
    #[serde(rename = "Quality", default)]
    pub quality: String,
    #[serde(rename = "Gender", default)]
    pub gender: Option<u32>,
    #[serde(rename = "AgeInYears", default)]
    pub age_in_years: Option<f64>,
    #[serde(rename = "AgeInYearsInt", default)]
    pub age_in_years_int: Option<f64>,
    #[serde(rename = "Status.Code", default)]
    pub status_code: Option<u32>,
    #[serde(rename = "Disease.1.Code", default)]
    pub disease_1_code: Option<u32>,
    #[serde(rename = "Disease.2.Code", default)]
    pub disease_2_code: Option<u32>,
    #[serde(rename = "Disease.Classification.1", default)]
    pub disease_classification_1: String,
    #[serde(rename = "Disease.Classification.2", default)]
    pub disease_classification_2: String,
    #[serde(rename = "Disease.or.Wound", default)]
    pub disease_or_wound: String,
    #[serde(rename = "Occupation.code", default)]
    pub occupation_code: Option<u32>,
    #[serde(rename = "Occupation", default)]
    pub occupation: String,
    #[serde(rename = "Coutry.of.Departure", default)]
    pub country_of_departure: Option<u32>,

    #[serde(rename = "Year.of.Birth", default)]
    pub year_of_birth: String,
    #[serde(rename = "DeathDateDay", default)]
    pub death_date_day: String,
    #[serde(rename = "DeathDateMonth", default)]
    pub death_date_month: String,
    #[serde(rename = "DeathDateYear", default)]
    pub death_date_year: String,
    #[serde(rename = "HeightFeet", default)]
    pub height_feet: String,
    #[serde(rename = "HeightInches", default)]
    pub height_inches: String,

    #[serde(rename = "NP_Town", default)]
    pub np_town: String,
    #[serde(rename = "NP_CountyState", default)]
    pub np_county_state: String,
    #[serde(rename = "NP_Country", default)]
    pub np_country: String,
    #[serde(rename = "Trial_PlaceCourt", default)]
    pub trial_place_court: String,
    #[serde(rename = "Trial_PlaceLocation", default)]
    pub trial_place_location: String,
    #[serde(rename = "Trial_PlaceCountry", default)]
    pub trial_place_country: String,
    #[serde(rename = "Crime_Sentence", default)]
    pub crime_sentence: String,
    #[serde(rename = "Crime_SentenceCat", default)]
    pub crime_sentence_cat: Option<f64>,
    #[serde(rename = "PriorConvictionCount", default)]
    pub prior_conviction_count: Option<f64>,
    #[serde(rename = "LiteracyReadCat", default)]
    pub literacy_read_cat: String,
    #[serde(rename = "LiteracyWriteCat", default)]
    pub literacy_write_cat: String,
}

fn f64_nan() -> f64 {
    f64::NAN
}

/// Serde adaptor for the `%Y-%m-%d %H:%M:%S` date strings of the dataset.
pub(crate) mod naive_date_time {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(NaiveDateTime::parse_from_str(&s, FORMAT).ok())
    }
}

impl SickRecord {
    pub fn date_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.on_date?, self.off_date?))
    }
}

/// Parses the merged sicklist JSON array. Canonicalization is a separate
/// pass so callers control the pixel-domain width.
pub fn records_from_json(json: &str) -> eyre::Result<Vec<SickRecord>> {
    let records: Vec<SickRecord> = serde_json::from_str(json)?;
    Ok(records)
}

/// Load-time canonicalization pass.
///
/// Swaps every inverted onset/recovery pair independently per unit system so
/// that onset <= recovery holds in days, percent, date and date-num
/// simultaneously, then derives `on_date_num`/`off_date_num` by mapping the
/// canonical dates onto `[0, width]` over the full dataset date span. The
/// renderer assumes interval direction after this pass.
pub fn canonicalize_records(records: &mut [SickRecord], width: f64) {
    let mut swapped = 0usize;

    for r in records.iter_mut() {
        r.convict = !r.convict_id.is_empty();

        if r.on_in_days > r.off_in_days {
            std::mem::swap(&mut r.on_in_days, &mut r.off_in_days);
            swapped += 1;
        }
        if r.on_percent_voyage > r.off_percent_voyage {
            std::mem::swap(&mut r.on_percent_voyage, &mut r.off_percent_voyage);
        }
        if let (Some(on), Some(off)) = (r.on_date, r.off_date) {
            if on > off {
                r.on_date = Some(off);
                r.off_date = Some(on);
            }
        }
    }

    let mut min_ts = i64::MAX;
    let mut max_ts = i64::MIN;
    for r in records.iter() {
        if let Some(on) = r.on_date {
            min_ts = min_ts.min(on.and_utc().timestamp());
        }
        if let Some(off) = r.off_date {
            max_ts = max_ts.max(off.and_utc().timestamp());
        }
    }

    let span = (max_ts - min_ts) as f64;
    let scale = if span.abs() < f64::EPSILON { 0.0 } else { width / span };
    for r in records.iter_mut() {
        r.on_date_num = r
            .on_date
            .map(|d| (d.and_utc().timestamp() - min_ts) as f64 * scale)
            .unwrap_or(f64::NAN);
        r.off_date_num = r
            .off_date
            .map(|d| (d.and_utc().timestamp() - min_ts) as f64 * scale)
            .unwrap_or(f64::NAN);
    }

    info!(records = records.len(), swapped, "canonicalized sicklist records");
}
