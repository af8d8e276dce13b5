use super::record::SickRecord;
use serde::{Deserialize, Serialize};

/// Comparator semantics of a record field.
///
/// `CategoricalId` fields hold numeric codes that compare numerically but
/// display through an id map; plain `Categorical` fields compare lexically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numerical,
    Categorical,
    CategoricalId,
    Date,
}

/// Typed identifier for every record field the controls can sort, group,
/// colour, animate or filter by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    OnInDays,
    OffInDays,
    TotalInDays,
    OnPercentVoyage,
    OffPercentVoyage,
    TotalPercentVoyage,
    OnDate,
    OffDate,
    OnDateNum,
    OffDateNum,
    ShipWithYear,
    Died,
    Convict,
    Quality,
    Gender,
    AgeInYears,
    AgeInYearsInt,
    Disease1Code,
    Disease2Code,
    StatusCode,
    OccupationCode,
    CrimeSentenceCat,
    PriorConvictionCount,
    LiteracyReadCat,
    LiteracyWriteCat,
    NpCountry,
    TrialPlaceLocation,
    CountryOfDeparture,
}

impl RecordField {
    pub fn kind(&self) -> FieldKind {
        use RecordField::*;
        match self {
            OnInDays | OffInDays | TotalInDays | OnPercentVoyage | OffPercentVoyage
            | TotalPercentVoyage | OnDateNum | OffDateNum | AgeInYears | AgeInYearsInt
            | CrimeSentenceCat | PriorConvictionCount => FieldKind::Numerical,
            OnDate | OffDate => FieldKind::Date,
            Gender | Disease1Code | Disease2Code | StatusCode | OccupationCode
            | CountryOfDeparture => FieldKind::CategoricalId,
            ShipWithYear | Died | Convict | Quality | LiteracyReadCat | LiteracyWriteCat
            | NpCountry | TrialPlaceLocation => FieldKind::Categorical,
        }
    }

    /// Numeric view of the field, used by the sort comparator and the colour
    /// normalization. `None` stands for an undefined value (sorted last, or
    /// first when inverted, and painted in the missing colour).
    pub fn numeric(&self, r: &SickRecord) -> Option<f64> {
        use RecordField::*;
        let v = match self {
            OnInDays => r.on_in_days,
            OffInDays => r.off_in_days,
            TotalInDays => r.total_in_days,
            OnPercentVoyage => r.on_percent_voyage,
            OffPercentVoyage => r.off_percent_voyage,
            TotalPercentVoyage => r.total_percent_voyage,
            OnDate | OnDateNum => r.on_date_num,
            OffDate | OffDateNum => r.off_date_num,
            AgeInYears => r.age_in_years?,
            AgeInYearsInt => r.age_in_years_int?,
            CrimeSentenceCat => r.crime_sentence_cat?,
            PriorConvictionCount => r.prior_conviction_count?,
            Gender => r.gender? as f64,
            Disease1Code => r.disease_1_code? as f64,
            Disease2Code => r.disease_2_code? as f64,
            StatusCode => r.status_code? as f64,
            OccupationCode => r.occupation_code? as f64,
            CountryOfDeparture => r.country_of_departure? as f64,
            Died => {
                if r.died {
                    1.0
                } else {
                    0.0
                }
            }
            Convict => {
                if r.convict {
                    1.0
                } else {
                    0.0
                }
            }
            ShipWithYear | Quality | LiteracyReadCat | LiteracyWriteCat | NpCountry
            | TrialPlaceLocation => return None,
        };
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Textual view of the field, used as grouping/filter bin key for plain
    /// categorical fields and as fallback for everything else.
    pub fn text(&self, r: &SickRecord) -> String {
        use RecordField::*;
        match self {
            ShipWithYear => r.ship_with_year.clone(),
            Quality => r.quality.clone(),
            LiteracyReadCat => r.literacy_read_cat.clone(),
            LiteracyWriteCat => r.literacy_write_cat.clone(),
            NpCountry => r.np_country.clone(),
            TrialPlaceLocation => r.trial_place_location.clone(),
            Died => {
                if r.died {
                    "Died".to_string()
                } else {
                    "Survived".to_string()
                }
            }
            Convict => {
                if r.convict {
                    "Convict".to_string()
                } else {
                    "Free".to_string()
                }
            }
            _ => self
                .numeric(r)
                .map(|v| {
                    if v.fract() == 0.0 {
                        format!("{}", v as i64)
                    } else {
                        format!("{v}")
                    }
                })
                .unwrap_or_default(),
        }
    }

    /// Human-readable label for a bin key, resolving id-mapped categoricals.
    pub fn display_label(&self, key: &str) -> String {
        if self.kind() != FieldKind::CategoricalId {
            return key.to_string();
        }
        let code: u32 = match key.parse() {
            Ok(c) => c,
            Err(_) => return key.to_string(),
        };
        let mapped = match self {
            RecordField::Gender => gender_label(code),
            RecordField::Disease1Code | RecordField::Disease2Code => disease_label(code),
            RecordField::StatusCode => status_label(code),
            RecordField::OccupationCode => occupation_label(code),
            RecordField::CountryOfDeparture => departure_label(code),
            _ => None,
        };
        mapped.map(str::to_string).unwrap_or_else(|| key.to_string())
    }
}

fn gender_label(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("Male"),
        2 => Some("Female"),
        _ => None,
    }
}

fn departure_label(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("England"),
        2 => Some("Ireland"),
        3 => Some("Bermuda"),
        _ => None,
    }
}

fn status_label(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("Convict"),
        2 => Some("Member of the ship's crew including the surgeon superintendent"),
        3 => Some("Member of the military detachment including officers"),
        4 => Some("Soldier or officer's wife"),
        5 => Some("Soldier or officer's child"),
        6 => Some("Convict's child"),
        7 => Some("Other passenger"),
        8 => Some("Other passenger's child"),
        10 => Some("Status unknown"),
        11 => Some("No data"),
        _ => None,
    }
}

fn occupation_label(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("White-collar"),
        2 => Some("Retail"),
        3 => Some("Food and drink preparation"),
        4 => Some("Construction"),
        5 => Some("Worker in wood"),
        6 => Some("Worker in metal"),
        7 => Some("Worker in leather"),
        8 => Some("Agricultural worker"),
        9 => Some("Labourer and unskilled"),
        10 => Some("Maritime"),
        11 => Some("Domestic Service"),
        13 => Some("Other trades"),
        14 => Some("Textiles"),
        15 => Some("Military service"),
        16 => Some("Mining and quarrying"),
        17 => Some("Land transport"),
        18 => Some("Printing and associated trades"),
        19 => Some("Clothing manufacturing"),
        20 => Some("Jewellers and watchmakers"),
        21 => Some("Errand boys"),
        _ => None,
    }
}

fn disease_label(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("Accident"),
        2 => Some("Convulsions and teething"),
        3 => Some("Debility and marasmus"),
        4 => Some("Diarrhoea and dysentery"),
        5 => Some("Diseases of the blood and blood forming organs"),
        6 => Some("Diseases of the circulatory system"),
        7 => Some("Diseases of the digestive system"),
        8 => Some("Diseases of the eye and ear"),
        9 => Some("Diseases of the genitourinary system"),
        10 => Some("Diseases of the musculoskeletal system"),
        11 => Some("Diseases of the nervous system"),
        12 => Some("Diseases of the respiratory system"),
        13 => Some("Diseases of the skin and subcutaneous tissue"),
        14 => Some("Endocrine, deficiency and metabolic disorders"),
        15 => Some("Influenza"),
        16 => Some("Malingering"),
        17 => Some("Measles"),
        18 => Some("Mental and behavioural disorders"),
        19 => Some("Nausea"),
        20 => Some("Neoplasm"),
        21 => Some("Old age and decay"),
        22 => Some("Other fever"),
        23 => Some("Other infectious diseases"),
        24 => Some("Other tuberculosis"),
        25 => Some("Paralysis"),
        26 => Some("Parasitic disease"),
        27 => Some("Pregnancy, childbirth and the puerperium"),
        28 => Some("Respiratory tuberculosis"),
        29 => Some("Scarlet fever"),
        30 => Some("Sexually transmitted diseases"),
        31 => Some("Suicide"),
        32 => Some("Unclassifiable"),
        33 => Some("Unknown"),
        34 => Some("Unspecified natural causes"),
        35 => Some("Vaccinated"),
        36 => Some("Whooping cough"),
        _ => None,
    }
}
