//! Patient models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{lenient, Lifecycle, Record, RecordId};

/// A patient record as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Backend primary key - null until created
    #[serde(rename = "clientID", default)]
    pub client_id: Option<RecordId>,
    /// Printable patient code (also what the patient's QR code encodes)
    #[serde(rename = "patientID", alias = "varcharID", default)]
    pub patient_code: String,
    /// Profile photo location
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub middle_initial: Option<String>,
    /// "M" or "F"
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Age as last entered; see [`Patient::age_on`] for the derived value
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, with = "lenient::date")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default, with = "lenient::date")]
    pub last_delivery: Option<NaiveDate>,
    /// National health insurance number
    #[serde(rename = "philhealthID", default)]
    pub philhealth_id: Option<String>,
    #[serde(default, with = "lenient::date")]
    pub expected_date_confinement: Option<NaiveDate>,
    #[serde(default)]
    pub spouse: Option<Spouse>,
    #[serde(default)]
    pub pregnancy: Option<Pregnancy>,
    #[serde(default)]
    pub consultation: Option<Consultation>,
    #[serde(default)]
    pub medical_history: Option<MedicalHistory>,
    /// Active or archived; patients are never hard-deleted from the desk
    #[serde(default)]
    pub status: Lifecycle,
}

/// Spouse details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Spouse {
    #[serde(alias = "spouse_name", default)]
    pub spouse_name: Option<String>,
    #[serde(alias = "spouse_birthday", default, with = "lenient::date")]
    pub spouse_birthday: Option<NaiveDate>,
    #[serde(alias = "spouse_religion", default)]
    pub spouse_religion: Option<String>,
    #[serde(alias = "spouse_occupation", default)]
    pub spouse_occupation: Option<String>,
    #[serde(alias = "spouse_contact_number", default)]
    pub spouse_contact_number: Option<String>,
    #[serde(default)]
    pub spouse_age: Option<u32>,
}

/// Obstetric history (G/P/TPAL) and key dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pregnancy {
    #[serde(default)]
    pub gravida: Option<u32>,
    #[serde(default)]
    pub para: Option<u32>,
    #[serde(default)]
    pub term: Option<u32>,
    #[serde(alias = "pre_term", default)]
    pub pre_term: Option<u32>,
    #[serde(default)]
    pub abortion: Option<u32>,
    #[serde(default)]
    pub living: Option<u32>,
    /// Last menstrual period
    #[serde(rename = "LMP", default, with = "lenient::date")]
    pub lmp: Option<NaiveDate>,
    /// Expected date of confinement
    #[serde(rename = "EDC", default, with = "lenient::date")]
    pub edc: Option<NaiveDate>,
    #[serde(rename = "ITDate", alias = "IT_date", default, with = "lenient::date")]
    pub it_date: Option<NaiveDate>,
    #[serde(default)]
    pub menarche: Option<String>,
}

/// Most recent consultation vitals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Consultation {
    #[serde(default, with = "lenient::date")]
    pub consultation_date: Option<NaiveDate>,
    /// Age of gestation, weeks
    #[serde(rename = "AOG", default)]
    pub aog: Option<u32>,
    /// Blood pressure, e.g. "120/80"
    #[serde(rename = "BP", default)]
    pub bp: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Fundal height
    #[serde(rename = "FH", default)]
    pub fh: Option<f64>,
    /// Fetal heart tone
    #[serde(rename = "FHT", default)]
    pub fht: Option<f64>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Risk factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalHistory {
    pub smoking: bool,
    pub allergies: Option<String>,
    #[serde(alias = "drug_intake")]
    pub drug_intake: bool,
    #[serde(alias = "bleeding_anemia")]
    pub bleeding_anemia: bool,
    #[serde(alias = "diabetes_congenital_anomalies")]
    pub diabetes_congenital_anomalies: bool,
    #[serde(alias = "Previous_C_section")]
    pub previous_c_section: bool,
    #[serde(rename = "consectuivemiscarriage", alias = "consectuive_miscarriages")]
    pub consecutive_miscarriage: bool,
    #[serde(alias = "post_partum_hemorrhage")]
    pub post_partum_hemorrhage: bool,
    #[serde(alias = "forcep_delivery")]
    pub forcep_delivery: bool,
    pub hypertension: bool,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(given_name: String, last_name: String) -> Self {
        Self {
            given_name,
            last_name,
            ..Default::default()
        }
    }

    /// "Given M. Last", skipping absent parts.
    pub fn full_name(&self) -> String {
        let initial = self
            .middle_initial
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| format!("{}.", m.trim_end_matches('.')));

        [Some(self.given_name.trim()), initial.as_deref(), Some(self.last_name.trim())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Age in whole years on `today`, from the birthday.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        age_between(self.birthday?, today)
    }

    /// Derived age when a birthday is known, else the stored age.
    pub fn display_age(&self, today: NaiveDate) -> Option<u32> {
        self.age_on(today).or(self.age)
    }

    pub fn is_archived(&self) -> bool {
        !self.status.is_active()
    }
}

/// Whole years from `birth` to `today`; `None` if `birth` is in the future.
pub fn age_between(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

impl Record for Patient {
    const NOUN: &'static str = "Patient";

    fn id(&self) -> Option<RecordId> {
        self.client_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.client_id = Some(id);
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.full_name(), self.patient_code.clone()]
    }
}
