use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::TreatmentType;
use crate::normalize::RawRef;

/// Treatment row joined with the owning patient's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: i64,
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    pub treatment_date: Option<NaiveDate>,
    pub tooth_number: Option<String>,
    pub treatment_type: Option<TreatmentType>,
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub procedure_details: Option<String>,
    pub notes: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Incoming treatment write. `procedure` is the legacy spelling of
/// `procedureDetails`; the first non-empty of the two wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreatmentPayload {
    pub patient_id: Option<RawRef>,
    pub appointment_id: Option<RawRef>,
    pub treatment_date: Option<String>,
    pub tooth_number: Option<String>,
    pub treatment_type: Option<String>,
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub procedure_details: Option<String>,
    pub procedure: Option<String>,
    pub notes: Option<String>,
    pub next_visit_date: Option<String>,
}

/// Normalized treatment record, ready to bind.
#[derive(Debug, Clone)]
pub struct NewTreatment {
    pub patient_id: Option<i64>,
    pub appointment_id: Option<i64>,
    pub treatment_date: Option<NaiveDate>,
    pub tooth_number: Option<String>,
    pub treatment_type: Option<TreatmentType>,
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub procedure_details: Option<String>,
    pub notes: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
}
