use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::{AppointmentStatus, AppointmentType};
use crate::normalize::RawRef;

/// Appointment row joined with the owning patient's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    /// Joined from patients; None when the join finds no row.
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Incoming appointment write, prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentPayload {
    pub patient_id: Option<RawRef>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub duration: Option<i32>,
    #[serde(rename = "type")]
    pub appointment_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Validated appointment record, ready to bind.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}
