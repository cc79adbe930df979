use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::{PaymentMethod, PaymentStatus, PaymentType};
use crate::normalize::RawRef;

/// Payment row joined with the owning patient's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub patient_id: i64,
    pub treatment_id: Option<i64>,
    pub appointment_id: Option<i64>,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub invoice_number: String,
    pub created_at: NaiveDateTime,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Incoming payment write, prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentPayload {
    pub patient_id: Option<RawRef>,
    pub treatment_id: Option<RawRef>,
    pub appointment_id: Option<RawRef>,
    pub payment_date: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub payment_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Validated payment record. The invoice number is assigned at insert,
/// never here, so updates can't regenerate it.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub patient_id: i64,
    pub treatment_id: Option<i64>,
    pub appointment_id: Option<i64>,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub description: Option<String>,
}
