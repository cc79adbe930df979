//! Entity validators for appointment, payment, treatment and patient
//! writes.
//!
//! Validation is split in two stages. The `*_fields` functions are pure:
//! they clean placeholders, enforce required fields and parse dates, times
//! and enum values without touching the store, so handlers can reject bad
//! payloads before acquiring a connection. The `ensure_*` functions run
//! the existence checks that need a connection; `check_*` combines both
//! for callers that already hold one.

use thiserror::Error;
use tokio_postgres::Client;

use super::StoreError;
use crate::models::{
    AppointmentPayload, NewAppointment, NewPatient, NewPayment, NewTreatment, PatientPayload,
    PaymentPayload, TreatmentPayload,
};
use crate::normalize::{clean_date, clean_reference, clean_string, RefValue};
use crate::schedule;

#[derive(Error, Debug)]
pub enum ValidateError {
    /// Payload fails validation; reported to clients as a 400.
    #[error("{0}")]
    Invalid(String),

    /// The existence check itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

const PATIENT_REQUIRED: &str = "Patient ID is required and must be valid";
const APPOINTMENT_REQUIRED: &str = "Appointment date, time, and type are required";
const PAYMENT_REQUIRED: &str = "Payment date, amount, method, and type are required";

fn patient_missing(id: &str) -> ValidateError {
    ValidateError::Invalid(format!("Patient with ID {id} does not exist"))
}

fn treatment_missing(id: &str) -> ValidateError {
    ValidateError::Invalid(format!("Treatment with ID {id} does not exist"))
}

/// Parses an already-cleaned optional date string.
fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<chrono::NaiveDate>, ValidateError> {
    match clean_date(raw) {
        None => Ok(None),
        Some(s) => schedule::calendar_date(&s)
            .map(Some)
            .ok_or_else(|| ValidateError::Invalid(format!("Invalid {field}: {s}"))),
    }
}

fn parse_enum<T>(field: &str, value: &str) -> Result<T, ValidateError>
where
    T: std::str::FromStr<Err = StoreError>,
{
    value
        .parse()
        .map_err(|_| ValidateError::Invalid(format!("Invalid {field}: {value}")))
}

/// Cleans and types a patient write. Names are cleaned but not required
/// here; the store's NOT NULL constraints have the final word.
pub fn patient_fields(payload: &PatientPayload) -> Result<NewPatient, ValidateError> {
    Ok(NewPatient {
        first_name: clean_string(payload.first_name.as_deref()),
        last_name: clean_string(payload.last_name.as_deref()),
        date_of_birth: parse_optional_date("date of birth", payload.date_of_birth.as_deref())?,
        gender: clean_string(payload.gender.as_deref()),
        phone: clean_string(payload.phone.as_deref()),
        email: clean_string(payload.email.as_deref()),
        address: clean_string(payload.address.as_deref()),
        emergency_contact: clean_string(payload.emergency_contact.as_deref()),
        emergency_phone: clean_string(payload.emergency_phone.as_deref()),
        medical_history: clean_string(payload.medical_history.as_deref()),
        allergies: clean_string(payload.allergies.as_deref()),
        insurance_provider: clean_string(payload.insurance_provider.as_deref()),
        insurance_number: clean_string(payload.insurance_number.as_deref()),
        last_visit: parse_optional_date("last visit date", payload.last_visit.as_deref())?,
    })
}

/// Validates an appointment write without touching the store.
pub fn appointment_fields(payload: &AppointmentPayload) -> Result<NewAppointment, ValidateError> {
    let patient_ref = clean_reference(payload.patient_id.as_ref());
    if patient_ref == RefValue::Absent {
        return Err(ValidateError::Invalid(PATIENT_REQUIRED.to_string()));
    }

    let date_raw = clean_date(payload.appointment_date.as_deref());
    let time_raw = clean_string(payload.appointment_time.as_deref());
    let type_raw = clean_string(payload.appointment_type.as_deref());
    let (Some(date_raw), Some(time_raw), Some(type_raw)) = (date_raw, time_raw, type_raw) else {
        return Err(ValidateError::Invalid(APPOINTMENT_REQUIRED.to_string()));
    };

    let appointment_date = schedule::calendar_date(&date_raw)
        .ok_or_else(|| ValidateError::Invalid(format!("Invalid appointment date: {date_raw}")))?;
    let appointment_time = schedule::parse_time(&time_raw)
        .ok_or_else(|| ValidateError::Invalid(format!("Invalid appointment time: {time_raw}")))?;
    let appointment_type = parse_enum("appointment type", &type_raw)?;
    let status = match clean_string(payload.status.as_deref()) {
        None => crate::models::enums::AppointmentStatus::Scheduled,
        Some(s) => parse_enum("appointment status", &s)?,
    };

    let patient_id = match patient_ref {
        RefValue::Id(id) => id,
        RefValue::Invalid(text) => return Err(patient_missing(&text)),
        RefValue::Absent => unreachable!("absent reference rejected above"),
    };

    Ok(NewAppointment {
        patient_id,
        appointment_date,
        appointment_time,
        duration: payload.duration.unwrap_or(30),
        appointment_type,
        status,
        notes: clean_string(payload.notes.as_deref()),
    })
}

/// Validates a payment write without touching the store. The treatment
/// reference, when numeric, still needs [`ensure_treatment_exists`].
pub fn payment_fields(payload: &PaymentPayload) -> Result<NewPayment, ValidateError> {
    let patient_ref = clean_reference(payload.patient_id.as_ref());
    if patient_ref == RefValue::Absent {
        return Err(ValidateError::Invalid(PATIENT_REQUIRED.to_string()));
    }

    // Treatment is optional but existence-checked when present, so bad
    // text is an error. The appointment reference carries no FK and is
    // never checked; anything unusable simply collapses to NULL.
    let treatment_id = match clean_reference(payload.treatment_id.as_ref()) {
        RefValue::Absent => None,
        RefValue::Id(id) => Some(id),
        RefValue::Invalid(text) => return Err(treatment_missing(&text)),
    };
    let appointment_id = clean_reference(payload.appointment_id.as_ref()).id();

    let date_raw = clean_date(payload.payment_date.as_deref());
    let method_raw = clean_string(payload.payment_method.as_deref());
    let type_raw = clean_string(payload.payment_type.as_deref());
    let amount = payload.amount.filter(|a| *a != 0.0);
    let (Some(date_raw), Some(amount), Some(method_raw), Some(type_raw)) =
        (date_raw, amount, method_raw, type_raw)
    else {
        return Err(ValidateError::Invalid(PAYMENT_REQUIRED.to_string()));
    };

    let payment_date = schedule::calendar_date(&date_raw)
        .ok_or_else(|| ValidateError::Invalid(format!("Invalid payment date: {date_raw}")))?;
    let payment_method = parse_enum("payment method", &method_raw)?;
    let payment_type = parse_enum("payment type", &type_raw)?;
    let status = match clean_string(payload.status.as_deref()) {
        None => crate::models::enums::PaymentStatus::Paid,
        Some(s) => parse_enum("payment status", &s)?,
    };

    let patient_id = match patient_ref {
        RefValue::Id(id) => id,
        RefValue::Invalid(text) => return Err(patient_missing(&text)),
        RefValue::Absent => unreachable!("absent reference rejected above"),
    };

    Ok(NewPayment {
        patient_id,
        treatment_id,
        appointment_id,
        payment_date,
        amount,
        payment_method,
        payment_type,
        status,
        description: clean_string(payload.description.as_deref()),
    })
}

/// Normalizes a treatment write. Treatments carry no required-field rules;
/// references are cleaned but never existence-checked here, the schema FKs
/// enforce them at insert.
pub fn treatment_fields(payload: &TreatmentPayload) -> Result<NewTreatment, ValidateError> {
    let treatment_type = match clean_string(payload.treatment_type.as_deref()) {
        None => None,
        Some(s) => Some(parse_enum("treatment type", &s)?),
    };

    // First non-empty of procedureDetails / legacy procedure wins.
    let procedure_details = clean_string(payload.procedure_details.as_deref())
        .or_else(|| clean_string(payload.procedure.as_deref()));

    Ok(NewTreatment {
        patient_id: clean_reference(payload.patient_id.as_ref()).id(),
        appointment_id: clean_reference(payload.appointment_id.as_ref()).id(),
        treatment_date: parse_optional_date("treatment date", payload.treatment_date.as_deref())?,
        tooth_number: clean_string(payload.tooth_number.as_deref()),
        treatment_type,
        description: clean_string(payload.description.as_deref()),
        diagnosis: clean_string(payload.diagnosis.as_deref()),
        procedure_details,
        notes: clean_string(payload.notes.as_deref()),
        next_visit_date: parse_optional_date(
            "next visit date",
            payload.next_visit_date.as_deref(),
        )?,
    })
}

/// Fails with "does not exist" unless a patient row with this id is
/// present.
pub async fn ensure_patient_exists(client: &Client, patient_id: i64) -> Result<(), ValidateError> {
    let row = client
        .query_opt("SELECT id FROM patients WHERE id = $1", &[&patient_id])
        .await
        .map_err(StoreError::from)?;
    match row {
        Some(_) => Ok(()),
        None => Err(patient_missing(&patient_id.to_string())),
    }
}

/// Fails with "does not exist" unless a treatment row with this id is
/// present.
pub async fn ensure_treatment_exists(
    client: &Client,
    treatment_id: i64,
) -> Result<(), ValidateError> {
    let row = client
        .query_opt("SELECT id FROM treatments WHERE id = $1", &[&treatment_id])
        .await
        .map_err(StoreError::from)?;
    match row {
        Some(_) => Ok(()),
        None => Err(treatment_missing(&treatment_id.to_string())),
    }
}

/// Full appointment validation for callers already holding a connection.
pub async fn check_appointment(
    client: &Client,
    payload: &AppointmentPayload,
) -> Result<NewAppointment, ValidateError> {
    let record = appointment_fields(payload)?;
    ensure_patient_exists(client, record.patient_id).await?;
    Ok(record)
}

/// Full payment validation for callers already holding a connection.
pub async fn check_payment(
    client: &Client,
    payload: &PaymentPayload,
) -> Result<NewPayment, ValidateError> {
    let record = payment_fields(payload)?;
    ensure_patient_exists(client, record.patient_id).await?;
    if let Some(treatment_id) = record.treatment_id {
        ensure_treatment_exists(client, treatment_id).await?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{
        AppointmentStatus, AppointmentType, PaymentMethod, PaymentStatus, PaymentType,
    };
    use crate::normalize::RawRef;

    fn valid_appointment() -> AppointmentPayload {
        AppointmentPayload {
            patient_id: Some(RawRef::Number(1)),
            appointment_date: Some("2025-06-01".to_string()),
            appointment_time: Some("14:30".to_string()),
            appointment_type: Some("Cleaning".to_string()),
            ..AppointmentPayload::default()
        }
    }

    fn valid_payment() -> PaymentPayload {
        PaymentPayload {
            patient_id: Some(RawRef::Number(1)),
            payment_date: Some("2025-06-01".to_string()),
            amount: Some(150.0),
            payment_method: Some("Cash".to_string()),
            payment_type: Some("Full Payment".to_string()),
            ..PaymentPayload::default()
        }
    }

    fn message(err: ValidateError) -> String {
        match err {
            ValidateError::Invalid(m) => m,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn appointment_accepts_a_valid_payload() {
        let record = appointment_fields(&valid_appointment()).unwrap();
        assert_eq!(record.patient_id, 1);
        assert_eq!(record.duration, 30);
        assert_eq!(record.appointment_type, AppointmentType::Cleaning);
        assert_eq!(record.status, AppointmentStatus::Scheduled);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn appointment_rejects_every_patient_placeholder() {
        for patient_id in [
            None,
            Some(RawRef::Number(0)),
            Some(RawRef::Text("0".to_string())),
            Some(RawRef::Text(String::new())),
            Some(RawRef::Text("   ".to_string())),
        ] {
            let payload = AppointmentPayload {
                patient_id,
                ..valid_appointment()
            };
            let msg = message(appointment_fields(&payload).unwrap_err());
            assert_eq!(msg, PATIENT_REQUIRED);
        }
    }

    #[test]
    fn appointment_rejects_missing_date_time_or_type() {
        for broken in [
            AppointmentPayload {
                appointment_date: None,
                ..valid_appointment()
            },
            AppointmentPayload {
                appointment_time: Some(String::new()),
                ..valid_appointment()
            },
            AppointmentPayload {
                appointment_type: None,
                ..valid_appointment()
            },
            AppointmentPayload {
                appointment_date: Some("undefined".to_string()),
                ..valid_appointment()
            },
        ] {
            let msg = message(appointment_fields(&broken).unwrap_err());
            assert_eq!(msg, APPOINTMENT_REQUIRED);
        }
    }

    #[test]
    fn appointment_rejects_non_numeric_patient_text() {
        let payload = AppointmentPayload {
            patient_id: Some(RawRef::Text("abc".to_string())),
            ..valid_appointment()
        };
        let msg = message(appointment_fields(&payload).unwrap_err());
        assert_eq!(msg, "Patient with ID abc does not exist");
    }

    #[test]
    fn appointment_rejects_unparseable_date_and_time() {
        let bad_date = AppointmentPayload {
            appointment_date: Some("next tuesday".to_string()),
            ..valid_appointment()
        };
        assert!(message(appointment_fields(&bad_date).unwrap_err())
            .starts_with("Invalid appointment date"));

        let bad_time = AppointmentPayload {
            appointment_time: Some("noon".to_string()),
            ..valid_appointment()
        };
        assert!(message(appointment_fields(&bad_time).unwrap_err())
            .starts_with("Invalid appointment time"));
    }

    #[test]
    fn appointment_accepts_timestamp_dates_without_shifting() {
        let payload = AppointmentPayload {
            appointment_date: Some("2025-06-01T00:00:00.000Z".to_string()),
            ..valid_appointment()
        };
        let record = appointment_fields(&payload).unwrap();
        assert_eq!(
            record.appointment_date,
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn appointment_applies_defaults_and_overrides() {
        let payload = AppointmentPayload {
            duration: Some(45),
            status: Some("Completed".to_string()),
            notes: Some("bring x-rays".to_string()),
            ..valid_appointment()
        };
        let record = appointment_fields(&payload).unwrap();
        assert_eq!(record.duration, 45);
        assert_eq!(record.status, AppointmentStatus::Completed);
        assert_eq!(record.notes.as_deref(), Some("bring x-rays"));
    }

    #[test]
    fn appointment_rejects_unknown_enum_values() {
        let payload = AppointmentPayload {
            appointment_type: Some("Telepathy".to_string()),
            ..valid_appointment()
        };
        let msg = message(appointment_fields(&payload).unwrap_err());
        assert_eq!(msg, "Invalid appointment type: Telepathy");
    }

    #[test]
    fn payment_accepts_a_valid_payload() {
        let record = payment_fields(&valid_payment()).unwrap();
        assert_eq!(record.patient_id, 1);
        assert_eq!(record.amount, 150.0);
        assert_eq!(record.payment_method, PaymentMethod::Cash);
        assert_eq!(record.payment_type, PaymentType::FullPayment);
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.treatment_id, None);
        assert_eq!(record.appointment_id, None);
    }

    #[test]
    fn payment_rejects_every_patient_placeholder() {
        for patient_id in [
            None,
            Some(RawRef::Number(0)),
            Some(RawRef::Text("0".to_string())),
            Some(RawRef::Text(String::new())),
        ] {
            let payload = PaymentPayload {
                patient_id,
                ..valid_payment()
            };
            let msg = message(payment_fields(&payload).unwrap_err());
            assert_eq!(msg, PATIENT_REQUIRED);
        }
    }

    #[test]
    fn payment_optional_refs_collapse_placeholders_to_none() {
        for placeholder in [
            Some(RawRef::Number(0)),
            Some(RawRef::Text("0".to_string())),
            Some(RawRef::Text(" ".to_string())),
            None,
        ] {
            let payload = PaymentPayload {
                treatment_id: placeholder.clone(),
                appointment_id: placeholder,
                ..valid_payment()
            };
            let record = payment_fields(&payload).unwrap();
            assert_eq!(record.treatment_id, None);
            assert_eq!(record.appointment_id, None);
        }
    }

    #[test]
    fn payment_keeps_real_optional_refs() {
        let payload = PaymentPayload {
            treatment_id: Some(RawRef::Number(12)),
            appointment_id: Some(RawRef::Text("34".to_string())),
            ..valid_payment()
        };
        let record = payment_fields(&payload).unwrap();
        assert_eq!(record.treatment_id, Some(12));
        assert_eq!(record.appointment_id, Some(34));
    }

    #[test]
    fn payment_invalid_treatment_text_is_an_error() {
        let payload = PaymentPayload {
            treatment_id: Some(RawRef::Text("abc".to_string())),
            ..valid_payment()
        };
        let msg = message(payment_fields(&payload).unwrap_err());
        assert_eq!(msg, "Treatment with ID abc does not exist");
    }

    #[test]
    fn payment_invalid_appointment_text_collapses_to_none() {
        let payload = PaymentPayload {
            appointment_id: Some(RawRef::Text("abc".to_string())),
            ..valid_payment()
        };
        let record = payment_fields(&payload).unwrap();
        assert_eq!(record.appointment_id, None);
    }

    #[test]
    fn payment_rejects_missing_or_zero_amount() {
        for amount in [None, Some(0.0)] {
            let payload = PaymentPayload {
                amount,
                ..valid_payment()
            };
            let msg = message(payment_fields(&payload).unwrap_err());
            assert_eq!(msg, PAYMENT_REQUIRED);
        }
    }

    #[test]
    fn payment_rejects_missing_method_or_type() {
        for broken in [
            PaymentPayload {
                payment_method: None,
                ..valid_payment()
            },
            PaymentPayload {
                payment_type: Some(String::new()),
                ..valid_payment()
            },
            PaymentPayload {
                payment_date: Some("   ".to_string()),
                ..valid_payment()
            },
        ] {
            let msg = message(payment_fields(&broken).unwrap_err());
            assert_eq!(msg, PAYMENT_REQUIRED);
        }
    }

    #[test]
    fn payment_status_defaults_to_paid_and_parses_overrides() {
        let pending = PaymentPayload {
            status: Some("Pending".to_string()),
            ..valid_payment()
        };
        assert_eq!(
            payment_fields(&pending).unwrap().status,
            PaymentStatus::Pending
        );
        let blank = PaymentPayload {
            status: Some(String::new()),
            ..valid_payment()
        };
        assert_eq!(payment_fields(&blank).unwrap().status, PaymentStatus::Paid);
    }

    #[test]
    fn treatment_normalizes_refs_and_procedure_alias() {
        let payload = TreatmentPayload {
            patient_id: Some(RawRef::Number(2)),
            appointment_id: Some(RawRef::Text("0".to_string())),
            procedure_details: Some(String::new()),
            procedure: Some("Scaling".to_string()),
            treatment_type: Some("Cleaning".to_string()),
            ..TreatmentPayload::default()
        };
        let record = treatment_fields(&payload).unwrap();
        assert_eq!(record.patient_id, Some(2));
        assert_eq!(record.appointment_id, None);
        assert_eq!(record.procedure_details.as_deref(), Some("Scaling"));
    }

    #[test]
    fn treatment_prefers_procedure_details_over_legacy_alias() {
        let payload = TreatmentPayload {
            procedure_details: Some("Primary".to_string()),
            procedure: Some("Legacy".to_string()),
            ..TreatmentPayload::default()
        };
        let record = treatment_fields(&payload).unwrap();
        assert_eq!(record.procedure_details.as_deref(), Some("Primary"));
    }

    #[test]
    fn treatment_tolerates_a_fully_empty_payload() {
        let record = treatment_fields(&TreatmentPayload::default()).unwrap();
        assert_eq!(record.patient_id, None);
        assert_eq!(record.treatment_type, None);
        assert_eq!(record.procedure_details, None);
    }

    #[test]
    fn treatment_cleans_date_placeholders() {
        let payload = TreatmentPayload {
            treatment_date: Some("undefined".to_string()),
            next_visit_date: Some("  ".to_string()),
            ..TreatmentPayload::default()
        };
        let record = treatment_fields(&payload).unwrap();
        assert_eq!(record.treatment_date, None);
        assert_eq!(record.next_visit_date, None);
    }

    #[test]
    fn patient_fields_clean_and_parse() {
        let payload = PatientPayload {
            first_name: Some("Ana".to_string()),
            last_name: Some(String::new()),
            date_of_birth: Some("1990-04-12".to_string()),
            last_visit: Some("undefined".to_string()),
            ..PatientPayload::default()
        };
        let record = patient_fields(&payload).unwrap();
        assert_eq!(record.first_name.as_deref(), Some("Ana"));
        assert_eq!(record.last_name, None);
        assert_eq!(
            record.date_of_birth,
            chrono::NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert_eq!(record.last_visit, None);
    }

    #[test]
    fn patient_rejects_unparseable_dates() {
        let payload = PatientPayload {
            date_of_birth: Some("long ago".to_string()),
            ..PatientPayload::default()
        };
        assert!(message(patient_fields(&payload).unwrap_err())
            .starts_with("Invalid date of birth"));
    }
}
