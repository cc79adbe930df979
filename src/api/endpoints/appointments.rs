//! Appointment endpoints.
//!
//! - `GET /api/appointments`: list with optional `date` / `patientId`
//!   filters
//! - `POST /api/appointments`: create (validated)
//! - `PUT /api/appointments/:id`: update (validated the same way)
//! - `DELETE /api/appointments/:id`: delete

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::ApiContext;
use crate::db::{repository, validate};
use crate::models::{Appointment, AppointmentFilter, AppointmentPayload};
use crate::schedule;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub date: Option<String>,
    pub patient_id: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

pub(super) fn parse_date_filter(raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => schedule::calendar_date(s)
            .map(Some)
            .ok_or_else(|| ApiError::Validation(format!("Invalid date filter: {s}"))),
    }
}

pub(super) fn parse_patient_filter(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("Invalid patientId filter: {s}"))),
    }
}

/// `GET /api/appointments`: list, most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let filter = AppointmentFilter {
        date: parse_date_filter(params.date.as_deref())?,
        patient_id: parse_patient_filter(params.patient_id.as_deref())?,
    };
    let client = ctx.db.client().await?;
    let appointments = repository::list_appointments(&client, &filter).await?;
    Ok(Json(appointments))
}

/// `POST /api/appointments`: validate, create, echo the joined row.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let record = validate::appointment_fields(&payload)?;
    let client = ctx.db.client().await?;
    validate::ensure_patient_exists(&client, record.patient_id).await?;
    let appointment = repository::insert_appointment(&client, &record).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `PUT /api/appointments/:id`: update under the same validation as
/// creation.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<Json<Appointment>, ApiError> {
    let record = validate::appointment_fields(&payload)?;
    let client = ctx.db.client().await?;
    validate::ensure_patient_exists(&client, record.patient_id).await?;
    let appointment = repository::update_appointment(&client, id, &record)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;
    Ok(Json(appointment))
}

/// `DELETE /api/appointments/:id`: delete.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let client = ctx.db.client().await?;
    if !repository::delete_appointment(&client, id).await? {
        return Err(ApiError::NotFound("Appointment not found".into()));
    }
    Ok(Json(DeletedResponse {
        message: "Appointment deleted successfully".into(),
    }))
}
