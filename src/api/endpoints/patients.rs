//! Patient endpoints.
//!
//! - `GET /api/patients`: list, newest first
//! - `GET /api/patients/:id`: single patient
//! - `POST /api/patients`: create
//! - `PUT /api/patients/:id`: update (the only path that sets lastVisit)
//! - `DELETE /api/patients/:id`: delete, cascading to dependents

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::ApiContext;
use crate::db::{repository, validate};
use crate::models::{Patient, PatientPayload};

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// `GET /api/patients`: all patients, newest first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let client = ctx.db.client().await?;
    let patients = repository::list_patients(&client).await?;
    Ok(Json(patients))
}

/// `GET /api/patients/:id`: one patient.
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    let client = ctx.db.client().await?;
    let patient = repository::get_patient(&client, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    Ok(Json(patient))
}

/// `POST /api/patients`: create and echo the stored row.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<PatientPayload>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let record = validate::patient_fields(&payload)?;
    let client = ctx.db.client().await?;
    let patient = repository::insert_patient(&client, &record).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `PUT /api/patients/:id`: update and echo the stored row.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(payload): Json<PatientPayload>,
) -> Result<Json<Patient>, ApiError> {
    let record = validate::patient_fields(&payload)?;
    let client = ctx.db.client().await?;
    let patient = repository::update_patient(&client, id, &record)
        .await?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    Ok(Json(patient))
}

/// `DELETE /api/patients/:id`: delete with cascade.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let client = ctx.db.client().await?;
    if !repository::delete_patient(&client, id).await? {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    Ok(Json(DeletedResponse {
        message: "Patient deleted successfully".into(),
    }))
}
