//! Treatment endpoints.
//!
//! - `GET /api/treatments`: list with optional `patientId` filter
//! - `POST /api/treatments`: create (normalized, not validated; the
//!   schema FKs enforce references)
//! - `PUT /api/treatments/:id`: update
//! - `DELETE /api/treatments/:id`: delete

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::appointments::parse_patient_filter;
use crate::api::error::ApiError;
use crate::api::ApiContext;
use crate::db::{repository, validate};
use crate::models::{Treatment, TreatmentFilter, TreatmentPayload};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub patient_id: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// `GET /api/treatments`: list, most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Treatment>>, ApiError> {
    let filter = TreatmentFilter {
        patient_id: parse_patient_filter(params.patient_id.as_deref())?,
    };
    let client = ctx.db.client().await?;
    let treatments = repository::list_treatments(&client, &filter).await?;
    Ok(Json(treatments))
}

/// `POST /api/treatments`: normalize, create, echo the joined row.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<TreatmentPayload>,
) -> Result<(StatusCode, Json<Treatment>), ApiError> {
    let record = validate::treatment_fields(&payload)?;
    let client = ctx.db.client().await?;
    let treatment = repository::insert_treatment(&client, &record).await?;
    Ok((StatusCode::CREATED, Json(treatment)))
}

/// `PUT /api/treatments/:id`: update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(payload): Json<TreatmentPayload>,
) -> Result<Json<Treatment>, ApiError> {
    let record = validate::treatment_fields(&payload)?;
    let client = ctx.db.client().await?;
    let treatment = repository::update_treatment(&client, id, &record)
        .await?
        .ok_or_else(|| ApiError::NotFound("Treatment not found".into()))?;
    Ok(Json(treatment))
}

/// `DELETE /api/treatments/:id`: delete.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let client = ctx.db.client().await?;
    if !repository::delete_treatment(&client, id).await? {
        return Err(ApiError::NotFound("Treatment not found".into()));
    }
    Ok(Json(DeletedResponse {
        message: "Treatment deleted successfully".into(),
    }))
}
