//! Payment endpoints.
//!
//! - `GET /api/payments`: list with optional `patientId` filter
//! - `POST /api/payments`: create; assigns the invoice number
//! - `PUT /api/payments/:id`: update; validated like a create, the
//!   invoice number is kept
//! - `DELETE /api/payments/:id`: delete

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::appointments::parse_patient_filter;
use crate::api::error::ApiError;
use crate::api::ApiContext;
use crate::db::{repository, validate};
use crate::models::{Payment, PaymentFilter, PaymentPayload};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub patient_id: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// `GET /api/payments`: list, most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let filter = PaymentFilter {
        patient_id: parse_patient_filter(params.patient_id.as_deref())?,
    };
    let client = ctx.db.client().await?;
    let payments = repository::list_payments(&client, &filter).await?;
    Ok(Json(payments))
}

/// `POST /api/payments`: validate, check references, create.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<PaymentPayload>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let record = validate::payment_fields(&payload)?;
    let client = ctx.db.client().await?;
    validate::ensure_patient_exists(&client, record.patient_id).await?;
    if let Some(treatment_id) = record.treatment_id {
        validate::ensure_treatment_exists(&client, treatment_id).await?;
    }
    let payment = repository::insert_payment(&client, &record).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// `PUT /api/payments/:id`: update. Runs the same validation and
/// reference checks as a create.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentPayload>,
) -> Result<Json<Payment>, ApiError> {
    let record = validate::payment_fields(&payload)?;
    let client = ctx.db.client().await?;
    validate::ensure_patient_exists(&client, record.patient_id).await?;
    if let Some(treatment_id) = record.treatment_id {
        validate::ensure_treatment_exists(&client, treatment_id).await?;
    }
    let payment = repository::update_payment(&client, id, &record)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".into()))?;
    Ok(Json(payment))
}

/// `DELETE /api/payments/:id`: delete.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let client = ctx.db.client().await?;
    if !repository::delete_payment(&client, id).await? {
        return Err(ApiError::NotFound("Payment not found".into()));
    }
    Ok(Json(DeletedResponse {
        message: "Payment deleted successfully".into(),
    }))
}
