use tokio_postgres::{Client, Row};

use crate::db::query::{self, TREATMENT_COLUMNS};
use crate::db::StoreError;
use crate::models::{NewTreatment, Treatment, TreatmentFilter};

fn treatment_from_row(row: &Row) -> Result<Treatment, StoreError> {
    let treatment_type = row
        .try_get::<_, Option<String>>("treatment_type")?
        .map(|s| s.parse())
        .transpose()?;
    Ok(Treatment {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        appointment_id: row.try_get("appointment_id")?,
        treatment_date: row.try_get("treatment_date")?,
        tooth_number: row.try_get("tooth_number")?,
        treatment_type,
        description: row.try_get("description")?,
        diagnosis: row.try_get("diagnosis")?,
        procedure_details: row.try_get("procedure_details")?,
        notes: row.try_get("notes")?,
        next_visit_date: row.try_get("next_visit_date")?,
        created_at: row.try_get("created_at")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
    })
}

pub async fn list_treatments(
    client: &Client,
    filter: &TreatmentFilter,
) -> Result<Vec<Treatment>, StoreError> {
    let query = query::treatment_list(filter);
    let rows = client.query(&query.sql, &query.params()).await?;
    rows.iter().map(treatment_from_row).collect()
}

pub async fn get_treatment(client: &Client, id: i64) -> Result<Option<Treatment>, StoreError> {
    let row = client
        .query_opt(
            &format!(
                "SELECT {TREATMENT_COLUMNS} FROM treatments t \
                 LEFT JOIN patients p ON t.patient_id = p.id WHERE t.id = $1"
            ),
            &[&id],
        )
        .await?;
    row.as_ref().map(treatment_from_row).transpose()
}

pub async fn insert_treatment(
    client: &Client,
    t: &NewTreatment,
) -> Result<Treatment, StoreError> {
    let row = client
        .query_one(
            "INSERT INTO treatments (patient_id, appointment_id, treatment_date, \
             tooth_number, treatment_type, description, diagnosis, procedure_details, \
             notes, next_visit_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
            &[
                &t.patient_id,
                &t.appointment_id,
                &t.treatment_date,
                &t.tooth_number,
                &t.treatment_type.as_ref().map(|v| v.as_str()),
                &t.description,
                &t.diagnosis,
                &t.procedure_details,
                &t.notes,
                &t.next_visit_date,
            ],
        )
        .await?;
    let id: i64 = row.try_get("id")?;
    read_back(client, id).await
}

pub async fn update_treatment(
    client: &Client,
    id: i64,
    t: &NewTreatment,
) -> Result<Option<Treatment>, StoreError> {
    let updated = client
        .execute(
            "UPDATE treatments SET patient_id = $1, appointment_id = $2, \
             treatment_date = $3, tooth_number = $4, treatment_type = $5, \
             description = $6, diagnosis = $7, procedure_details = $8, notes = $9, \
             next_visit_date = $10 WHERE id = $11",
            &[
                &t.patient_id,
                &t.appointment_id,
                &t.treatment_date,
                &t.tooth_number,
                &t.treatment_type.as_ref().map(|v| v.as_str()),
                &t.description,
                &t.diagnosis,
                &t.procedure_details,
                &t.notes,
                &t.next_visit_date,
                &id,
            ],
        )
        .await?;
    if updated == 0 {
        return Ok(None);
    }
    get_treatment(client, id).await
}

pub async fn delete_treatment(client: &Client, id: i64) -> Result<bool, StoreError> {
    let deleted = client
        .execute("DELETE FROM treatments WHERE id = $1", &[&id])
        .await?;
    Ok(deleted > 0)
}

async fn read_back(client: &Client, id: i64) -> Result<Treatment, StoreError> {
    let row = client
        .query_one(
            &format!(
                "SELECT {TREATMENT_COLUMNS} FROM treatments t \
                 LEFT JOIN patients p ON t.patient_id = p.id WHERE t.id = $1"
            ),
            &[&id],
        )
        .await?;
    treatment_from_row(&row)
}
