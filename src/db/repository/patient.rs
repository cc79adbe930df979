use tokio_postgres::{Client, Row};

use crate::db::query::{self, PATIENT_COLUMNS};
use crate::db::StoreError;
use crate::models::{NewPatient, Patient};

fn patient_from_row(row: &Row) -> Result<Patient, StoreError> {
    Ok(Patient {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        gender: row.try_get("gender")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        address: row.try_get("address")?,
        emergency_contact: row.try_get("emergency_contact")?,
        emergency_phone: row.try_get("emergency_phone")?,
        medical_history: row.try_get("medical_history")?,
        allergies: row.try_get("allergies")?,
        insurance_provider: row.try_get("insurance_provider")?,
        insurance_number: row.try_get("insurance_number")?,
        last_visit: row.try_get("last_visit")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn list_patients(client: &Client) -> Result<Vec<Patient>, StoreError> {
    let query = query::patient_list();
    let rows = client.query(&query.sql, &query.params()).await?;
    rows.iter().map(patient_from_row).collect()
}

pub async fn get_patient(client: &Client, id: i64) -> Result<Option<Patient>, StoreError> {
    let row = client
        .query_opt(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1"),
            &[&id],
        )
        .await?;
    row.as_ref().map(patient_from_row).transpose()
}

/// Inserts and returns the stored row. `last_visit` always starts NULL;
/// it only changes through updates.
pub async fn insert_patient(client: &Client, p: &NewPatient) -> Result<Patient, StoreError> {
    let row = client
        .query_one(
            "INSERT INTO patients (first_name, last_name, date_of_birth, gender, phone, \
             email, address, emergency_contact, emergency_phone, medical_history, allergies, \
             insurance_provider, insurance_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING id",
            &[
                &p.first_name,
                &p.last_name,
                &p.date_of_birth,
                &p.gender,
                &p.phone,
                &p.email,
                &p.address,
                &p.emergency_contact,
                &p.emergency_phone,
                &p.medical_history,
                &p.allergies,
                &p.insurance_provider,
                &p.insurance_number,
            ],
        )
        .await?;
    let id: i64 = row.try_get("id")?;
    read_back(client, id).await
}

pub async fn update_patient(
    client: &Client,
    id: i64,
    p: &NewPatient,
) -> Result<Option<Patient>, StoreError> {
    let updated = client
        .execute(
            "UPDATE patients SET first_name = $1, last_name = $2, date_of_birth = $3, \
             gender = $4, phone = $5, email = $6, address = $7, emergency_contact = $8, \
             emergency_phone = $9, medical_history = $10, allergies = $11, \
             insurance_provider = $12, insurance_number = $13, last_visit = $14 \
             WHERE id = $15",
            &[
                &p.first_name,
                &p.last_name,
                &p.date_of_birth,
                &p.gender,
                &p.phone,
                &p.email,
                &p.address,
                &p.emergency_contact,
                &p.emergency_phone,
                &p.medical_history,
                &p.allergies,
                &p.insurance_provider,
                &p.insurance_number,
                &p.last_visit,
                &id,
            ],
        )
        .await?;
    if updated == 0 {
        return Ok(None);
    }
    get_patient(client, id).await
}

/// Deletes a patient; the schema cascades to appointments, treatments and
/// payments. Returns false when no row matched.
pub async fn delete_patient(client: &Client, id: i64) -> Result<bool, StoreError> {
    let deleted = client
        .execute("DELETE FROM patients WHERE id = $1", &[&id])
        .await?;
    Ok(deleted > 0)
}

async fn read_back(client: &Client, id: i64) -> Result<Patient, StoreError> {
    let row = client
        .query_one(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1"),
            &[&id],
        )
        .await?;
    patient_from_row(&row)
}
