use tokio_postgres::{Client, Row};

use crate::db::query::{self, APPOINTMENT_COLUMNS};
use crate::db::StoreError;
use crate::models::{Appointment, AppointmentFilter, NewAppointment};

fn appointment_from_row(row: &Row) -> Result<Appointment, StoreError> {
    Ok(Appointment {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        appointment_date: row.try_get("appointment_date")?,
        appointment_time: row.try_get("appointment_time")?,
        duration: row.try_get("duration")?,
        appointment_type: row.try_get::<_, String>("appointment_type")?.parse()?,
        status: row.try_get::<_, String>("status")?.parse()?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
    })
}

pub async fn list_appointments(
    client: &Client,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, StoreError> {
    let query = query::appointment_list(filter);
    let rows = client.query(&query.sql, &query.params()).await?;
    rows.iter().map(appointment_from_row).collect()
}

pub async fn get_appointment(
    client: &Client,
    id: i64,
) -> Result<Option<Appointment>, StoreError> {
    let row = client
        .query_opt(
            &format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments a \
                 LEFT JOIN patients p ON a.patient_id = p.id WHERE a.id = $1"
            ),
            &[&id],
        )
        .await?;
    row.as_ref().map(appointment_from_row).transpose()
}

pub async fn insert_appointment(
    client: &Client,
    a: &NewAppointment,
) -> Result<Appointment, StoreError> {
    let row = client
        .query_one(
            "INSERT INTO appointments (patient_id, appointment_date, appointment_time, \
             duration, appointment_type, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
            &[
                &a.patient_id,
                &a.appointment_date,
                &a.appointment_time,
                &a.duration,
                &a.appointment_type.as_str(),
                &a.status.as_str(),
                &a.notes,
            ],
        )
        .await?;
    let id: i64 = row.try_get("id")?;
    read_back(client, id).await
}

pub async fn update_appointment(
    client: &Client,
    id: i64,
    a: &NewAppointment,
) -> Result<Option<Appointment>, StoreError> {
    let updated = client
        .execute(
            "UPDATE appointments SET patient_id = $1, appointment_date = $2, \
             appointment_time = $3, duration = $4, appointment_type = $5, status = $6, \
             notes = $7 WHERE id = $8",
            &[
                &a.patient_id,
                &a.appointment_date,
                &a.appointment_time,
                &a.duration,
                &a.appointment_type.as_str(),
                &a.status.as_str(),
                &a.notes,
                &id,
            ],
        )
        .await?;
    if updated == 0 {
        return Ok(None);
    }
    get_appointment(client, id).await
}

pub async fn delete_appointment(client: &Client, id: i64) -> Result<bool, StoreError> {
    let deleted = client
        .execute("DELETE FROM appointments WHERE id = $1", &[&id])
        .await?;
    Ok(deleted > 0)
}

async fn read_back(client: &Client, id: i64) -> Result<Appointment, StoreError> {
    let row = client
        .query_one(
            &format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments a \
                 LEFT JOIN patients p ON a.patient_id = p.id WHERE a.id = $1"
            ),
            &[&id],
        )
        .await?;
    appointment_from_row(&row)
}
