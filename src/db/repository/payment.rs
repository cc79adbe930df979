use tokio_postgres::{Client, Row};

use crate::billing;
use crate::db::query::{self, PAYMENT_COLUMNS};
use crate::db::StoreError;
use crate::models::{NewPayment, Payment, PaymentFilter};

fn payment_from_row(row: &Row) -> Result<Payment, StoreError> {
    Ok(Payment {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        treatment_id: row.try_get("treatment_id")?,
        appointment_id: row.try_get("appointment_id")?,
        payment_date: row.try_get("payment_date")?,
        amount: row.try_get("amount")?,
        payment_method: row.try_get::<_, String>("payment_method")?.parse()?,
        payment_type: row.try_get::<_, String>("payment_type")?.parse()?,
        status: row.try_get::<_, String>("status")?.parse()?,
        description: row.try_get("description")?,
        invoice_number: row.try_get("invoice_number")?,
        created_at: row.try_get("created_at")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
    })
}

pub async fn list_payments(
    client: &Client,
    filter: &PaymentFilter,
) -> Result<Vec<Payment>, StoreError> {
    let query = query::payment_list(filter);
    let rows = client.query(&query.sql, &query.params()).await?;
    rows.iter().map(payment_from_row).collect()
}

pub async fn get_payment(client: &Client, id: i64) -> Result<Option<Payment>, StoreError> {
    let row = client
        .query_opt(
            &format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments y \
                 LEFT JOIN patients p ON y.patient_id = p.id WHERE y.id = $1"
            ),
            &[&id],
        )
        .await?;
    row.as_ref().map(payment_from_row).transpose()
}

/// Inserts a payment, assigning the invoice number here and only here.
/// Updates never pass through this path, so a payment keeps its invoice
/// number for life.
pub async fn insert_payment(client: &Client, p: &NewPayment) -> Result<Payment, StoreError> {
    let invoice_number = billing::new_invoice_number();
    let row = client
        .query_one(
            "INSERT INTO payments (patient_id, treatment_id, appointment_id, payment_date, \
             amount, payment_method, payment_type, status, description, invoice_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
            &[
                &p.patient_id,
                &p.treatment_id,
                &p.appointment_id,
                &p.payment_date,
                &p.amount,
                &p.payment_method.as_str(),
                &p.payment_type.as_str(),
                &p.status.as_str(),
                &p.description,
                &invoice_number,
            ],
        )
        .await?;
    let id: i64 = row.try_get("id")?;
    read_back(client, id).await
}

pub async fn update_payment(
    client: &Client,
    id: i64,
    p: &NewPayment,
) -> Result<Option<Payment>, StoreError> {
    let updated = client
        .execute(
            "UPDATE payments SET patient_id = $1, treatment_id = $2, appointment_id = $3, \
             payment_date = $4, amount = $5, payment_method = $6, payment_type = $7, \
             status = $8, description = $9 WHERE id = $10",
            &[
                &p.patient_id,
                &p.treatment_id,
                &p.appointment_id,
                &p.payment_date,
                &p.amount,
                &p.payment_method.as_str(),
                &p.payment_type.as_str(),
                &p.status.as_str(),
                &p.description,
                &id,
            ],
        )
        .await?;
    if updated == 0 {
        return Ok(None);
    }
    get_payment(client, id).await
}

pub async fn delete_payment(client: &Client, id: i64) -> Result<bool, StoreError> {
    let deleted = client
        .execute("DELETE FROM payments WHERE id = $1", &[&id])
        .await?;
    Ok(deleted > 0)
}

async fn read_back(client: &Client, id: i64) -> Result<Payment, StoreError> {
    let row = client
        .query_one(
            &format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments y \
                 LEFT JOIN patients p ON y.patient_id = p.id WHERE y.id = $1"
            ),
            &[&id],
        )
        .await?;
    payment_from_row(&row)
}
