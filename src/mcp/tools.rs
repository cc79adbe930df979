//! Tool catalog and dispatch for the MCP server.
//!
//! Typed tools go through the same validators and repositories as the
//! REST handlers, so required-field and existence rules are identical on
//! both surfaces. `execute_query` is the exception: a raw passthrough
//! statement owned entirely by the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_postgres::SimpleQueryMessage;

use super::protocol::ToolResult;
use crate::db::{repository, validate, Database};
use crate::models::{
    AppointmentFilter, AppointmentPayload, Patient, PatientPayload, PaymentFilter, TreatmentFilter,
};
use crate::normalize::clean_date;
use crate::schedule;

/// Tool definitions served by `tools/list`.
pub fn tool_catalog() -> Value {
    json!([
        {
            "name": "execute_query",
            "description": "Execute a SQL query on the dental clinic database",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "SQL query to execute" }
                },
                "required": ["query"]
            }
        },
        {
            "name": "get_patients",
            "description": "Get all patients or a specific patient by ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "patientId": {
                        "type": "number",
                        "description": "Optional patient ID to get specific patient"
                    }
                }
            }
        },
        {
            "name": "get_appointments",
            "description": "Get all appointments or appointments for a specific date",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "Optional date (YYYY-MM-DD) to filter appointments"
                    },
                    "patientId": {
                        "type": "number",
                        "description": "Optional patient ID to filter appointments"
                    }
                }
            }
        },
        {
            "name": "get_treatments",
            "description": "Get all treatments or treatments for a specific patient",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "patientId": {
                        "type": "number",
                        "description": "Optional patient ID to filter treatments"
                    }
                }
            }
        },
        {
            "name": "get_payments",
            "description": "Get all payments or payments for a specific patient",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "patientId": {
                        "type": "number",
                        "description": "Optional patient ID to filter payments"
                    }
                }
            }
        },
        {
            "name": "create_patient",
            "description": "Create a new patient",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "firstName": { "type": "string" },
                    "lastName": { "type": "string" },
                    "dateOfBirth": { "type": "string" },
                    "gender": { "type": "string", "enum": ["Male", "Female", "Other"] },
                    "phone": { "type": "string" },
                    "email": { "type": "string" },
                    "address": { "type": "string" },
                    "emergencyContact": { "type": "string" },
                    "emergencyPhone": { "type": "string" }
                },
                "required": ["firstName", "lastName", "dateOfBirth", "gender", "phone", "email"]
            }
        },
        {
            "name": "create_appointment",
            "description": "Create a new appointment",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "patientId": { "type": "number" },
                    "appointmentDate": { "type": "string" },
                    "appointmentTime": { "type": "string" },
                    "duration": { "type": "number" },
                    "type": { "type": "string" },
                    "status": { "type": "string" },
                    "notes": { "type": "string" }
                },
                "required": ["patientId", "appointmentDate", "appointmentTime", "type"]
            }
        }
    ])
}

/// Runs one tool call. Failures of any kind come back as in-band error
/// results, never as transport errors.
pub async fn call_tool(db: &Database, name: &str, args: Value) -> ToolResult {
    match dispatch(db, name, args).await {
        Ok(result) => result,
        Err(message) => ToolResult::error(message),
    }
}

async fn dispatch(db: &Database, name: &str, args: Value) -> Result<ToolResult, String> {
    match name {
        "execute_query" => {
            let args: ExecuteQueryArgs =
                serde_json::from_value(args).map_err(|e| e.to_string())?;
            execute_query(db, &args.query).await
        }
        "get_patients" => get_patients(db, parse_args(args)?).await,
        "get_appointments" => get_appointments(db, parse_args(args)?).await,
        "get_treatments" => get_treatments(db, parse_args(args)?).await,
        "get_payments" => get_payments(db, parse_args(args)?).await,
        "create_patient" => create_patient(db, parse_args(args)?).await,
        "create_appointment" => create_appointment(db, parse_args(args)?).await,
        other => Err(format!("Unknown tool: {other}")),
    }
}

#[derive(Debug, Deserialize)]
struct ExecuteQueryArgs {
    query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PatientArgs {
    patient_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AppointmentArgs {
    date: Option<String>,
    patient_id: Option<i64>,
}

/// Tools with all-optional arguments accept absent `arguments` too.
fn parse_args<T: DeserializeOwned + Default>(args: Value) -> Result<T, String> {
    if args.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(args).map_err(|e| e.to_string())
}

fn pretty<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

/// Raw statement in simple-query mode: values come back as text, which
/// serializes cleanly no matter what the caller selects.
async fn execute_query(db: &Database, query: &str) -> Result<ToolResult, String> {
    let client = db.client().await.map_err(|e| e.to_string())?;
    let messages = client.simple_query(query).await.map_err(|e| e.to_string())?;

    let mut rows = Vec::new();
    let mut affected = 0u64;
    let mut produced_rows = false;
    for message in messages {
        match message {
            SimpleQueryMessage::Row(row) => {
                let mut object = serde_json::Map::new();
                for (idx, column) in row.columns().iter().enumerate() {
                    let value = match row.try_get(idx).map_err(|e| e.to_string())? {
                        Some(text) => Value::String(text.to_string()),
                        None => Value::Null,
                    };
                    object.insert(column.name().to_string(), value);
                }
                rows.push(Value::Object(object));
                produced_rows = true;
            }
            SimpleQueryMessage::CommandComplete(count) => affected += count,
            SimpleQueryMessage::RowDescription(_) => produced_rows = true,
            _ => {}
        }
    }

    let text = if produced_rows {
        pretty(&rows)?
    } else {
        pretty(&json!({ "rowsAffected": affected }))?
    };
    Ok(ToolResult::text(text))
}

async fn get_patients(db: &Database, args: PatientArgs) -> Result<ToolResult, String> {
    let client = db.client().await.map_err(|e| e.to_string())?;
    let patients: Vec<Patient> = match args.patient_id {
        Some(id) => repository::get_patient(&client, id)
            .await
            .map_err(|e| e.to_string())?
            .into_iter()
            .collect(),
        None => repository::list_patients(&client)
            .await
            .map_err(|e| e.to_string())?,
    };
    Ok(ToolResult::text(pretty(&patients)?))
}

async fn get_appointments(db: &Database, args: AppointmentArgs) -> Result<ToolResult, String> {
    let filter = AppointmentFilter {
        date: match clean_date(args.date.as_deref()) {
            None => None,
            Some(s) => Some(
                schedule::calendar_date(&s).ok_or_else(|| format!("Invalid date filter: {s}"))?,
            ),
        },
        patient_id: args.patient_id,
    };
    let client = db.client().await.map_err(|e| e.to_string())?;
    let appointments = repository::list_appointments(&client, &filter)
        .await
        .map_err(|e| e.to_string())?;
    Ok(ToolResult::text(pretty(&appointments)?))
}

async fn get_treatments(db: &Database, args: PatientArgs) -> Result<ToolResult, String> {
    let filter = TreatmentFilter {
        patient_id: args.patient_id,
    };
    let client = db.client().await.map_err(|e| e.to_string())?;
    let treatments = repository::list_treatments(&client, &filter)
        .await
        .map_err(|e| e.to_string())?;
    Ok(ToolResult::text(pretty(&treatments)?))
}

async fn get_payments(db: &Database, args: PatientArgs) -> Result<ToolResult, String> {
    let filter = PaymentFilter {
        patient_id: args.patient_id,
    };
    let client = db.client().await.map_err(|e| e.to_string())?;
    let payments = repository::list_payments(&client, &filter)
        .await
        .map_err(|e| e.to_string())?;
    Ok(ToolResult::text(pretty(&payments)?))
}

async fn create_patient(db: &Database, payload: PatientPayload) -> Result<ToolResult, String> {
    let record = validate::patient_fields(&payload).map_err(|e| e.to_string())?;
    let client = db.client().await.map_err(|e| e.to_string())?;
    let patient = repository::insert_patient(&client, &record)
        .await
        .map_err(|e| e.to_string())?;
    Ok(ToolResult::text(pretty(&patient)?))
}

async fn create_appointment(
    db: &Database,
    payload: AppointmentPayload,
) -> Result<ToolResult, String> {
    let record = validate::appointment_fields(&payload).map_err(|e| e.to_string())?;
    let client = db.client().await.map_err(|e| e.to_string())?;
    validate::ensure_patient_exists(&client, record.patient_id)
        .await
        .map_err(|e| e.to_string())?;
    let appointment = repository::insert_appointment(&client, &record)
        .await
        .map_err(|e| e.to_string())?;
    Ok(ToolResult::text(pretty(&appointment)?))
}
