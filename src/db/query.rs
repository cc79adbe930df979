//! Query composers for list reads.
//!
//! Each composer starts from a base SELECT (entity columns plus the joined
//! patient display fields), appends `AND`-combined predicates for whichever
//! filters are set, and fixes the ordering. REST and MCP both consume
//! these, so the two surfaces can't drift apart.

use tokio_postgres::types::ToSql;

use crate::models::{AppointmentFilter, PaymentFilter, TreatmentFilter};

/// A composed SQL statement with its bound parameters.
pub struct ComposedQuery {
    pub sql: String,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
}

impl ComposedQuery {
    fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            params: Vec::new(),
        }
    }

    fn push_condition(
        &mut self,
        conditions: &mut Vec<String>,
        column: &str,
        value: Box<dyn ToSql + Sync + Send>,
    ) {
        self.params.push(value);
        conditions.push(format!("{column} = ${}", self.params.len()));
    }

    fn finish(mut self, conditions: Vec<String>, order_by: &str) -> Self {
        if !conditions.is_empty() {
            self.sql.push_str(" WHERE ");
            self.sql.push_str(&conditions.join(" AND "));
        }
        self.sql.push_str(" ORDER BY ");
        self.sql.push_str(order_by);
        self
    }

    /// Parameter slice in the form the driver expects.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

pub const PATIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, phone, \
     email, address, emergency_contact, emergency_phone, medical_history, allergies, \
     insurance_provider, insurance_number, last_visit, created_at";

pub const APPOINTMENT_COLUMNS: &str = "a.id, a.patient_id, a.appointment_date, \
     a.appointment_time, a.duration, a.appointment_type, a.status, a.notes, a.created_at, \
     p.first_name, p.last_name, p.phone, p.email";

pub const TREATMENT_COLUMNS: &str = "t.id, t.patient_id, t.appointment_id, t.treatment_date, \
     t.tooth_number, t.treatment_type, t.description, t.diagnosis, t.procedure_details, \
     t.notes, t.next_visit_date, t.created_at, p.first_name, p.last_name";

pub const PAYMENT_COLUMNS: &str = "y.id, y.patient_id, y.treatment_id, y.appointment_id, \
     y.payment_date, y.amount, y.payment_method, y.payment_type, y.status, y.description, \
     y.invoice_number, y.created_at, p.first_name, p.last_name";

/// Patients, newest first.
pub fn patient_list() -> ComposedQuery {
    ComposedQuery::new(&format!("SELECT {PATIENT_COLUMNS} FROM patients"))
        .finish(Vec::new(), "created_at DESC")
}

/// Appointments with patient display fields, most recent first; time breaks
/// same-day ties.
pub fn appointment_list(filter: &AppointmentFilter) -> ComposedQuery {
    let mut query = ComposedQuery::new(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments a \
         LEFT JOIN patients p ON a.patient_id = p.id"
    ));
    let mut conditions = Vec::new();
    if let Some(date) = filter.date {
        query.push_condition(&mut conditions, "a.appointment_date", Box::new(date));
    }
    if let Some(patient_id) = filter.patient_id {
        query.push_condition(&mut conditions, "a.patient_id", Box::new(patient_id));
    }
    query.finish(
        conditions,
        "a.appointment_date DESC, a.appointment_time DESC",
    )
}

/// Treatments, most recent date first; id breaks ties so the order is
/// stable. Undated rows sort last, matching how clients expect history
/// to read.
pub fn treatment_list(filter: &TreatmentFilter) -> ComposedQuery {
    let mut query = ComposedQuery::new(&format!(
        "SELECT {TREATMENT_COLUMNS} FROM treatments t \
         LEFT JOIN patients p ON t.patient_id = p.id"
    ));
    let mut conditions = Vec::new();
    if let Some(patient_id) = filter.patient_id {
        query.push_condition(&mut conditions, "t.patient_id", Box::new(patient_id));
    }
    query.finish(
        conditions,
        "t.treatment_date DESC NULLS LAST, t.id DESC",
    )
}

/// Payments, most recent first.
pub fn payment_list(filter: &PaymentFilter) -> ComposedQuery {
    let mut query = ComposedQuery::new(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments y \
         LEFT JOIN patients p ON y.patient_id = p.id"
    ));
    let mut conditions = Vec::new();
    if let Some(patient_id) = filter.patient_id {
        query.push_condition(&mut conditions, "y.patient_id", Box::new(patient_id));
    }
    query.finish(conditions, "y.payment_date DESC")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn patient_list_orders_newest_first() {
        let q = patient_list();
        assert!(q.sql.ends_with("ORDER BY created_at DESC"));
        assert!(!q.sql.contains("WHERE"));
        assert!(q.params().is_empty());
    }

    #[test]
    fn appointment_list_without_filters_has_no_where() {
        let q = appointment_list(&AppointmentFilter::default());
        assert!(!q.sql.contains("WHERE"));
        assert!(q.sql.contains("LEFT JOIN patients p"));
        assert!(q
            .sql
            .ends_with("ORDER BY a.appointment_date DESC, a.appointment_time DESC"));
    }

    #[test]
    fn appointment_list_combines_predicates_with_and() {
        let filter = AppointmentFilter {
            date: NaiveDate::from_ymd_opt(2025, 6, 1),
            patient_id: Some(3),
        };
        let q = appointment_list(&filter);
        assert!(q
            .sql
            .contains("WHERE a.appointment_date = $1 AND a.patient_id = $2"));
        assert_eq!(q.params().len(), 2);
    }

    #[test]
    fn appointment_list_single_predicate_is_numbered_one() {
        let filter = AppointmentFilter {
            date: None,
            patient_id: Some(9),
        };
        let q = appointment_list(&filter);
        assert!(q.sql.contains("WHERE a.patient_id = $1"));
        assert!(!q.sql.contains("AND"));
        assert_eq!(q.params().len(), 1);
    }

    #[test]
    fn treatment_list_breaks_date_ties_by_id() {
        let q = treatment_list(&TreatmentFilter::default());
        assert!(q
            .sql
            .ends_with("ORDER BY t.treatment_date DESC NULLS LAST, t.id DESC"));
    }

    #[test]
    fn treatment_list_filters_by_patient() {
        let q = treatment_list(&TreatmentFilter { patient_id: Some(5) });
        assert!(q.sql.contains("WHERE t.patient_id = $1"));
        assert_eq!(q.params().len(), 1);
    }

    #[test]
    fn payment_list_orders_by_date() {
        let q = payment_list(&PaymentFilter::default());
        assert!(q.sql.ends_with("ORDER BY y.payment_date DESC"));
        let filtered = payment_list(&PaymentFilter { patient_id: Some(2) });
        assert!(filtered.sql.contains("WHERE y.patient_id = $1"));
    }
}
