use chrono::NaiveDate;

#[derive(Debug, Default, Clone)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub patient_id: Option<i64>,
}

#[derive(Debug, Default, Clone)]
pub struct TreatmentFilter {
    pub patient_id: Option<i64>,
}

#[derive(Debug, Default, Clone)]
pub struct PaymentFilter {
    pub patient_id: Option<i64>,
}
