//! Dashboard aggregation views over cached entity collections.
//!
//! Clients keep full entity lists in a local cache and recompute these
//! views from it after every refresh. Cached rows carry their dates as the
//! raw stored strings, which may be bare dates or full timestamps, so
//! every view goes through [`schedule::calendar_date`] instead of trusting
//! the string shape.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::db::repository;
use crate::db::{Database, StoreError};
use crate::models::enums::{AppointmentStatus, PaymentStatus};
use crate::models::{Appointment, AppointmentFilter, Payment, PaymentFilter};
use crate::schedule;

/// Upper bound on rows shown in the today and upcoming lists.
pub const DISPLAY_LIMIT: usize = 5;

/// Appointment row as cached client-side: dates and times stay strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAppointment {
    pub id: i64,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl From<&Appointment> for CachedAppointment {
    fn from(a: &Appointment) -> Self {
        Self {
            id: a.id,
            appointment_date: a.appointment_date.to_string(),
            appointment_time: a.appointment_time.to_string(),
            status: a.status.clone(),
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
        }
    }
}

/// Payment row as cached client-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPayment {
    pub id: i64,
    pub amount: f64,
    pub status: PaymentStatus,
}

impl From<&Payment> for CachedPayment {
    fn from(p: &Payment) -> Self {
        Self {
            id: p.id,
            amount: p.amount,
            status: p.status.clone(),
        }
    }
}

fn start_time(a: &CachedAppointment) -> NaiveTime {
    schedule::parse_time(&a.appointment_time).unwrap_or(NaiveTime::MIN)
}

/// Scheduled appointments falling on `today`, in start-time order,
/// capped at [`DISPLAY_LIMIT`].
pub fn todays_appointments(
    appointments: &[CachedAppointment],
    today: NaiveDate,
) -> Vec<CachedAppointment> {
    let mut matched: Vec<CachedAppointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled)
        .filter(|a| schedule::matches_date(&a.appointment_date, today))
        .cloned()
        .collect();
    matched.sort_by_key(start_time);
    matched.truncate(DISPLAY_LIMIT);
    matched
}

/// Scheduled appointments strictly after `today` and within the next
/// seven days, in (date, time) order, capped at [`DISPLAY_LIMIT`].
pub fn upcoming_appointments(
    appointments: &[CachedAppointment],
    today: NaiveDate,
) -> Vec<CachedAppointment> {
    let horizon = today + Duration::days(7);
    let mut matched: Vec<CachedAppointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled)
        .filter(|a| {
            schedule::calendar_date(&a.appointment_date)
                .map(|d| d > today && d <= horizon)
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    matched.sort_by_key(|a| (schedule::calendar_date(&a.appointment_date), start_time(a)));
    matched.truncate(DISPLAY_LIMIT);
    matched
}

/// Sum of amounts across paid payments.
pub fn total_revenue(payments: &[CachedPayment]) -> f64 {
    payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .map(|p| p.amount)
        .sum()
}

/// Sum of amounts across pending payments.
pub fn pending_revenue(payments: &[CachedPayment]) -> f64 {
    payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .map(|p| p.amount)
        .sum()
}

/// One day in the monthly calendar grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub scheduled: usize,
}

/// Calendar cells for one month: leading `None` placeholders align day 1
/// with its weekday column (weeks start on Sunday), then one cell per day
/// carrying the count of scheduled appointments on it.
pub fn month_cells(
    appointments: &[CachedAppointment],
    year: i32,
    month: u32,
) -> Vec<Option<DayCell>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<DayCell>> = vec![None; offset];
    for day in 1..=31 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        let scheduled = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .filter(|a| schedule::matches_date(&a.appointment_date, date))
            .count();
        cells.push(Some(DayCell { day, scheduled }));
    }
    cells
}

/// All dashboard views computed from one cache snapshot.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub total_patients: usize,
    pub todays: Vec<CachedAppointment>,
    pub upcoming: Vec<CachedAppointment>,
    pub revenue: f64,
    pub pending: f64,
}

/// Client-side cache of the collections the dashboard reads.
///
/// Holds the last fetched snapshot; [`DashboardCache::refresh`] is the
/// invalidate-and-refetch called after every mutation. Refresh replaces
/// the collections only once all fetches succeed, so a failed refresh
/// leaves the previous snapshot intact for readers.
#[derive(Debug, Default)]
pub struct DashboardCache {
    appointments: Vec<CachedAppointment>,
    payments: Vec<CachedPayment>,
    patient_count: usize,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the cached collections and refetches them from the store.
    pub async fn refresh(&mut self, db: &Database) -> Result<(), StoreError> {
        let client = db.client().await?;
        let appointments =
            repository::list_appointments(&client, &AppointmentFilter::default()).await?;
        let payments = repository::list_payments(&client, &PaymentFilter::default()).await?;
        let patients = repository::list_patients(&client).await?;

        self.appointments = appointments.iter().map(CachedAppointment::from).collect();
        self.payments = payments.iter().map(CachedPayment::from).collect();
        self.patient_count = patients.len();
        Ok(())
    }

    /// Loads a snapshot directly, bypassing the store.
    pub fn load(
        &mut self,
        appointments: Vec<CachedAppointment>,
        payments: Vec<CachedPayment>,
        patient_count: usize,
    ) {
        self.appointments = appointments;
        self.payments = payments;
        self.patient_count = patient_count;
    }

    /// Recomputes every view from the cached snapshot.
    pub fn snapshot(&self, today: NaiveDate) -> DashboardSnapshot {
        DashboardSnapshot {
            total_patients: self.patient_count,
            todays: todays_appointments(&self.appointments, today),
            upcoming: upcoming_appointments(&self.appointments, today),
            revenue: total_revenue(&self.payments),
            pending: pending_revenue(&self.payments),
        }
    }

    /// Calendar cells for the requested month from the cached snapshot.
    pub fn month(&self, year: i32, month: u32) -> Vec<Option<DayCell>> {
        month_cells(&self.appointments, year, month)
    }
}
