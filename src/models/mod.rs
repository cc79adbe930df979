//! Domain models shared by the REST API, the MCP tool server and the
//! repository layer.

pub mod enums;

mod appointment;
mod filters;
mod patient;
mod payment;
mod treatment;
mod user;

pub use appointment::{Appointment, AppointmentPayload, NewAppointment};
pub use filters::{AppointmentFilter, PaymentFilter, TreatmentFilter};
pub use patient::{NewPatient, Patient, PatientPayload};
pub use payment::{NewPayment, Payment, PaymentPayload};
pub use treatment::{NewTreatment, Treatment, TreatmentPayload};
pub use user::User;
