//! Invoice number generation.
//!
//! Format: `INV-{YYYY}{MM}-{NNNN}` where NNNN is a zero-padded random
//! serial. Numbers are assigned exactly once, when a payment is created;
//! updates never touch them. Uniqueness is not guaranteed and not
//! required, the serial only disambiguates invoices within a month.

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;

/// Builds an invoice number for the given month. `serial` is reduced
/// modulo 10 000 and zero-padded to four digits.
pub fn invoice_number_for(date: NaiveDate, serial: u32) -> String {
    format!(
        "INV-{:04}{:02}-{:04}",
        date.year(),
        date.month(),
        serial % 10_000
    )
}

/// A fresh invoice number for the current month with a random serial.
pub fn new_invoice_number() -> String {
    let serial = rand::thread_rng().gen_range(0..10_000);
    invoice_number_for(Local::now().date_naive(), serial)
}
