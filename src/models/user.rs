use chrono::NaiveDateTime;

/// Account row. The hash is a PBKDF2 record, never a plaintext password.
/// No Serialize impl, so the row cannot end up in a response body.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}
