use tokio_postgres::{Client, Row};

use crate::db::StoreError;
use crate::models::User;

fn user_from_row(row: &Row) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn get_user_by_username(
    client: &Client,
    username: &str,
) -> Result<Option<User>, StoreError> {
    let row = client
        .query_opt(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
            &[&username],
        )
        .await?;
    row.as_ref().map(user_from_row).transpose()
}

pub async fn update_user_password(
    client: &Client,
    username: &str,
    password_hash: &str,
) -> Result<(), StoreError> {
    client
        .execute(
            "UPDATE users SET password_hash = $1 WHERE username = $2",
            &[&password_hash, &username],
        )
        .await?;
    Ok(())
}

/// Creates the account or replaces its hash. Returns true when a new row
/// was created.
pub async fn upsert_user(
    client: &Client,
    username: &str,
    password_hash: &str,
) -> Result<bool, StoreError> {
    let existing = get_user_by_username(client, username).await?;
    if existing.is_some() {
        update_user_password(client, username, password_hash).await?;
        return Ok(false);
    }
    client
        .execute(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)",
            &[&username, &password_hash],
        )
        .await?;
    Ok(true)
}
