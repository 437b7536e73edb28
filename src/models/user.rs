use sqlx::FromRow;

/// One registered account. `password` holds the bcrypt hash, never the
/// plaintext; it stays out of every rendered page and log line.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}
