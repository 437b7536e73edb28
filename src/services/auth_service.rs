//! Credential checks and user creation.
//!
//! Every outcome a visitor can fix is a named [`AuthError`] variant whose
//! `Display` string is the exact flash message; the views inspect the variant
//! instead of pattern-matching on driver errors. Database faults ride along
//! in their own variants and become 500s upstream.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::sqlite::SqliteConnection;
use thiserror::Error;

use crate::models::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username is required.")]
    UsernameRequired,
    #[error("Password is required.")]
    PasswordRequired,
    #[error("User {0} is already registered.")]
    UsernameTaken(String),
    #[error("Incorrect username.")]
    UnknownUsername,
    #[error("Incorrect password.")]
    WrongPassword,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// Flash message for outcomes the visitor can correct; `None` for server
    /// faults, which the caller must propagate instead of rendering.
    pub fn flash(&self) -> Option<String> {
        match self {
            AuthError::UsernameRequired
            | AuthError::PasswordRequired
            | AuthError::UsernameTaken(_)
            | AuthError::UnknownUsername
            | AuthError::WrongPassword => Some(self.to_string()),
            AuthError::Hash(_) | AuthError::Database(_) => None,
        }
    }
}

/// Validate and insert a new user row, hashing the password. Commits
/// immediately (single autocommitted INSERT). A username already present
/// comes back as [`AuthError::UsernameTaken`], mapped from the storage
/// layer's unique-constraint violation; no row is created in that case.
pub async fn register_user(
    db: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<i64, AuthError> {
    if username.is_empty() {
        return Err(AuthError::UsernameRequired);
    }
    if password.is_empty() {
        return Err(AuthError::PasswordRequired);
    }

    let password_hash = hash(password, DEFAULT_COST)?;

    let result = sqlx::query("INSERT INTO user (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(&password_hash)
        .execute(&mut *db)
        .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            Err(AuthError::UsernameTaken(username.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Look up a user by exact username and verify the password against the
/// stored hash. The unknown-username and wrong-password cases are reported
/// distinctly, matching the historical behavior of this application.
pub async fn verify_user(
    db: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM user WHERE username = ?")
        .bind(username)
        .fetch_optional(&mut *db)
        .await?
        .ok_or(AuthError::UnknownUsername)?;

    if !verify(password, &user.password)? {
        return Err(AuthError::WrongPassword);
    }
    Ok(user)
}
