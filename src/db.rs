//! SQLite access: connection options shared by the per-request context and
//! the administrative schema command.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

use crate::config::Config;

/// Versioned DDL, embedded so `init-db` works from any working directory.
pub const SCHEMA: &str = include_str!("../schema.sql");

/// Options for every connection this application opens. Rows come back
/// addressable by column name, and `timestamp`-declared columns decode into
/// `chrono` values, so future entities (posts) can rely on both.
pub fn connect_options(database: &str) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(database)
        .create_if_missing(true)
}

pub async fn open_connection(database: &str) -> Result<SqliteConnection, sqlx::Error> {
    connect_options(database).connect().await
}

/// Drop and recreate all tables from the embedded script. Destructive: any
/// existing data is lost. Runs on its own connection, never a request's; a
/// script error aborts and propagates to the operator.
pub async fn init_db(config: &Config) -> Result<()> {
    let mut conn = open_connection(&config.database).await?;
    sqlx::raw_sql(SCHEMA).execute(&mut conn).await?;
    conn.close().await?;
    tracing::debug!(database = %config.database, "schema recreated");
    Ok(())
}
