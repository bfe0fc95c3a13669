use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Schema statements, executed in order at startup. `IF NOT EXISTS` keeps
/// creation idempotent: existing tables are never dropped or altered.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS jobs (
        id          BLOB PRIMARY KEY NOT NULL,
        title       TEXT NOT NULL,
        company     TEXT NOT NULL,
        location    TEXT,
        url         TEXT,
        description TEXT,
        status      TEXT NOT NULL DEFAULT 'saved',
        created_at  TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS applications (
        id         BLOB PRIMARY KEY NOT NULL,
        job_id     BLOB NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
        status     TEXT NOT NULL,
        applied_at TEXT,
        notes      TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS resumes (
        id           BLOB PRIMARY KEY NOT NULL,
        filename     TEXT NOT NULL,
        stored_path  TEXT NOT NULL,
        content_type TEXT,
        size_bytes   INTEGER NOT NULL,
        uploaded_at  TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS keywords (
        id         BLOB PRIMARY KEY NOT NULL,
        term       TEXT NOT NULL UNIQUE,
        category   TEXT,
        weight     REAL NOT NULL DEFAULT 1.0,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS saved_filters (
        id         BLOB PRIMARY KEY NOT NULL,
        name       TEXT NOT NULL,
        criteria   TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS jd_analyses (
        id         BLOB PRIMARY KEY NOT NULL,
        job_id     BLOB REFERENCES jobs(id) ON DELETE SET NULL,
        jd_text    TEXT NOT NULL,
        notes      TEXT,
        created_at TEXT NOT NULL
    )",
];

/// Creates and returns a SQLite connection pool, creating the database file
/// on first run.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Ensures all tables exist. Safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ensured ({} tables)", SCHEMA.len());
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // A single connection keeps every test statement on the same in-memory
    // database.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}
