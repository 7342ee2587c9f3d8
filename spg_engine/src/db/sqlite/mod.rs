//! # SQLite backend
//!
//! "Low-level" SQLite interactions live in the [`orders`], [`catalog`] and [`sessions`] submodules as plain functions
//! that accept a `&mut SqliteConnection`. Callers obtain a connection from the pool, or open a transaction and pass
//! `&mut *tx`, without any other changes. [`SqliteDatabase`] ties them together and implements the backend traits.
mod db;
mod errors;

pub mod catalog;
pub mod orders;
pub mod sessions;

use std::{env, str::FromStr, time::Duration};

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

const SQLITE_DB_URL: &str = "sqlite://data/spg_store.db";

pub fn db_url() -> String {
    let result = env::var("SPG_DATABASE_URL").unwrap_or_else(|_| {
        info!("SPG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Opens a connection pool, creating the database file if it does not exist yet.
///
/// WAL mode lets the return page read while a callback is writing. Writers still queue on the busy timeout.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10))
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Brings the schema up to date. The migrations are embedded in the binary.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteDatabaseError> {
    sqlx::migrate!("./src/db/sqlite/migrations").run(pool).await?;
    info!("🗃️ Database migrations complete");
    Ok(())
}
